//! CLI binary for labelsort.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use labelsort::{
    classify_only, process_to_file, BatchProgressCallback, ProcessConfig, ProgressCallback,
    RuleSet,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while pages are classified (the
/// page count is unknown until extraction finishes), then one printed line
/// per composed category.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Opening manifests…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, documents: usize) {
        self.bar.set_prefix("Classifying");
        self.bar.set_message(format!("{documents} manifest(s)"));
    }

    fn on_page_classified(&self, document: usize, page: usize, category: &str) {
        self.bar
            .set_message(format!("doc {} page {} → {category}", document + 1, page + 1));
    }

    fn on_category_composed(&self, category: &str, pages: usize) {
        self.bar.set_prefix("Composing");
        self.bar.println(format!(
            "  {} {:<24} {}",
            green("✓"),
            category,
            dim(&format!("{pages} labels")),
        ));
    }

    fn on_batch_complete(&self, categories: usize, pages: usize) {
        self.bar.finish_and_clear();
        if pages > 0 {
            eprintln!(
                "{} {} labels across {} categories",
                green("✔"),
                bold(&pages.to_string()),
                bold(&categories.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Sort one manifest into processed_labels.zip
  labelsort manifest.pdf

  # Several manifests, custom archive path
  labelsort monday.pdf tuesday.pdf -o monday_labels.zip

  # Manifest straight from the storefront's download URL
  labelsort https://example.com/exports/batch-07.pdf

  # Preview classification without composing anything
  labelsort --classify-only manifest.pdf

  # Deployment-specific rule table, printer-matched DPI
  labelsort --rules warehouse.json --dpi 203 manifest.pdf

  # Machine-readable summary
  labelsort --json manifest.pdf > summary.json

RULE FILE FORMAT (JSON array; order is the match priority):
  [
    { "name": "Black", "include": ["black", "maverix"], "exclude": ["case"] },
    { "name": "Case Black", "include": ["case", "black"], "all_required": true },
    { "name": "W STICKER", "include": ["uv", "sticker"], "and_also": ["white"] }
  ]

ENVIRONMENT VARIABLES:
  LABELSORT_OUTPUT      Default archive path
  LABELSORT_RULES       Default rule file
  LABELSORT_DPI         Default rasterisation DPI
  PDFIUM_LIB_PATH       Directory containing the pdfium shared library

SETUP:
  labelsort needs the PDFium shared library at runtime. Install libpdfium
  on the system library path, set PDFIUM_LIB_PATH=/path/to/dir, or place
  the library next to the labelsort binary.
"#;

/// Sort PDF shipping manifests into label categories for thermal printing.
#[derive(Parser, Debug)]
#[command(
    name = "labelsort",
    version,
    about = "Sort PDF shipping manifests into label categories for 3x5 thermal printing",
    long_about = "Classify every page of the given PDF manifests using ordered keyword rules, \
reformat each page onto a 3in×5in thermal-label page, and bundle one PDF per category \
into a single ZIP archive.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs, in upload order.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the label archive to this path.
    #[arg(short, long, env = "LABELSORT_OUTPUT", default_value = "processed_labels.zip")]
    output: PathBuf,

    /// JSON rule file; defaults to the built-in eighteen-category table.
    #[arg(long, env = "LABELSORT_RULES")]
    rules: Option<PathBuf>,

    /// Name of the bucket for pages matching no rule.
    #[arg(long, env = "LABELSORT_FALLBACK", default_value = "Mix")]
    fallback: String,

    /// Rasterisation DPI (72–600). 203 and 300 match common thermal printers.
    #[arg(long, env = "LABELSORT_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Print each page's category without composing any labels.
    #[arg(long)]
    classify_only: bool,

    /// Output a structured JSON summary instead of human-readable text.
    #[arg(long, env = "LABELSORT_JSON")]
    json: bool,

    /// Disable the progress display.
    #[arg(long, env = "LABELSORT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LABELSORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LABELSORT_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "LABELSORT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress display is active;
    // the spinner and per-category lines cover what the user needs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.classify_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Classify-only mode ───────────────────────────────────────────────
    if cli.classify_only {
        let pages = classify_only(&cli.inputs, &config)
            .await
            .context("Classification failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&pages).context("Failed to serialise pages")?
            );
        } else {
            for p in &pages {
                println!(
                    "{}  page {:>3}  {}",
                    p.input,
                    p.page + 1,
                    bold(&p.category)
                );
            }
            if pages.is_empty() {
                eprintln!("{} no pages found in the uploaded manifests", yellow("⚠"));
            }
        }
        return Ok(());
    }

    // ── Run the batch ────────────────────────────────────────────────────
    let output = process_to_file(&cli.inputs, &cli.output, &config)
        .await
        .context("Processing failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if output.is_empty() {
        // Processed fine, but there was nothing to label.
        eprintln!(
            "{} no labels were categorized across the uploaded files",
            yellow("⚠")
        );
        return Ok(());
    }

    if !cli.quiet {
        if !show_progress {
            // The callback already printed per-category lines otherwise.
            for cat in &output.categories {
                eprintln!("  {} {:<24} {} labels", green("✓"), cat.name, cat.pages);
            }
        }
        eprintln!(
            "{}  {} pages  {} categories  {}ms  →  {}",
            green("✔"),
            output.stats.total_pages,
            output.stats.categories,
            output.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "{} matched / {} in {}  ({} KiB archive)",
                output.stats.matched_pages,
                output.stats.fallback_pages,
                cyan(&cli.fallback),
                output.stats.archive_bytes / 1024,
            )),
        );
    }

    Ok(())
}

/// Map CLI args to `ProcessConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ProcessConfig> {
    let rules = match cli.rules {
        Some(ref path) => RuleSet::from_json_file(path)
            .with_context(|| format!("Failed to load rule file {:?}", path))?,
        None => RuleSet::builtin(),
    }
    .with_fallback(cli.fallback.as_str());

    let mut builder = ProcessConfig::builder()
        .dpi(cli.dpi)
        .rules(rules)
        .download_timeout_secs(cli.download_timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
