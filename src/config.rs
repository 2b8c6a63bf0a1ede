//! Configuration types for batch label processing.
//!
//! All processing behaviour is controlled through [`ProcessConfig`], built via
//! its [`ProcessConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across calls, log it, and diff two runs to
//! understand why their archives differ.
//!
//! # Design choice: builder over constructor
//! Callers usually want the built-in rule table and default geometry and only
//! touch one or two knobs. The builder lets them set exactly those and rely on
//! documented defaults for the rest.

use crate::error::LabelSortError;
use crate::pipeline::compose::LabelGeometry;
use crate::progress::ProgressCallback;
use crate::rules::RuleSet;
use std::fmt;

/// Configuration for one batch-processing invocation.
///
/// Built via [`ProcessConfig::builder()`] or [`ProcessConfig::default()`].
///
/// # Example
/// ```rust
/// use labelsort::ProcessConfig;
///
/// let config = ProcessConfig::builder()
///     .dpi(203)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessConfig {
    /// Rasterisation DPI for the capture region. Range: 72–600. Default: 300.
    ///
    /// Thermal label printers are typically 203 or 300 DPI; rendering the
    /// capture region at 300 keeps barcodes and small address text crisp
    /// after the rescale without inflating the output PDFs. Drop to 203 to
    /// match cheaper printers exactly, or raise for high-density barcodes.
    pub dpi: u32,

    /// Output page and capture-region geometry. Default: 3in×5in label with a
    /// 3.4in×5.5in capture region ([`LabelGeometry::thermal_3x5`]).
    pub geometry: LabelGeometry,

    /// The ordered classification rule table. Default: [`RuleSet::builtin`].
    pub rules: RuleSet,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional progress callback receiving per-page and per-category events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            geometry: LabelGeometry::thermal_3x5(),
            rules: RuleSet::builtin(),
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("dpi", &self.dpi)
            .field("geometry", &self.geometry)
            .field("rules", &self.rules.len())
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ProcessConfig {
    /// Create a new builder for `ProcessConfig`.
    pub fn builder() -> ProcessConfigBuilder {
        ProcessConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessConfig`].
pub struct ProcessConfigBuilder {
    config: ProcessConfig,
}

impl ProcessConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn geometry(mut self, geometry: LabelGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.config.rules = rules;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessConfig, LabelSortError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(LabelSortError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.rules.is_empty() {
            return Err(LabelSortError::InvalidConfig(
                "rule table must contain at least one rule".into(),
            ));
        }
        c.geometry.validate().map_err(LabelSortError::InvalidConfig)?;
        Ok(self.config)
    }
}
