//! Integration tests for the public classification and geometry API.
//!
//! These tests are pure — no pdfium, no files — so they run everywhere,
//! including CI. The full pipeline (extraction, composition, archive) is
//! covered by the env-gated tests in `e2e.rs`.

use labelsort::{classify_page, CategoryRule, LabelGeometry, RuleSet};

fn rule(name: &str, include: &[&str]) -> CategoryRule {
    CategoryRule {
        name: name.into(),
        include: include.iter().map(|s| s.to_string()).collect(),
        exclude: Vec::new(),
        all_required: false,
        and_also: Vec::new(),
    }
}

// ── Classification contract ──────────────────────────────────────────────────

#[test]
fn first_declared_rule_wins_on_overlap() {
    let rules = RuleSet::new(vec![
        rule("Earlier", &["black"]),
        rule("Later", &["black", "label"]),
    ])
    .unwrap();

    // Both rules match; declaration order decides.
    assert_eq!(classify_page("black label", &rules), "Earlier");
}

#[test]
fn all_required_is_conjunctive() {
    let rules = RuleSet::new(vec![CategoryRule {
        all_required: true,
        ..rule("Case Black", &["case", "black"])
    }])
    .unwrap();

    assert_eq!(classify_page("black only here", &rules), "Mix");
    assert_eq!(classify_page("a case and black label", &rules), "Case Black");
}

#[test]
fn and_also_is_conjunctive_and_overrides_exclude() {
    let rules = RuleSet::new(vec![CategoryRule {
        and_also: vec!["white".into()],
        exclude: vec!["uv".into()],
        ..rule("W STICKER", &["uv", "sticker"])
    }])
    .unwrap();

    assert_eq!(classify_page("uv sticker", &rules), "Mix");
    assert_eq!(classify_page("uv sticker white", &rules), "W STICKER");
}

#[test]
fn unmatched_text_lands_in_fallback() {
    let rules = RuleSet::builtin();
    assert_eq!(classify_page("random unrelated text", &rules), "Mix");

    let renamed = RuleSet::builtin().with_fallback("Unsorted");
    assert_eq!(classify_page("random unrelated text", &renamed), "Unsorted");
}

#[test]
fn classification_is_deterministic_across_runs() {
    let rules = RuleSet::builtin();
    let texts = [
        "black maverix shipping",
        "case black label",
        "uv sticker white order",
        "grey wired neckband",
        "nothing relevant at all",
    ];
    let baseline: Vec<&str> = texts.iter().map(|t| classify_page(t, &rules)).collect();
    for _ in 0..50 {
        let again: Vec<&str> = texts.iter().map(|t| classify_page(t, &rules)).collect();
        assert_eq!(again, baseline);
    }
}

#[test]
fn rule_file_order_survives_json_round_trip() {
    let json = r#"[
        { "name": "Specific", "include": ["black", "case"], "all_required": true },
        { "name": "General", "include": ["black"] }
    ]"#;
    let rules = RuleSet::from_json_str(json).unwrap();

    // The specific rule was declared first, so it wins where both match.
    assert_eq!(classify_page("black case label", &rules), "Specific");
    assert_eq!(classify_page("black label", &rules), "General");
}

// ── Geometry contract ────────────────────────────────────────────────────────

#[test]
fn output_page_is_exactly_3_by_5_inches() {
    let g = LabelGeometry::thermal_3x5();
    assert_eq!(g.output_width, 216.0);
    assert_eq!(g.output_height, 360.0);
}

#[test]
fn stock_fit_fills_width_and_letterboxes_height() {
    let g = LabelGeometry::thermal_3x5();
    let fit = g.fit();

    // 244.8/396 ≈ 0.6182 > 216/360 = 0.6: width is full-bleed.
    assert_eq!(fit.width, g.output_width);
    assert!(fit.height < g.output_height);

    // Content keeps the capture aspect ratio to float tolerance.
    let capture_aspect = g.capture_width / g.capture_height;
    assert!((fit.width / fit.height - capture_aspect).abs() < 1e-4);

    // Letterbox margins are symmetric.
    assert!((fit.y * 2.0 + fit.height - g.output_height).abs() < 1e-4);
}

#[test]
fn fit_never_distorts_for_arbitrary_captures() {
    let captures = [(100.0, 300.0), (300.0, 300.0), (500.0, 200.0), (244.8, 396.0)];
    for (w, h) in captures {
        let g = LabelGeometry {
            capture_width: w,
            capture_height: h,
            ..LabelGeometry::thermal_3x5()
        };
        let fit = g.fit();
        assert!(
            (fit.width / fit.height - w / h).abs() < 1e-3,
            "distorted for capture {w}×{h}: fit {fit:?}"
        );
        assert!(fit.width <= g.output_width + 1e-4);
        assert!(fit.height <= g.output_height + 1e-4);
    }
}
