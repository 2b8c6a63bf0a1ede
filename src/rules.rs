//! Category rules: the ordered keyword table that drives classification.
//!
//! Rules are stored as an **ordered list**, never a map. The first rule whose
//! condition holds wins, and the keyword sets overlap on purpose ("Black" vs
//! "Case Black" vs "Black and grey"), so declaration order is part of the
//! classification contract. [`RuleSet`] wraps the list to keep that invariant
//! in one place.
//!
//! The built-in table ([`RuleSet::builtin`]) reproduces the warehouse
//! deployment's eighteen categories. Deployments with a different product
//! range load their own table from a JSON array via [`RuleSet::from_json_file`]
//! — edited alongside the deployment, not at runtime.

use crate::error::LabelSortError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the reserved bucket for pages that match no rule.
pub const FALLBACK_CATEGORY: &str = "Mix";

/// A single named classification rule.
///
/// Matching semantics, applied to lowercase page text (exactly one branch per
/// rule, chosen by which optional fields are set):
///
/// 1. `all_required` — every `include` keyword must appear, and no `exclude`
///    keyword may appear.
/// 2. `and_also` non-empty — at least one `include` keyword must appear, and
///    every `and_also` keyword must appear. `exclude` is ignored here.
/// 3. default — at least one `include` keyword must appear, and no `exclude`
///    keyword may appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category name; doubles as the output document name (`<name>.pdf`).
    pub name: String,

    /// Keywords of which (by default) at least one must appear in page text.
    pub include: Vec<String>,

    /// Keywords none of which may appear in page text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// When true, ALL `include` keywords must appear (AND semantics).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all_required: bool,

    /// Keywords that must ALL appear in conjunction with any `include` match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub and_also: Vec<String>,
}

impl CategoryRule {
    fn validate(&self, position: usize) -> Result<(), LabelSortError> {
        if self.name.trim().is_empty() {
            return Err(LabelSortError::InvalidRules(format!(
                "rule at position {position} has an empty name"
            )));
        }
        if self.include.is_empty() {
            return Err(LabelSortError::InvalidRules(format!(
                "rule '{}' has no include keywords",
                self.name
            )));
        }
        for kw in self
            .include
            .iter()
            .chain(self.exclude.iter())
            .chain(self.and_also.iter())
        {
            if kw.trim().is_empty() {
                return Err(LabelSortError::InvalidRules(format!(
                    "rule '{}' contains an empty keyword",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Case-fold all keyword sets. Page text is lowered before matching, so
    /// keywords must be lowercase too; folding here means rule authors don't
    /// have to care.
    fn normalise(&mut self) {
        let fold = |kws: &mut Vec<String>| {
            for kw in kws {
                *kw = kw.trim().to_lowercase();
            }
        };
        fold(&mut self.include);
        fold(&mut self.exclude);
        fold(&mut self.and_also);
    }
}

/// An ordered, validated set of [`CategoryRule`]s plus the fallback bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl RuleSet {
    /// Build a rule set from an ordered list of rules.
    ///
    /// Keywords are trimmed and case-folded; the list is validated (at least
    /// one rule, every rule named and carrying at least one include keyword).
    pub fn new(mut rules: Vec<CategoryRule>) -> Result<Self, LabelSortError> {
        if rules.is_empty() {
            return Err(LabelSortError::InvalidRules(
                "rule table must contain at least one rule".into(),
            ));
        }
        for (position, rule) in rules.iter_mut().enumerate() {
            rule.validate(position)?;
            rule.normalise();
        }
        Ok(Self {
            rules,
            fallback: FALLBACK_CATEGORY.to_string(),
        })
    }

    /// Replace the fallback bucket name (default: [`FALLBACK_CATEGORY`]).
    pub fn with_fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback = name.into();
        self
    }

    /// Parse a rule set from a JSON array of rules.
    ///
    /// The on-disk format is a JSON **array**, not an object: JSON objects
    /// carry no ordering guarantee, and rule order is load-bearing.
    pub fn from_json_str(json: &str) -> Result<Self, LabelSortError> {
        let rules: Vec<CategoryRule> = serde_json::from_str(json)
            .map_err(|e| LabelSortError::InvalidRules(format!("JSON parse error: {e}")))?;
        Self::new(rules)
    }

    /// Load a rule set from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LabelSortError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LabelSortError::InvalidRuleFile {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_json_str(&json).map_err(|e| LabelSortError::InvalidRuleFile {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// The rules, in declaration order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Name of the bucket for pages matching no rule.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The built-in warehouse rule table.
    ///
    /// Eighteen categories for a small-electronics shipping operation. Order
    /// matters: "Black" excludes the accessory keywords so that "Case Black",
    /// "Cable" and the sticker rules further down can claim those pages.
    pub fn builtin() -> Self {
        let accessory_excludes = || {
            vec![
                "neck".into(),
                "neckband".into(),
                "cable".into(),
                "uv".into(),
                "holder".into(),
                "case".into(),
                "cover".into(),
                "sticker".into(),
                "watch".into(),
            ]
        };

        let any = |name: &str, include: &[&str]| CategoryRule {
            name: name.into(),
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
            all_required: false,
            and_also: Vec::new(),
        };
        let all = |name: &str, include: &[&str]| CategoryRule {
            all_required: true,
            ..any(name, include)
        };

        let rules = vec![
            CategoryRule {
                exclude: accessory_excludes(),
                ..any("Black", &["black", "maverix"])
            },
            all("Case Black", &["case", "black"]),
            all("Case White", &["case", "white"]),
            any("Cable", &["cable"]),
            CategoryRule {
                and_also: vec!["white".into()],
                ..any("W STICKER", &["uv", "sticker"])
            },
            CategoryRule {
                and_also: vec!["black".into()],
                ..any("BSTICKER", &["uv", "sticker"])
            },
            CategoryRule {
                exclude: accessory_excludes(),
                ..any("White", &["white"])
            },
            any("Neckband", &["neck"]),
            any("Holder", &["hold"]),
            any("Grey Wired", &["grey", "wired"]),
            all("Black and grey", &["black", "grey"]),
            any("t800 watch", &["watch"]),
            any("MAP buds", &["map"]),
            all("CABLEWHITE", &["white", "cable"]),
            all("WIREBLACK", &["black", "wire"]),
            CategoryRule {
                exclude: vec!["whiteandgreycombo".into()],
                ..all("GREY AND WHITE COMBO", &["white", "grey", "combo"])
            },
            any("GREY AND Black COMBO", &["whiteandgreycombo"]),
            any("KAPDA BLACK", &["blackvdltch3nd"]),
        ];

        Self::new(rules).expect("built-in rule table is valid")
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
