//! Classification: assign each page to the first matching category rule.
//!
//! The classifier is a pure function of (page text, rule table) — no I/O, no
//! ambient state. The rule table is passed in explicitly so the same text can
//! be classified against different deployments' tables in tests.

use crate::rules::{CategoryRule, RuleSet};
use tracing::debug;

/// Identifies a single page as (document index, page index), both zero-based.
///
/// Indices point into the batch's resolved source documents. The same
/// (document, page) pair may appear more than once when a caller uploads the
/// same file twice; duplicates are kept and composited independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    pub document: usize,
    pub page: usize,
}

/// Pages grouped by category, in first-encounter order.
///
/// Backed by a vector of `(name, pages)` buckets rather than a map: bucket
/// order determines archive entry order, and it must follow the order in
/// which categories first received a page — outer loop by document, inner
/// loop by page index.
#[derive(Debug, Default)]
pub struct ClassifiedBatch {
    buckets: Vec<(String, Vec<PageRef>)>,
}

impl ClassifiedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page to its category's bucket, creating the bucket on first
    /// encounter.
    pub fn push(&mut self, category: &str, page: PageRef) {
        match self.buckets.iter_mut().find(|(name, _)| name == category) {
            Some((_, pages)) => pages.push(page),
            None => self.buckets.push((category.to_string(), vec![page])),
        }
    }

    /// Buckets in first-encounter order. Every bucket is non-empty.
    pub fn buckets(&self) -> &[(String, Vec<PageRef>)] {
        &self.buckets
    }

    /// Total pages across all buckets.
    pub fn total_pages(&self) -> usize {
        self.buckets.iter().map(|(_, pages)| pages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Classify one page's text against the rule table.
///
/// Rules are evaluated in declaration order; the first rule whose condition
/// holds wins. Returns the fallback category name when no rule matches.
/// `text` must already be lowercase (the extraction stage folds it).
pub fn classify_page<'a>(text: &str, rules: &'a RuleSet) -> &'a str {
    for rule in rules.rules() {
        if rule_matches(text, rule) {
            return &rule.name;
        }
    }
    rules.fallback()
}

/// Evaluate one rule against lowercase page text.
///
/// Exactly one branch applies per rule: `all_required` takes precedence,
/// then a non-empty `and_also`, then the default any/exclude semantics.
/// Note `exclude` is intentionally ignored in the `and_also` branch.
fn rule_matches(text: &str, rule: &CategoryRule) -> bool {
    let contains = |kw: &String| text.contains(kw.as_str());

    if rule.all_required {
        rule.include.iter().all(contains) && !rule.exclude.iter().any(contains)
    } else if !rule.and_also.is_empty() {
        rule.include.iter().any(contains) && rule.and_also.iter().all(contains)
    } else {
        rule.include.iter().any(contains) && !rule.exclude.iter().any(contains)
    }
}

/// Classify a whole batch of extracted documents.
///
/// Walks documents in batch order and pages in index order, so bucket
/// contents (and bucket creation order) are deterministic for a given batch.
/// `observe` is called once per page with its [`PageRef`] and assigned
/// category, in walk order.
pub fn classify_batch<F>(
    documents: &[super::extract::DocumentText],
    rules: &RuleSet,
    mut observe: F,
) -> ClassifiedBatch
where
    F: FnMut(PageRef, &str),
{
    let mut batch = ClassifiedBatch::new();

    for (doc_index, document) in documents.iter().enumerate() {
        for (page_index, text) in document.pages.iter().enumerate() {
            let category = classify_page(text, rules);
            let page_ref = PageRef {
                document: doc_index,
                page: page_index,
            };
            debug!(
                "Page {}/{} of {} → {}",
                page_index + 1,
                document.page_count(),
                document.path.display(),
                category
            );
            batch.push(category, page_ref);
            observe(page_ref, category);
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CategoryRule;

    fn rule(name: &str, include: &[&str]) -> CategoryRule {
        CategoryRule {
            name: name.into(),
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
            all_required: false,
            and_also: Vec::new(),
        }
    }

    #[test]
    fn first_match_wins() {
        let rules = RuleSet::new(vec![rule("First", &["shared"]), rule("Second", &["shared"])])
            .unwrap();
        assert_eq!(classify_page("text with shared keyword", &rules), "First");
    }

    #[test]
    fn all_required_needs_every_keyword() {
        let rules = RuleSet::new(vec![CategoryRule {
            all_required: true,
            ..rule("Case Black", &["case", "black"])
        }])
        .unwrap();

        assert_eq!(classify_page("black label", &rules), "Mix");
        assert_eq!(classify_page("case black label", &rules), "Case Black");
    }

    #[test]
    fn all_required_still_honours_exclude() {
        let rules = RuleSet::new(vec![CategoryRule {
            all_required: true,
            exclude: vec!["combo".into()],
            ..rule("Case Black", &["case", "black"])
        }])
        .unwrap();

        assert_eq!(classify_page("case black combo", &rules), "Mix");
    }

    #[test]
    fn and_also_requires_conjunction_and_ignores_exclude() {
        let rules = RuleSet::new(vec![CategoryRule {
            and_also: vec!["white".into()],
            exclude: vec!["sticker".into()],
            ..rule("W STICKER", &["uv", "sticker"])
        }])
        .unwrap();

        assert_eq!(classify_page("uv sticker", &rules), "Mix");
        // "sticker" is in the exclude list, but exclude is ignored in the
        // and_also branch.
        assert_eq!(classify_page("uv sticker white", &rules), "W STICKER");
    }

    #[test]
    fn default_branch_respects_exclude() {
        let rules = RuleSet::new(vec![CategoryRule {
            exclude: vec!["case".into()],
            ..rule("Black", &["black"])
        }])
        .unwrap();

        assert_eq!(classify_page("black earbuds", &rules), "Black");
        assert_eq!(classify_page("black case", &rules), "Mix");
    }

    #[test]
    fn no_match_falls_back() {
        let rules = RuleSet::new(vec![rule("Black", &["black"])]).unwrap();
        assert_eq!(classify_page("random unrelated text", &rules), "Mix");
    }

    #[test]
    fn classification_is_deterministic() {
        let rules = RuleSet::builtin();
        let text = "case black label with cable and uv sticker";
        let first = classify_page(text, &rules);
        for _ in 0..100 {
            assert_eq!(classify_page(text, &rules), first);
        }
    }

    #[test]
    fn builtin_end_to_end_texts() {
        let rules = RuleSet::builtin();
        assert_eq!(classify_page("black maverix shipping", &rules), "Black");
        assert_eq!(classify_page("case black label", &rules), "Case Black");
        assert_eq!(
            classify_page("kapda cover blackvdltch3nd", &rules),
            "KAPDA BLACK"
        );
        assert_eq!(classify_page("random unrelated text", &rules), "Mix");
    }

    #[test]
    fn matching_is_substring_not_word_boundary() {
        let rules = RuleSet::builtin();
        // "black" is a substring of "blackvdltch3nd", so the earlier Black
        // rule claims a bare KAPDA token; the KAPDA rule is only reachable
        // when an accessory keyword knocks the page past Black's exclude
        // list. Substring semantics are the contract, not word matching.
        assert_eq!(classify_page("blackvdltch3nd", &rules), "Black");
        assert_eq!(classify_page("cover blackvdltch3nd", &rules), "KAPDA BLACK");
    }

    #[test]
    fn builtin_sticker_rules_split_on_colour() {
        let rules = RuleSet::builtin();
        assert_eq!(classify_page("uv sticker white pack", &rules), "W STICKER");
        assert_eq!(classify_page("uv sticker black pack", &rules), "BSTICKER");
    }

    #[test]
    fn builtin_black_excludes_accessories() {
        let rules = RuleSet::builtin();
        // "black" alone matches the Black rule…
        assert_eq!(classify_page("black earbuds maverix", &rules), "Black");
        // …but an accessory keyword pushes the page past it, down to the
        // matching accessory rule.
        assert_eq!(classify_page("black cable 1m", &rules), "Cable");
        assert_eq!(classify_page("black watch strap", &rules), "t800 watch");
    }

    #[test]
    fn buckets_preserve_encounter_order() {
        let mut batch = ClassifiedBatch::new();
        batch.push("Mix", PageRef { document: 0, page: 0 });
        batch.push("Black", PageRef { document: 0, page: 1 });
        batch.push("Mix", PageRef { document: 1, page: 0 });

        let names: Vec<&str> = batch.buckets().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Mix", "Black"]);
        assert_eq!(batch.buckets()[0].1.len(), 2);
        assert_eq!(batch.total_pages(), 3);
    }

    #[test]
    fn duplicate_pages_are_kept() {
        let mut batch = ClassifiedBatch::new();
        let page = PageRef { document: 0, page: 0 };
        batch.push("Black", page);
        batch.push("Black", page);
        assert_eq!(batch.buckets()[0].1, vec![page, page]);
    }
}
