//! Name-based ETF classification.
//!
//! Four stages, all driven by the fund's title:
//! - keyword filter deciding whether a listing is an ETF at all
//! - ordered category rules → (category, sub-category)
//! - ordered issuer rules → brand
//! - exchange code → display name
//!
//! Regexes are compiled once into a [`Classifier`] and reused for every record.

pub mod category;
pub mod exchange;
pub mod issuer;
pub mod keywords;

pub use category::{Category, CategoryRule, DEFAULT_CATEGORY};
pub use exchange::display_exchange;
pub use issuer::IssuerRule;
pub use keywords::{is_etf_candidate, ETF_KEYWORDS};

/// Everything the classifier derives from a fund name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub sub_category: &'static str,
    /// Empty when no issuer rule matched.
    pub issuer: &'static str,
}

/// Compiled rule tables.
#[derive(Debug, Clone)]
pub struct Classifier {
    categories: Vec<CategoryRule>,
    issuers: Vec<IssuerRule>,
}

impl Classifier {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            categories: category::compile_rules()?,
            issuers: issuer::compile_rules()?,
        })
    }

    pub fn is_etf_candidate(&self, title: &str) -> bool {
        is_etf_candidate(title)
    }

    pub fn category(&self, title: &str) -> (Category, &'static str) {
        category::first_match(&self.categories, &title.to_lowercase())
    }

    pub fn issuer(&self, title: &str) -> &'static str {
        issuer::first_match(&self.issuers, &title.to_lowercase())
    }

    pub fn classify(&self, title: &str) -> Classification {
        let lowered = title.to_lowercase();
        let (category, sub_category) = category::first_match(&self.categories, &lowered);
        Classification {
            category,
            sub_category,
            issuer: issuer::first_match(&self.issuers, &lowered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_combines_stages() {
        let classifier = Classifier::new().unwrap();
        let c = classifier.classify("iShares Gold Trust");
        assert_eq!(c.category, Category::Commodities);
        assert_eq!(c.sub_category, "Precious Metals");
        assert_eq!(c.issuer, "BlackRock iShares");
    }

    #[test]
    fn single_stage_lookups_agree_with_classify() {
        let classifier = Classifier::new().unwrap();
        assert_eq!(
            classifier.category("ProShares UltraPro QQQ"),
            (Category::Leveraged, "Leveraged")
        );
        assert_eq!(classifier.issuer("ProShares UltraPro QQQ"), "ProShares");
        assert_eq!(classifier.issuer("Totally Unrelated Corp"), "");

        let c = classifier.classify("iShares Gold Trust");
        assert_eq!(
            classifier.category("iShares Gold Trust"),
            (c.category, c.sub_category)
        );
        assert_eq!(classifier.issuer("iShares Gold Trust"), c.issuer);
    }

    #[test]
    fn classification_is_deterministic() {
        let a = Classifier::new().unwrap();
        let b = Classifier::new().unwrap();
        for title in ["ProShares UltraPro QQQ", "Vanguard Total Bond Market ETF", "x"] {
            assert_eq!(a.classify(title), b.classify(title));
            assert_eq!(a.classify(title), a.classify(title));
        }
    }
}
