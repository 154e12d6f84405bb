//! Category taxonomy and the ordered name-pattern rules that assign it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level fund category. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "US Equity")]
    UsEquity,
    #[serde(rename = "Fixed Income")]
    FixedIncome,
    #[serde(rename = "Sector")]
    Sector,
    #[serde(rename = "International")]
    International,
    #[serde(rename = "Commodities")]
    Commodities,
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "Leveraged")]
    Leveraged,
    #[serde(rename = "Thematic")]
    Thematic,
    #[serde(rename = "ESG")]
    Esg,
    #[serde(rename = "Digital Assets")]
    DigitalAssets,
    #[serde(rename = "Multi-Asset")]
    MultiAsset,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::UsEquity,
        Category::FixedIncome,
        Category::Sector,
        Category::International,
        Category::Commodities,
        Category::RealEstate,
        Category::Leveraged,
        Category::Thematic,
        Category::Esg,
        Category::DigitalAssets,
        Category::MultiAsset,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::UsEquity => "US Equity",
            Category::FixedIncome => "Fixed Income",
            Category::Sector => "Sector",
            Category::International => "International",
            Category::Commodities => "Commodities",
            Category::RealEstate => "Real Estate",
            Category::Leveraged => "Leveraged",
            Category::Thematic => "Thematic",
            Category::Esg => "ESG",
            Category::DigitalAssets => "Digital Assets",
            Category::MultiAsset => "Multi-Asset",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result when no rule matches.
pub const DEFAULT_CATEGORY: (Category, &str) = (Category::UsEquity, "US Equity");

/// Ordered (pattern, category, sub-category) table, matched against the
/// lower-cased fund name. First match wins, so leveraged/inverse products
/// must stay ahead of the asset-class rules they would otherwise hit.
const CATEGORY_RULES: &[(&str, Category, &str)] = &[
    (r"bitcoin|ethereum|crypto|blockchain|digital asset", Category::DigitalAssets, "Digital Assets"),
    (r"ultra ?pro|ultra ?short|leveraged|2x |3x |bull 3x|bear 3x", Category::Leveraged, "Leveraged"),
    (r"inverse|short s&p|short nasdaq|bear 1x|bear 2x", Category::Leveraged, "Inverse"),
    (r"\bgold\b|\bsilver\b|precious metal", Category::Commodities, "Precious Metals"),
    (r"\boil\b|natural gas|commodit|energy trust", Category::Commodities, "Broad"),
    (r"real estate|\breit\b", Category::RealEstate, "Diversified REIT"),
    (r"treasury|government bond|govt bond|t-bill|t-bond", Category::FixedIncome, "Treasury"),
    (r"high yield|junk bond", Category::FixedIncome, "High Yield"),
    (r"muni|municipal", Category::FixedIncome, "Municipal"),
    (r"corporate bond|corp bond|investment grade", Category::FixedIncome, "Corp Bond"),
    (r"inflation|\btips\b", Category::FixedIncome, "Inflation-Protected"),
    (
        r"aggregate bond|total bond|bond market|bond fund|\bbond\b|fixed income",
        Category::FixedIncome,
        "Broad Bond",
    ),
    (r"emerging market|developing market", Category::International, "Emerging Markets"),
    (r"\bchina\b|\bchinese\b", Category::International, "China"),
    (r"\bjapan\b|\bjapanese\b", Category::International, "Japan"),
    (r"\beurope\b|\beuropean\b", Category::International, "Europe"),
    (r"\bindia\b|\bindian\b", Category::International, "India"),
    (
        r"international|foreign|global|world|\beafe\b|ex-us",
        Category::International,
        "Developed Markets",
    ),
    (r"semiconductor", Category::Sector, "Semiconductors"),
    (r"technology|tech etf|tech fund", Category::Sector, "Technology"),
    (
        r"biotech|health care|healthcare|pharmaceutical|medical",
        Category::Sector,
        "Health Care",
    ),
    (r"financial|banking sector", Category::Sector, "Financials"),
    (r"\bconsumer\b", Category::Sector, "Consumer"),
    (r"industrial", Category::Sector, "Industrials"),
    (r"material|metals.mining", Category::Sector, "Materials"),
    (r"utilit", Category::Sector, "Utilities"),
    (r"communication|telecom", Category::Sector, "Comm. Services"),
    (r"\besg\b|sustainable|socially responsible|environmental", Category::Esg, "ESG"),
    (r"dividend", Category::UsEquity, "Dividend"),
    (r"small.cap|russell 2000|s&p smallcap|small cap", Category::UsEquity, "Small Cap Blend"),
    (r"mid.cap|russell midcap|s&p midcap|mid cap", Category::UsEquity, "Mid Cap Blend"),
    (
        r"large.cap|s&p 500|total market|total stock|total us",
        Category::UsEquity,
        "Large Cap Blend",
    ),
    (r"\bgrowth\b", Category::UsEquity, "Large Cap Growth"),
    (r"\bvalue\b", Category::UsEquity, "Large Cap Value"),
    (r"allocation|balanced|target.?date|retirement", Category::MultiAsset, "Allocation"),
];

/// A compiled category rule.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pattern: Regex,
    pub category: Category,
    pub sub_category: &'static str,
}

impl CategoryRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }
}

/// Compile the rule table, preserving its order.
pub fn compile_rules() -> Result<Vec<CategoryRule>, regex::Error> {
    CATEGORY_RULES
        .iter()
        .map(|&(pattern, category, sub_category)| {
            Ok(CategoryRule {
                pattern: Regex::new(pattern)?,
                category,
                sub_category,
            })
        })
        .collect()
}

/// First matching rule for an already lower-cased name, or the default.
pub fn first_match(rules: &[CategoryRule], lowered: &str) -> (Category, &'static str) {
    rules
        .iter()
        .find(|rule| rule.matches(lowered))
        .map(|rule| (rule.category, rule.sub_category))
        .unwrap_or(DEFAULT_CATEGORY)
}
