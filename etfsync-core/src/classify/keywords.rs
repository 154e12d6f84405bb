//! Fund-ness filter: generic ETF terms plus major issuer brand names.

pub const ETF_KEYWORDS: &[&str] = &[
    "etf",
    "exchange-traded",
    "exchange traded",
    "etp",
    "ishares",
    "spdr",
    "proshares",
    "wisdomtree",
    "direxion",
    "invesco",
    "powershares",
    "graniteshares",
    "vaneck",
    "ark invest",
    "global x",
    "vanguard",
    "first trust",
    "flexshares",
    "xtrackers",
    "pacer",
    "amplify",
    "defiance",
    "simplify",
    "dimensional",
    "goldman sachs etf",
    "jpmorgan etf",
    "harbor etf",
    "pimco etf",
    "nuveen etf",
    "blackrock etf",
    "fidelity etf",
    "schwab etf",
];

/// True when the title is non-empty and contains any keyword, ignoring case.
pub fn is_etf_candidate(title: &str) -> bool {
    if title.is_empty() {
        return false;
    }
    let lowered = title.to_lowercase();
    ETF_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_terms_match() {
        assert!(is_etf_candidate("Some Momentum ETF"));
        assert!(is_etf_candidate("An Exchange-Traded Product"));
    }

    #[test]
    fn brand_names_match_case_insensitively() {
        assert!(is_etf_candidate("ISHARES GOLD TRUST"));
        assert!(is_etf_candidate("ProShares UltraPro QQQ"));
    }

    #[test]
    fn unrelated_company_excluded() {
        assert!(!is_etf_candidate("Totally Unrelated Corp"));
        assert!(!is_etf_candidate("Apple Inc."));
    }

    #[test]
    fn empty_title_excluded() {
        assert!(!is_etf_candidate(""));
    }
}
