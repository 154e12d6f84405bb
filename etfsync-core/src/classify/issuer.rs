//! Issuer brand extraction.

use regex::Regex;

/// Ordered (pattern, brand) table, first match wins.
const ISSUER_RULES: &[(&str, &str)] = &[
    (r"ishares", "BlackRock iShares"),
    (r"vanguard", "Vanguard"),
    (r"spdr|state street", "State Street SPDR"),
    (r"invesco|powershares", "Invesco"),
    (r"proshares", "ProShares"),
    (r"wisdomtree", "WisdomTree"),
    (r"direxion", "Direxion"),
    (r"vaneck", "VanEck"),
    (r"ark invest|ark etf", "ARK Invest"),
    (r"global x", "Global X"),
    (r"first trust", "First Trust"),
    (r"dimensional", "Dimensional"),
    (r"flexshares", "FlexShares"),
    (r"xtrackers|dws", "Xtrackers"),
    (r"graniteshares", "GraniteShares"),
    (r"amplify", "Amplify"),
    (r"defiance", "Defiance"),
    (r"simplify", "Simplify"),
    (r"pacer", "Pacer"),
    (r"goldman sachs", "Goldman Sachs"),
    (r"jpmorgan|j\.p\.", "JPMorgan"),
    (r"pimco", "PIMCO"),
    (r"fidelity", "Fidelity"),
    (r"schwab", "Schwab"),
    (r"blackrock", "BlackRock"),
    (r"nuveen", "Nuveen"),
    (r"columbia", "Columbia"),
    (r"harbor", "Harbor"),
];

#[derive(Debug, Clone)]
pub struct IssuerRule {
    pattern: Regex,
    pub brand: &'static str,
}

pub fn compile_rules() -> Result<Vec<IssuerRule>, regex::Error> {
    ISSUER_RULES
        .iter()
        .map(|&(pattern, brand)| {
            Ok(IssuerRule {
                pattern: Regex::new(pattern)?,
                brand,
            })
        })
        .collect()
}

/// Brand of the first matching rule, or `""`.
pub fn first_match(rules: &[IssuerRule], lowered: &str) -> &'static str {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(lowered))
        .map(|rule| rule.brand)
        .unwrap_or("")
}
