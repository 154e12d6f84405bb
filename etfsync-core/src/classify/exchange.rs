//! Exchange code → display name.

/// Map an exchange code and/or full exchange name to a display name.
///
/// The full name is inspected when present, the code otherwise. Unknown
/// exchanges pass through unchanged; with nothing to go on the result is
/// `"Unknown"`.
pub fn display_exchange(code: &str, full_name: &str) -> String {
    let basis = if full_name.is_empty() { code } else { full_name };
    let n = basis.to_lowercase();

    if n.contains("nyse arca") || code == "PCX" {
        "NYSE Arca".into()
    } else if n.contains("nasdaq") || code == "NMS" || code == "NGM" {
        "NASDAQ".into()
    } else if n.contains("cboe") || code == "BZX" {
        "CBOE".into()
    } else if n.contains("nyse") || code == "NYQ" {
        "NYSE".into()
    } else if !basis.is_empty() {
        basis.to_string()
    } else {
        "Unknown".into()
    }
}
