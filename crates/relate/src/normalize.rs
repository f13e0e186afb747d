//! Free-text identifier canonicalization.

/// Canonical comparison key for a free-text identifier or name.
///
/// Keeps ASCII letters only and uppercases them, so punctuation,
/// whitespace, casing and separator style (`|`, `&`, commas) collapse into
/// one token stream. Ordering and abbreviation differences survive:
/// `"D. S. Seigler & J. T. Miller"` and `"David S. Seigler|J.T. Miller"`
/// stay distinct keys.
pub fn normalize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Normalized key, or `None` when nothing survives normalization.
///
/// Purely numeric identifiers strip to the empty string; an empty key
/// counts as absent so two of them never compare equal.
pub fn normalize_opt(raw: Option<&str>) -> Option<String> {
    let key = normalize_identifier(raw?);
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
