//! Text normalization used before dictionary detection and fuzzy matching

/// Lowercase `raw`, drop everything except ASCII letters, digits and
/// whitespace, then trim.
///
/// An empty result means the message carried no usable content.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}
