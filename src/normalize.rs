/// Trim surrounding whitespace and lowercase. Punctuation is kept as-is.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
