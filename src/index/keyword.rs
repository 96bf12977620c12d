/// Normalizes a keyword for storage and lookup
///
/// Lower-cases the input, then drops every character that is not alphanumeric
/// or an underscore. Applying it twice gives the same result as applying it
/// once.
pub fn prep_keyword(keyword: &str) -> String {
    keyword
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}
