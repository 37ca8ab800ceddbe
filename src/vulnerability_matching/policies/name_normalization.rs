/// Comparison key used by fuzzy matching.
///
/// Lower-cases, trims surrounding whitespace and drops `-` and `_`, so
/// `Web_Engine`, `web-engine` and `webengine` compare equal.
pub fn comparison_key(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
