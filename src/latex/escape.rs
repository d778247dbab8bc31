//! LaTeX escaping for literal text.

/// Escape characters LaTeX treats as markup in literal text.
///
/// The escape set matches what notebook content actually trips over in
/// practice: underscores, hash and percent. Everything else passes through
/// untouched.
pub fn escape_special(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '_' | '#' | '%' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
