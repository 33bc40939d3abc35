//! Wildcard mask matching.
//!
//! Ban masks use the traditional `*`/`?` glob syntax:
//!
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//!
//! Matching is case-insensitive and anchored at both ends. Masks translate
//! to regexes; the store compiles each wildcard mask once at insert so
//! lookups never re-translate.

use regex::Regex;

/// Translate a wildcard mask into an anchored, case-insensitive regex
/// pattern. Literal runs between wildcards go through [`regex::escape`].
fn translate(pattern: &str) -> String {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push_str("(?i)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                translated.push_str(&regex::escape(&literal));
                literal.clear();
                translated.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    translated.push_str(&regex::escape(&literal));
    translated.push('$');
    translated
}

/// Compile a wildcard mask for repeated matching.
///
/// Translation escapes every literal, so compilation only fails on
/// pathological inputs (e.g. the regex size limit); callers treat `None`
/// as a mask that matches nothing.
pub(crate) fn compile_mask(pattern: &str) -> Option<Regex> {
    Regex::new(&translate(pattern)).ok()
}

/// Check whether `text` matches the wildcard `pattern` in one shot.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    compile_mask(pattern).is_some_and(|re| re.is_match(text))
}

/// True if `mask` contains wildcard characters and therefore needs linear
/// pattern matching rather than an exact-map probe.
pub fn has_wildcards(mask: &str) -> bool {
    mask.contains('*') || mask.contains('?')
}
