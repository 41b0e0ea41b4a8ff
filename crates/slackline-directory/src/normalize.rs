//! Name normalization for index keys.

/// Strip zero-width and control characters.
///
/// The remote service occasionally pads display names with invisible
/// characters; indices and searches key on the normalized form.
pub fn normalize_name(s: &str) -> String {
    s.chars().filter(|c| !is_invisible(*c)).collect()
}

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}') || c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_zero_width() {
        assert_eq!(normalize_name("Al\u{200B}ice"), "Alice");
        assert_eq!(normalize_name("\u{FEFF}Bob\u{200D}"), "Bob");
    }

    #[test]
    fn test_strips_control() {
        assert_eq!(normalize_name("Carol\n\t"), "Carol");
        assert_eq!(normalize_name("\u{0007}Dave"), "Dave");
    }

    #[test]
    fn test_keeps_visible_unicode() {
        assert_eq!(normalize_name("Zoë 山田"), "Zoë 山田");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_name("\u{200C}Eve\u{0000} Smith\u{200B}");
        assert_eq!(normalize_name(&once), once);
    }
}
