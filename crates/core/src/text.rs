//! Free-text cleanup shared by the extractors.

/// Maps every newline-sequence variant to a single space and trims the ends.
///
/// Vendor tools embed descriptions with CRLF, lone LF, lone CR, and sometimes
/// the literal escape text `\r\n`; all of them collapse to one space each so
/// a comment is always a single line. Idempotent.
pub fn normalize(text: &str) -> String {
    text.replace("\\r\\n", " ")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn collapses_newline_variants_to_single_spaces() {
        assert_eq!(normalize("a\r\nb"), "a b");
        assert_eq!(normalize("a\nb"), "a b");
        assert_eq!(normalize("a\rb"), "a b");
        assert_eq!(normalize("a\\r\\nb"), "a b");
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(normalize("  spark advance \n"), "spark advance");
    }

    #[test]
    fn empty_and_whitespace_only_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("\r\n\r\n"), "");
    }

    #[test]
    fn idempotent() {
        for input in ["", "  ", "a\r\nb", "x\\r\\ny \r z\n", "already clean"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }
}
