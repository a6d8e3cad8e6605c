//! Input sanitization.

use crate::error::DeeplError;

/// Trim trailing newlines, bound the length and escape URL-fragment separators.
///
/// Length is counted in characters of the trimmed, unescaped text and must be
/// in `(0, max_length]`. `/` and `|` separate the fragment fields, so each is
/// prefixed with a backslash unless it already is one. Escaping never changes
/// the counted length, so the function is idempotent on in-bound text.
pub fn sanitize(text: &str, max_length: usize) -> Result<String, DeeplError> {
    let script = text.trim_end_matches('\n');
    let actual = unescape(script).chars().count();

    if actual > max_length {
        return Err(DeeplError::InputTooLong {
            limit: max_length,
            actual,
        });
    }

    if actual == 0 {
        return Err(DeeplError::EmptyInput);
    }

    Ok(escape(script))
}

fn escape(script: &str) -> String {
    let mut escaped = String::with_capacity(script.len());
    let mut prev = None;
    for c in script.chars() {
        if matches!(c, '/' | '|') && prev != Some('\\') {
            escaped.push('\\');
        }
        escaped.push(c);
        prev = Some(c);
    }
    escaped
}

/// Undo [`sanitize`]'s escaping.
pub fn unescape(script: &str) -> String {
    script.replace("\\/", "/").replace("\\|", "|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_trailing_newlines_only() {
        assert_eq!(sanitize("hello.\n\n", 100).unwrap(), "hello.");
        assert_eq!(sanitize("\nhello", 100).unwrap(), "\nhello");
        assert_eq!(sanitize("a\nb\n", 100).unwrap(), "a\nb");
    }

    #[test]
    fn test_blank_script() {
        assert!(matches!(sanitize("\n", 100), Err(DeeplError::EmptyInput)));
        assert!(matches!(sanitize("", 100), Err(DeeplError::EmptyInput)));
    }

    #[test]
    fn test_too_long_reports_limit_and_length() {
        let err = sanitize(&"test".repeat(10000), 5000).unwrap_err();
        match err {
            DeeplError::InputTooLong { limit, actual } => {
                assert_eq!(limit, 5000);
                assert_eq!(actual, 40000);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_length_boundary_counts_chars() {
        let text = "あ".repeat(5);
        assert!(sanitize(&text, 5).is_ok());
        assert!(sanitize(&format!("{text}\n\n"), 5).is_ok());
        assert!(sanitize(&"あ".repeat(6), 5).is_err());
    }

    #[test]
    fn test_escapes_separators() {
        assert_eq!(
            sanitize("今日は2022/2/22です。", 100).unwrap(),
            "今日は2022\\/2\\/22です。"
        );
        assert_eq!(sanitize("a|b", 100).unwrap(), "a\\|b");
    }

    #[test]
    fn test_idempotent() {
        for text in ["hello.", "a/b|c", "x\\/y", "//||", "2022/2/22", "line\nbreak"] {
            let once = sanitize(text, 100).unwrap();
            let twice = sanitize(&once, 100).unwrap();
            assert_eq!(once, twice, "{text:?}");
        }
    }

    #[test]
    fn test_idempotent_at_length_bound() {
        let once = sanitize("a/b", 3).unwrap();
        assert_eq!(once, "a\\/b");
        assert_eq!(sanitize(&once, 3).unwrap(), once);

        let once = sanitize("|/|", 3).unwrap();
        assert_eq!(sanitize(&once, 3).unwrap(), once);
        assert!(sanitize("a/bc", 3).is_err());
    }

    #[test]
    fn test_unescape_reverses_escape() {
        for text in ["a/b|c", "2022/2/22", "plain"] {
            assert_eq!(unescape(&sanitize(text, 100).unwrap()), text);
        }
    }
}
