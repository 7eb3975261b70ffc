//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Strip every trailing `/` from a URL-like value.
pub fn remove_trailing_slash(value: &str) -> String {
    value.trim_end_matches('/').to_string()
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Tolerant truthy parser used for option values coming off the wire.
///
/// Only `"1"` and `"true"` (any case, surrounding whitespace ignored) are true.
pub fn parse_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Lenient boolean parser for human input (`yes`/`no`, `on`/`off`, ...).
pub fn parse_flag_input(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" https://example.com ".to_string())),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn is_http_url_accepts_valid_schemes() {
        assert!(is_http_url("http://localhost"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn remove_trailing_slash_strips_all_slashes() {
        assert_eq!(remove_trailing_slash("https://a.example//"), "https://a.example");
        assert_eq!(remove_trailing_slash(""), "");
    }

    #[test]
    fn parse_truthy_accepts_only_true_and_one() {
        assert!(parse_truthy("true"));
        assert!(parse_truthy("TRUE"));
        assert!(parse_truthy(" 1 "));
        assert!(!parse_truthy(""));
        assert!(!parse_truthy("yes"));
        assert!(!parse_truthy("false"));
        assert!(!parse_truthy("0"));
    }

    #[test]
    fn parse_flag_input_is_lenient() {
        assert_eq!(parse_flag_input("On"), Some(true));
        assert_eq!(parse_flag_input("no"), Some(false));
        assert_eq!(parse_flag_input("maybe"), None);
    }
}
