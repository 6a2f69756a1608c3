//! Text helpers for Java source
//!
//! Each helper is also registered as a template filter.

/// Escape text for use inside a Java string literal
///
/// Usage in templates: {{ table_name | java_string }}
pub fn java_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Make text safe inside a `/** ... */` comment
///
/// Usage in templates: {{ table_name | javadoc }}
pub fn javadoc(value: &str) -> String {
    value.replace("*/", "*&#47;")
}

/// Uppercase the first character, keep the rest (`firstName` -> `FirstName`)
///
/// Unlike the builtin `capitalize` filter, the tail is not lowercased.
pub fn upper_first(value: &str) -> String {
    sqlentity_core::naming::capitalize_first(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_string_escapes_quotes_and_backslashes() {
        assert_eq!(java_string(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(java_string(r"C:\tmp"), r"C:\\tmp");
        assert_eq!(java_string("'single'"), "'single'");
    }

    #[test]
    fn javadoc_cannot_close_comment() {
        assert!(!javadoc("a */ b").contains("*/"));
    }

    #[test]
    fn upper_first_keeps_tail() {
        assert_eq!(upper_first("hiredOn"), "HiredOn");
        assert_eq!(upper_first(""), "");
    }
}
