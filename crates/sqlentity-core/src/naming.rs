//! Identifier naming conventions for generated code

/// Java reserved words that cannot be used as field names
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// Convert a SQL identifier to camel case.
///
/// `_`, `-` and spaces are word separators and are dropped; the character
/// after a separator is upper-cased, every other character is lower-cased.
pub fn to_camel_case(input: &str, capitalize_first: bool) -> String {
    let mut result = String::with_capacity(input.len());
    let mut capitalize_next = capitalize_first;

    for ch in input.chars() {
        if matches!(ch, '_' | '-' | ' ') {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Class name for a table (`order_items` -> `OrderItems`)
pub fn class_name(table: &str) -> String {
    to_camel_case(table, true)
}

/// Field name for a column (`created_at` -> `createdAt`)
///
/// Names that would not be valid Java identifiers get a `_` added.
pub fn field_name(column: &str) -> String {
    let name = to_camel_case(column, false);
    if JAVA_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}
