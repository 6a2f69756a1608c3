//! Top-level clause splitting of a table body

/// Split a table body on commas at parenthesis depth zero.
///
/// Parenthesized spans (`DECIMAL(10,2)`, `FOREIGN KEY (a, b)`) stay whole, as
/// do quoted strings and identifiers. Clauses are trimmed; empty ones dropped.
pub fn split_clauses(body: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            if q == '\'' && ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '[' => quote = Some(']'),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                clauses.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    clauses.push(&body[start..]);

    clauses
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}
