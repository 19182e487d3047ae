//! Request payloads and their conversion into domain types.

pub mod customers;
pub mod estimates;
pub mod intake;
pub mod line_items;
pub mod settings;
pub mod stops;

/// Collapse runs of whitespace and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize every line and keep at most one blank line between paragraphs.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty && previous_empty {
            continue;
        }
        previous_empty = is_empty;
        result.push(line);
    }

    result.join("\n")
}

/// Sanitized single-line value, `None` when nothing is left.
pub(crate) fn optional_inline(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}

/// Sanitized multi-line value, `None` when nothing is left.
pub(crate) fn optional_multiline(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}
