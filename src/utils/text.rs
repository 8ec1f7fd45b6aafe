/// Truncates to at most `max_bytes` without splitting a UTF-8 character.
pub fn truncate_utf8_prefix(value: &str, max_bytes: usize) -> String {
    if max_bytes == 0 {
        return String::new();
    }
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

/// Lossy UTF-8 preview of a response body for log lines.
pub fn body_preview(bytes: &[u8], max_bytes: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= max_bytes {
        return text.to_string();
    }
    format!("{}...", truncate_utf8_prefix(&text, max_bytes))
}

#[cfg(test)]
mod tests {
    use super::{body_preview, truncate_utf8_prefix};

    #[test]
    fn truncate_utf8_prefix_handles_ascii() {
        assert_eq!(truncate_utf8_prefix("hello", 3), "hel");
    }

    #[test]
    fn truncate_utf8_prefix_does_not_split_utf8() {
        assert_eq!(truncate_utf8_prefix("a\u{1F600}b", 2), "a");
        assert_eq!(truncate_utf8_prefix("a\u{1F600}b", 5), "a\u{1F600}");
    }

    #[test]
    fn body_preview_marks_truncation() {
        assert_eq!(body_preview(b"{\"success\":true}", 8), "{\"succes...");
        assert_eq!(body_preview(b"ok", 8), "ok");
    }
}
