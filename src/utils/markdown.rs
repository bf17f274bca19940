//! Helpers for Telegram MarkdownV2 text.
//!
//! Every user-supplied or canned string must pass through
//! [`escape_markdown`] before it is embedded in a MarkdownV2 message.

/// Characters with a meaning in MarkdownV2 outside code entities.
const RESERVED: [char; 19] = [
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes MarkdownV2 special characters so the text renders literally.
///
/// # Example
/// ```
/// use memoryping_bot::utils::markdown::escape_markdown;
///
/// let escaped = escape_markdown("Call mom (5pm)!");
/// assert_eq!(escaped, "Call mom \\(5pm\\)\\!");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escaped text wrapped in bold markers.
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}

/// Escaped text wrapped in italic markers.
pub fn italic(text: &str) -> String {
    format!("_{}_", escape_markdown(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_backslash_first() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_reminder_markers() {
        assert_eq!(escape_markdown("#work !high"), "\\#work \\!high");
        assert_eq!(escape_markdown("-- notes"), "\\-\\- notes");
        assert_eq!(escape_markdown("v0.1.0"), "v0\\.1\\.0");
    }

    #[test]
    fn test_escape_plain_text_and_emoji() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("plain text 💊"), "plain text 💊");
    }

    #[test]
    fn test_bold_and_italic_escape_content() {
        assert_eq!(bold("Level 2!"), "*Level 2\\!*");
        assert_eq!(italic("Progress, not perfection."), "_Progress, not perfection\\._");
    }
}
