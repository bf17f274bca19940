/// Telegram's hard limit is 4096; stay below it.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// `███░░░░░░░` for 30%.
pub fn progress_bar(percent: f64, length: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * length as f64) as usize).min(length);
    format!("{}{}", "█".repeat(filled), "░".repeat(length - filled))
}

/// Splits `text` into chunks of at most `max_chars` characters, preferring
/// line boundaries.
pub fn split_long_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_chars {
        let hard_end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(i, _)| i);
        let cut = match rest[..hard_end].rfind('\n') {
            Some(0) | None => hard_end,
            Some(newline) => newline,
        };
        parts.push(rest[..cut].to_string());
        rest = rest[cut..].strip_prefix('\n').unwrap_or(&rest[cut..]);
    }
    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}
