pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let cleaned = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.chars().take(MAX_PLAYER_NAME_LENGTH).collect()
}

/// Like `sanitize_player_name` but without a fallback: blank input is rejected.
pub fn parse_player_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    Some(sanitize_player_name(name, ""))
}
