/// Validates `#RRGGBB` (hex digits in either case) and returns it upper-cased.
pub fn normalize_hex_color(value: &str) -> Option<String> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", digits.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_digit_hex_in_any_case() {
        assert_eq!(normalize_hex_color("#FF0000"), Some("#FF0000".to_string()));
        assert_eq!(normalize_hex_color("#a1b2c3"), Some("#A1B2C3".to_string()));
    }

    #[test]
    fn rejects_malformed_colors() {
        for value in ["FF0000", "#FFF", "#GG0000", "#FF00000", "", "#", " #FF0000"] {
            assert_eq!(normalize_hex_color(value), None, "{value:?}");
        }
    }
}
