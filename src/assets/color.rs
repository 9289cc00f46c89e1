use crate::foundation::core::Rgb8;

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
///
/// Anything else yields white. Color strings come straight from free-text UI fields, so a typo
/// renders white glyphs instead of failing the whole engine.
pub fn parse_hex_rgb(s: &str) -> Rgb8 {
    parse_hex_rgb_or(s, Rgb8::WHITE)
}

/// Like [`parse_hex_rgb`] with a caller-chosen fallback.
pub fn parse_hex_rgb_or(s: &str, fallback: Rgb8) -> Rgb8 {
    try_parse_hex_rgb(s).unwrap_or(fallback)
}

pub fn try_parse_hex_rgb(s: &str) -> Option<Rgb8> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn hex_byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    Some(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}
