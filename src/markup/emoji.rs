//! Emoji shortcode substitution
//!
//! A small fixed table mapping well-known shortcode names to their
//! glyphs. Shortcodes without a table entry still become Emoji spans,
//! just over the shortcode text itself.

/// Look up the glyph for a shortcode name
pub(crate) fn glyph(name: &str) -> Option<char> {
    match name {
        "slightly_smiling_face" => Some('😊'),
        "smile" => Some('😄'),
        "pizza" => Some('🍕'),
        "thumbsup" => Some('👍'),
        "heart" => Some('❤'),
        "tada" => Some('🎉'),
        "fire" => Some('🔥'),
        "eyes" => Some('👀'),
        "wave" => Some('👋'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shortcodes() {
        assert_eq!(glyph("pizza"), Some('🍕'));
        assert_eq!(glyph("slightly_smiling_face"), Some('😊'));
    }

    #[test]
    fn test_unknown_shortcodes() {
        assert_eq!(glyph("+1"), None);
        assert_eq!(glyph("emo_ji"), None);
        assert_eq!(glyph(""), None);
    }
}
