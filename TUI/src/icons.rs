/// Glyph drawn for an icon id nobody recognises.
pub const FALLBACK_GLYPH: &str = "•";

/// Terminal glyph for a symbolic icon id. Every glyph occupies one cell.
pub fn glyph(icon_id: &str) -> &'static str {
    match icon_id {
        "doc.on.doc" => "⧉",
        "square.and.arrow.up" => "⇪",
        "arrow.clockwise" => "↻",
        "photo.artframe" => "▣",
        "stop" => "■",
        "speaker.wave.2" => "♪",
        "speaker.slash" => "×",
        "paperplane" => "➤",
        "pencil" => "✎",
        "checkmark" => "✓",
        _ => FALLBACK_GLYPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MessageAction;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_catalog_icons_have_glyphs() {
        for action in MessageAction::ALL {
            assert_ne!(glyph(action.default_icon()), FALLBACK_GLYPH, "{action:?}");
        }
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        assert_eq!(glyph("not.a.symbol"), FALLBACK_GLYPH);
        assert_eq!(glyph(""), FALLBACK_GLYPH);
    }

    #[test]
    fn test_glyphs_are_single_cell() {
        for id in ["doc.on.doc", "square.and.arrow.up", "arrow.clockwise", "stop", "paperplane", "?"] {
            assert_eq!(glyph(id).width(), 1, "{id}");
        }
    }
}
