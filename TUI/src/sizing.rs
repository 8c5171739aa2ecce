use ratatui::style::Color;
use unicode_width::UnicodeWidthStr;

use crate::resolver::ResolvedAppearance;

/// Geometry and colors of a single action button, in terminal cells.
///
/// A button is laid out as `[leading][icon][padding][label][trailing]`.
/// The renderer and [`SizeEstimator`] both read these values, so the width
/// reserved in the strip always equals what gets drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub leading_inset: u16,
    pub icon_width: u16,
    pub icon_padding: u16,
    pub trailing_inset: u16,
    pub height: u16,
    /// Background used when the host supplies no tint
    pub default_tint: Color,
    pub foreground: Color,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            leading_inset: 1,
            icon_width: 1,
            icon_padding: 1,
            trailing_inset: 1,
            height: 1,
            default_tint: Color::Rgb(45, 50, 60),
            foreground: Color::Rgb(240, 240, 245),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSize {
    pub width: u16,
    pub height: u16,
}

/// Display width of a label as the renderer measures it.
pub fn label_width(label: &str) -> u16 {
    u16::try_from(label.width()).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeEstimator {
    style: ButtonStyle,
}

impl SizeEstimator {
    pub fn new(style: ButtonStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ButtonStyle {
        &self.style
    }

    pub fn measure(&self, appearance: &ResolvedAppearance) -> ButtonSize {
        let s = &self.style;
        let width = s
            .leading_inset
            .saturating_add(s.icon_width)
            .saturating_add(s.icon_padding)
            .saturating_add(label_width(&appearance.label))
            .saturating_add(s.trailing_inset);

        ButtonSize { width, height: s.height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MessageAction;
    use crate::resolver::resolve;
    use pretty_assertions::assert_eq;

    fn appearance(label: &str) -> ResolvedAppearance {
        ResolvedAppearance {
            label: label.to_string(),
            icon_id: "doc.on.doc".to_string(),
        }
    }

    #[test]
    fn test_measure_default_style() {
        let estimator = SizeEstimator::default();
        assert_eq!(estimator.measure(&appearance("Copy")), ButtonSize { width: 8, height: 1 });
        assert_eq!(estimator.measure(&appearance("Regenerate")), ButtonSize { width: 14, height: 1 });
    }

    #[test]
    fn test_measure_is_deterministic() {
        let estimator = SizeEstimator::default();
        for action in MessageAction::ALL {
            let resolved = resolve(action, None);
            assert_eq!(estimator.measure(&resolved), estimator.measure(&resolved.clone()));
        }
    }

    #[test]
    fn test_icon_id_does_not_affect_width() {
        let estimator = SizeEstimator::default();
        let mut other = appearance("Copy");
        other.icon_id = "unknown.symbol".to_string();
        assert_eq!(estimator.measure(&appearance("Copy")), estimator.measure(&other));
    }

    #[test]
    fn test_wide_characters_count_double() {
        let estimator = SizeEstimator::default();
        // Four CJK characters are eight cells wide
        assert_eq!(estimator.measure(&appearance("复制文本")).width, 4 + 8);
    }

    #[test]
    fn test_height_is_constant() {
        let style = ButtonStyle { height: 3, ..ButtonStyle::default() };
        let estimator = SizeEstimator::new(style);
        assert_eq!(estimator.measure(&appearance("")).height, 3);
        assert_eq!(estimator.measure(&appearance("A much longer label")).height, 3);
    }

    #[test]
    fn test_custom_insets() {
        let style = ButtonStyle {
            leading_inset: 2,
            icon_width: 2,
            icon_padding: 0,
            trailing_inset: 3,
            ..ButtonStyle::default()
        };
        assert_eq!(SizeEstimator::new(style).measure(&appearance("ab")).width, 2 + 2 + 0 + 2 + 3);
    }

    #[test]
    fn test_huge_label_saturates() {
        let label = "x".repeat(70_000);
        assert_eq!(SizeEstimator::default().measure(&appearance(&label)).width, u16::MAX);
    }
}
