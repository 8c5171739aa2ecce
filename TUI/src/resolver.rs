use std::collections::HashMap;

use crate::action::MessageAction;

/// Supplies replacement labels and icon ids for actions.
///
/// Either method may return `None` (or an empty string) to keep the catalog
/// default for that field. The two fields fall back independently.
pub trait ActionOverrides {
    fn label(&self, action: MessageAction) -> Option<String> {
        let _ = action;
        None
    }

    fn icon(&self, action: MessageAction) -> Option<String> {
        let _ = action;
        None
    }
}

/// The label and icon id a button actually shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAppearance {
    pub label: String,
    pub icon_id: String,
}

/// Resolve the appearance of `action`, consulting `overrides` first.
///
/// Control characters are stripped from override labels since the buffer
/// never draws them; a label left empty falls back to the catalog.
pub fn resolve(action: MessageAction, overrides: Option<&dyn ActionOverrides>) -> ResolvedAppearance {
    let label = overrides
        .and_then(|o| o.label(action))
        .map(|l| l.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| action.default_label().to_string());
    let icon_id = overrides
        .and_then(|o| o.icon(action))
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| action.default_icon().to_string());

    ResolvedAppearance { label, icon_id }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct OverrideEntry {
    label: Option<String>,
    icon: Option<String>,
}

/// Map-backed override provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOverrides {
    entries: HashMap<MessageAction, OverrideEntry>,
}

impl TableOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_label(&mut self, action: MessageAction, label: impl Into<String>) {
        self.entries.entry(action).or_default().label = Some(label.into());
    }

    pub fn set_icon(&mut self, action: MessageAction, icon: impl Into<String>) {
        self.entries.entry(action).or_default().icon = Some(icon.into());
    }

    pub fn with_label(mut self, action: MessageAction, label: impl Into<String>) -> Self {
        self.set_label(action, label);
        self
    }

    pub fn with_icon(mut self, action: MessageAction, icon: impl Into<String>) -> Self {
        self.set_icon(action, icon);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ActionOverrides for TableOverrides {
    fn label(&self, action: MessageAction) -> Option<String> {
        self.entries.get(&action).and_then(|e| e.label.clone())
    }

    fn icon(&self, action: MessageAction) -> Option<String> {
        self.entries.get(&action).and_then(|e| e.icon.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_provider_uses_catalog() {
        for action in MessageAction::ALL {
            let resolved = resolve(action, None);
            assert_eq!(resolved.label, action.default_label());
            assert_eq!(resolved.icon_id, action.default_icon());
        }
    }

    #[test]
    fn test_label_only_override_keeps_icon() {
        for action in MessageAction::ALL {
            let overrides = TableOverrides::new().with_label(action, "Custom");
            let resolved = resolve(action, Some(&overrides));
            assert_eq!(resolved.label, "Custom");
            assert_eq!(resolved.icon_id, action.default_icon());
        }
    }

    #[test]
    fn test_copy_renamed_to_duplicate() {
        let overrides = TableOverrides::new().with_label(MessageAction::Copy, "Duplicate");
        assert_eq!(
            resolve(MessageAction::Copy, Some(&overrides)),
            ResolvedAppearance {
                label: "Duplicate".to_string(),
                icon_id: "doc.on.doc".to_string(),
            }
        );
        // Other actions are untouched
        assert_eq!(resolve(MessageAction::Share, Some(&overrides)).label, "Share");
    }

    #[test]
    fn test_icon_only_override_keeps_label() {
        let overrides = TableOverrides::new().with_icon(MessageAction::Share, "paperplane");
        let resolved = resolve(MessageAction::Share, Some(&overrides));
        assert_eq!(resolved.label, "Share");
        assert_eq!(resolved.icon_id, "paperplane");
    }

    #[test]
    fn test_empty_override_falls_back() {
        let overrides = TableOverrides::new()
            .with_label(MessageAction::Visualize, "")
            .with_icon(MessageAction::Visualize, "");
        assert_eq!(resolve(MessageAction::Visualize, Some(&overrides)), resolve(MessageAction::Visualize, None));
    }

    #[test]
    fn test_control_characters_are_stripped_from_labels() {
        let overrides = TableOverrides::new()
            .with_label(MessageAction::Copy, "a\tb\n")
            .with_label(MessageAction::Share, "\t\r\n");
        assert_eq!(resolve(MessageAction::Copy, Some(&overrides)).label, "ab");
        assert_eq!(resolve(MessageAction::Share, Some(&overrides)).label, "Share");
    }

    #[test]
    fn test_provider_changes_are_seen_on_next_resolve() {
        let mut overrides = TableOverrides::new();
        assert_eq!(resolve(MessageAction::Copy, Some(&overrides)).label, "Copy");
        overrides.set_label(MessageAction::Copy, "Grab");
        assert_eq!(resolve(MessageAction::Copy, Some(&overrides)).label, "Grab");
    }

    #[test]
    fn test_trait_defaults_are_no_ops() {
        struct Nothing;
        impl ActionOverrides for Nothing {}
        assert_eq!(resolve(MessageAction::SpeakOn, Some(&Nothing)), resolve(MessageAction::SpeakOn, None));
    }
}
