use std::fmt;

/// Lifecycle of an [`super::OptionPanel`].
///
/// `Unloaded -> Loaded -> Editing -> Saving -> Loaded`, with
/// `Saving -> Failed` on partial failure and `Failed -> Editing` on the next
/// edit. A save whose future was dropped leaves the panel in `Saving`; the
/// next edit or save continues from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Unloaded,
    Loaded,
    Editing,
    Saving,
    Failed,
}

impl PanelState {
    pub const fn is_loaded(self) -> bool {
        !matches!(self, Self::Unloaded)
    }

    /// Whether `next` is a legal successor of `self`.
    pub const fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (_, Self::Loaded)
                | (
                    Self::Loaded | Self::Editing | Self::Saving | Self::Failed,
                    Self::Editing | Self::Saving
                )
                | (Self::Saving, Self::Failed)
        )
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unloaded => "unloaded",
            Self::Loaded => "loaded",
            Self::Editing => "editing",
            Self::Saving => "saving",
            Self::Failed => "failed",
        };
        formatter.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_only_moves_to_loaded() {
        assert!(PanelState::Unloaded.allows(PanelState::Loaded));
        assert!(!PanelState::Unloaded.allows(PanelState::Editing));
        assert!(!PanelState::Unloaded.allows(PanelState::Saving));
    }

    #[test]
    fn failed_returns_to_editing_or_retries() {
        assert!(PanelState::Saving.allows(PanelState::Failed));
        assert!(PanelState::Failed.allows(PanelState::Editing));
        assert!(PanelState::Failed.allows(PanelState::Saving));
        assert!(!PanelState::Loaded.allows(PanelState::Failed));
    }

    #[test]
    fn interrupted_save_can_be_edited_or_resaved() {
        assert!(PanelState::Saving.allows(PanelState::Editing));
        assert!(PanelState::Saving.allows(PanelState::Saving));
        assert!(PanelState::Saving.allows(PanelState::Loaded));
    }
}
