use std::fmt;

pub const DEFAULT_CONFIRM_LABEL: &str = "OK";
pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogKind {
    #[default]
    None,
    Confirm,
    Prompt,
}

impl DialogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Confirm => "confirm",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub is_open: bool,
    pub kind: DialogKind,
    pub id: u64,
    pub title: Option<String>,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub require_value: bool,
    pub input_value: String,
}

impl Default for DialogState {
    fn default() -> Self {
        Self::closed()
    }
}

impl DialogState {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            kind: DialogKind::None,
            id: 0,
            title: None,
            message: String::new(),
            confirm_label: DEFAULT_CONFIRM_LABEL.to_string(),
            cancel_label: DEFAULT_CANCEL_LABEL.to_string(),
            require_value: false,
            input_value: String::new(),
        }
    }

    pub fn is_confirm_disabled(&self) -> bool {
        self.kind == DialogKind::Prompt && self.require_value && self.input_value.trim().is_empty()
    }

    pub(crate) fn assert_invariants(&self) {
        debug_assert!(
            self.is_open == (self.kind != DialogKind::None),
            "dialog invariant failed: open={} kind={}",
            self.is_open,
            self.kind
        );
        debug_assert!(
            self.is_open || self.id == 0,
            "dialog invariant failed: closed dialog kept id={}",
            self.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogKind, DialogState};

    fn prompt_state(require_value: bool, input_value: &str) -> DialogState {
        DialogState {
            is_open: true,
            kind: DialogKind::Prompt,
            id: 1,
            require_value,
            input_value: input_value.to_string(),
            ..DialogState::closed()
        }
    }

    #[test]
    fn closed_state_has_no_kind() {
        let state = DialogState::closed();
        assert!(!state.is_open);
        assert_eq!(state.kind, DialogKind::None);
        assert!(!state.is_confirm_disabled());
        state.assert_invariants();
    }

    #[test]
    fn confirm_disabled_only_for_blank_required_prompt() {
        assert!(prompt_state(true, "").is_confirm_disabled());
        assert!(prompt_state(true, "  \t ").is_confirm_disabled());
        assert!(!prompt_state(true, " x ").is_confirm_disabled());
        assert!(!prompt_state(false, "").is_confirm_disabled());
    }

    #[test]
    fn confirm_kind_never_disables_confirmation() {
        let state = DialogState {
            is_open: true,
            kind: DialogKind::Confirm,
            id: 3,
            require_value: true,
            ..DialogState::closed()
        };
        assert!(!state.is_confirm_disabled());
    }

    #[test]
    fn kind_labels_match_reactive_names() {
        assert_eq!(DialogKind::None.to_string(), "none");
        assert_eq!(DialogKind::Confirm.to_string(), "confirm");
        assert_eq!(DialogKind::Prompt.to_string(), "prompt");
    }
}
