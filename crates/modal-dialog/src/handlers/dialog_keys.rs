use crate::dialog::{DialogKind, DialogService, DialogState};
use crate::input::InputState;
use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogButton {
    #[default]
    Confirm,
    Cancel,
}

impl DialogButton {
    fn toggle(self) -> Self {
        match self {
            Self::Confirm => Self::Cancel,
            Self::Cancel => Self::Confirm,
        }
    }
}

pub struct DialogKeyHandler {
    dialogs: DialogService,
    editor: InputState,
    synced_id: u64,
    focused: DialogButton,
}

impl DialogKeyHandler {
    pub fn new(dialogs: DialogService) -> Self {
        Self {
            dialogs,
            editor: InputState::default(),
            synced_id: 0,
            focused: DialogButton::Confirm,
        }
    }

    pub fn editor(&self) -> &InputState {
        &self.editor
    }

    pub fn focused(&self) -> DialogButton {
        self.focused
    }

    pub fn sync(&mut self) -> bool {
        let state = self.dialogs.snapshot();
        self.sync_with(&state)
    }

    fn sync_with(&mut self, state: &DialogState) -> bool {
        if state.id == self.synced_id {
            if state.kind == DialogKind::Prompt && state.input_value != self.editor.current() {
                self.editor.set_from(&state.input_value);
            }
            return false;
        }
        self.synced_id = state.id;
        self.focused = DialogButton::Confirm;
        self.editor.set_from(&state.input_value);
        true
    }

    /// `None` when no dialog is open; otherwise whether a redraw is needed.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<bool> {
        let state = self.dialogs.snapshot();
        self.sync_with(&state);
        match state.kind {
            DialogKind::None => None,
            DialogKind::Confirm => Some(self.handle_confirm_key(key)),
            DialogKind::Prompt => Some(self.handle_prompt_key(key, modifiers)),
        }
    }

    pub fn handle_paste(&mut self, text: &str) -> bool {
        let state = self.dialogs.snapshot();
        self.sync_with(&state);
        if state.kind != DialogKind::Prompt || text.is_empty() {
            return false;
        }
        self.editor.insert_str(&text.replace(['\r', '\n'], " "));
        self.push_input();
        true
    }

    fn activate(&mut self, button: DialogButton) {
        match button {
            DialogButton::Confirm => self.dialogs.confirm_dialog(),
            DialogButton::Cancel => self.dialogs.cancel_dialog(),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.focused = self.focused.toggle();
                true
            }
            KeyCode::Enter => {
                self.activate(self.focused);
                true
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.dialogs.confirm_dialog();
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.dialogs.cancel_dialog();
                true
            }
            _ => false,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        let control = modifiers.contains(KeyModifiers::CONTROL);
        let edited = match key {
            KeyCode::Enter => {
                self.activate(self.focused);
                return true;
            }
            KeyCode::Esc => {
                self.dialogs.cancel_dialog();
                return true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focused = self.focused.toggle();
                return true;
            }
            KeyCode::Left => {
                self.editor.move_left();
                return true;
            }
            KeyCode::Right => {
                self.editor.move_right();
                return true;
            }
            KeyCode::Home => {
                self.editor.move_home();
                return true;
            }
            KeyCode::End => {
                self.editor.move_end();
                return true;
            }
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Char('w') if control => self.editor.delete_word_back(),
            KeyCode::Char('k') if control => self.editor.kill_to_end(),
            KeyCode::Char('u') if control => {
                let had_text = !self.editor.buffer.is_empty();
                self.editor.clear();
                had_text
            }
            KeyCode::Char(ch) => {
                if control || modifiers.contains(KeyModifiers::ALT) {
                    return false;
                }
                self.editor.insert_char(ch);
                true
            }
            _ => return false,
        };
        if edited {
            self.push_input();
        }
        edited
    }

    fn push_input(&self) {
        self.dialogs.update_input_value(self.editor.current());
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogButton, DialogKeyHandler};
    use crate::dialog::{ConfirmOptions, DialogService, PromptOptions};
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures::FutureExt;

    fn type_text(handler: &mut DialogKeyHandler, text: &str) {
        for ch in text.chars() {
            handler.handle_key(KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    #[test]
    fn keys_are_not_handled_without_open_dialog() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs);
        assert_eq!(handler.handle_key(KeyCode::Enter, KeyModifiers::NONE), None);
        assert!(!handler.handle_paste("text"));
    }

    #[tokio::test]
    async fn confirm_enter_and_escape_settle_dialog() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());

        let reply = dialogs.confirm(ConfirmOptions::new("Apply?"));
        assert_eq!(handler.handle_key(KeyCode::Enter, KeyModifiers::NONE), Some(true));
        assert!(reply.await);

        let reply = dialogs.confirm(ConfirmOptions::new("Apply again?"));
        handler.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!reply.await);
    }

    #[tokio::test]
    async fn confirm_focus_moves_to_cancel_button() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let reply = dialogs.confirm(ConfirmOptions::new("Remove?"));

        handler.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(handler.focused(), DialogButton::Cancel);
        handler.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!reply.await);
    }

    #[tokio::test]
    async fn focus_resets_for_next_request() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let first = dialogs.confirm(ConfirmOptions::new("First?"));
        handler.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        handler.handle_key(KeyCode::Char('y'), KeyModifiers::NONE);
        assert!(first.await);

        let second = dialogs.confirm(ConfirmOptions::new("Second?"));
        assert!(handler.sync());
        assert_eq!(handler.focused(), DialogButton::Confirm);
        handler.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(second.await);
    }

    #[tokio::test]
    async fn typed_prompt_text_flows_into_service() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let mut reply = dialogs.prompt(PromptOptions::new("Name the preset").require_value(true));

        handler.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(dialogs.is_open());
        assert!((&mut reply).now_or_never().is_none());

        type_text(&mut handler, "My Presett");
        handler.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(dialogs.snapshot().input_value, "My Preset");
        assert!(!dialogs.is_confirm_disabled());

        handler.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(reply.await, Some("My Preset".to_string()));
    }

    #[tokio::test]
    async fn prompt_editor_is_seeded_from_initial_value() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let reply = dialogs.prompt(PromptOptions::new("Rename").initial_value("old name"));

        handler.handle_key(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(handler.editor().current(), "old ");
        type_text(&mut handler, "new");
        handler.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(reply.await, Some("old new".to_string()));
    }

    #[tokio::test]
    async fn outside_update_is_kept_by_next_keystroke() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let reply = dialogs.prompt(PromptOptions::new("Name the preset"));

        type_text(&mut handler, "a");
        dialogs.update_input_value("My Preset");
        type_text(&mut handler, "!");
        assert_eq!(handler.editor().cursor, "My Preset!".len());

        dialogs.confirm_dialog();
        assert_eq!(reply.await, Some("My Preset!".to_string()));
    }

    #[tokio::test]
    async fn prompt_escape_cancels_with_none() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let reply = dialogs.prompt(PromptOptions::new("Name again"));
        type_text(&mut handler, "draft");
        handler.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(reply.await, None);
    }

    #[tokio::test]
    async fn control_chords_do_not_insert_text() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let _reply = dialogs.prompt(PromptOptions::new("Name"));
        assert_eq!(
            handler.handle_key(KeyCode::Char('x'), KeyModifiers::CONTROL),
            Some(false)
        );
        assert_eq!(dialogs.snapshot().input_value, "");
    }

    #[tokio::test]
    async fn paste_flattens_newlines() {
        let dialogs = DialogService::new();
        let mut handler = DialogKeyHandler::new(dialogs.clone());
        let reply = dialogs.prompt(PromptOptions::new("Paste"));
        assert!(handler.handle_paste("a\nb"));
        dialogs.confirm_dialog();
        assert_eq!(reply.await, Some("a b".to_string()));
    }
}
