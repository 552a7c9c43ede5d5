use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectAll,
    CloseModal,
    ClearSelection,
    Delete,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcutContext {
    pub modal_open: bool,
    pub selection_len: usize,
}

pub fn dispatch_shortcut(
    key: KeyCode,
    modifiers: KeyModifiers,
    ctx: ShortcutContext,
) -> Option<ShortcutAction> {
    match key {
        KeyCode::Char('a') | KeyCode::Char('A') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ShortcutAction::SelectAll)
        }
        KeyCode::Esc => {
            if ctx.modal_open {
                Some(ShortcutAction::CloseModal)
            } else {
                Some(ShortcutAction::ClearSelection)
            }
        }
        KeyCode::Delete if ctx.selection_len > 0 => Some(ShortcutAction::Delete),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Selection<Id: Ord> {
    ids: BTreeSet<Id>,
}

impl<Id: Ord> Default for Selection<Id> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> Selection<Id> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    pub fn toggle(&mut self, id: Id) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a Id>)
    where
        Id: 'a,
    {
        self.ids.extend(ids.into_iter().cloned());
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }

    pub fn apply<'a>(&mut self, action: ShortcutAction, selectable: impl IntoIterator<Item = &'a Id>)
    where
        Id: 'a,
    {
        match action {
            ShortcutAction::SelectAll => self.select_all(selectable),
            ShortcutAction::ClearSelection => self.clear(),
            ShortcutAction::CloseModal | ShortcutAction::Delete => {}
        }
    }

    pub fn context(&self, modal_open: bool) -> ShortcutContext {
        ShortcutContext {
            modal_open,
            selection_len: self.len(),
        }
    }
}
