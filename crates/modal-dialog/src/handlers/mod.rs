pub mod dialog_keys;
pub mod shortcuts;

pub use dialog_keys::{DialogButton, DialogKeyHandler};
pub use shortcuts::{dispatch_shortcut, Selection, ShortcutAction, ShortcutContext};
