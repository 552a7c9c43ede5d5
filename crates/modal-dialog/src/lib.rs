pub mod catalog;
pub mod config;
pub mod dialog;
pub mod handlers;
pub mod input;
pub mod logging;
pub mod poller;
pub mod storage;

pub use catalog::{Adapter, AdapterCatalog, AdapterSource, CatalogError, JsonAdapterSource};
pub use config::Config;
pub use dialog::{
    ConfirmOptions, DialogKind, DialogReply, DialogService, DialogState, PromptOptions,
};
pub use handlers::{
    dispatch_shortcut, DialogButton, DialogKeyHandler, Selection, ShortcutAction,
    ShortcutContext,
};
pub use input::InputState;
pub use poller::JobPoller;
pub use storage::{FileStore, KeyValueStore, MemoryStore, Persistence, StorageError};
