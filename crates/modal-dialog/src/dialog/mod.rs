//! Modal dialog orchestration: one slot, requests queued FIFO behind it.

mod request;
mod service;
mod state;

pub use request::{ConfirmOptions, DialogReply, PromptOptions};
pub use service::DialogService;
pub use state::{DialogKind, DialogState, DEFAULT_CANCEL_LABEL, DEFAULT_CONFIRM_LABEL};
