use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub message: String,
    pub title: Option<String>,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
}

impl ConfirmOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: None,
            confirm_label: None,
            cancel_label: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = Some(confirm.into());
        self.cancel_label = Some(cancel.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub message: String,
    pub title: Option<String>,
    pub require_value: bool,
    pub initial_value: Option<String>,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
}

impl PromptOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: None,
            require_value: false,
            initial_value: None,
            confirm_label: None,
            cancel_label: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn require_value(mut self, require_value: bool) -> Self {
        self.require_value = require_value;
        self
    }

    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = Some(confirm.into());
        self.cancel_label = Some(cancel.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DialogRequest {
    Confirm(ConfirmOptions),
    Prompt(PromptOptions),
}

#[derive(Debug)]
pub(crate) enum Settlement {
    Confirm(oneshot::Sender<bool>),
    Prompt(oneshot::Sender<Option<String>>),
}

impl Settlement {
    pub(crate) fn accept(self, input_value: String) -> bool {
        match self {
            Self::Confirm(tx) => tx.send(true).is_ok(),
            Self::Prompt(tx) => tx.send(Some(input_value)).is_ok(),
        }
    }

    pub(crate) fn cancel(self) -> bool {
        match self {
            Self::Confirm(tx) => tx.send(false).is_ok(),
            Self::Prompt(tx) => tx.send(None).is_ok(),
        }
    }
}

/// Resolves to the cancellation value if the service goes away unsettled.
#[derive(Debug)]
#[must_use = "a dialog reply does nothing unless awaited"]
pub struct DialogReply<T> {
    rx: oneshot::Receiver<T>,
    cancelled: fn() -> T,
}

impl<T> DialogReply<T> {
    pub(crate) fn new(rx: oneshot::Receiver<T>, cancelled: fn() -> T) -> Self {
        Self { rx, cancelled }
    }
}

impl<T> Future for DialogReply<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let cancelled = self.cancelled;
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or_else(|_| cancelled()))
    }
}

pub(crate) fn confirm_channel() -> (Settlement, DialogReply<bool>) {
    let (tx, rx) = oneshot::channel();
    (Settlement::Confirm(tx), DialogReply::new(rx, || false))
}

pub(crate) fn prompt_channel() -> (Settlement, DialogReply<Option<String>>) {
    let (tx, rx) = oneshot::channel();
    (Settlement::Prompt(tx), DialogReply::new(rx, || None))
}
