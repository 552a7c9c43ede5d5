use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::sync::watch;
use tracing::debug;

use super::request::{
    confirm_channel, prompt_channel, ConfirmOptions, DialogReply, DialogRequest, PromptOptions,
    Settlement,
};
use super::state::{DialogKind, DialogState, DEFAULT_CANCEL_LABEL, DEFAULT_CONFIRM_LABEL};

struct QueuedRequest {
    request: DialogRequest,
    settlement: Settlement,
}

struct DialogInner {
    state: DialogState,
    pending: Option<Settlement>,
    queue: VecDeque<QueuedRequest>,
    next_id: u64,
    watch_tx: watch::Sender<DialogState>,
}

impl DialogInner {
    fn new() -> Self {
        let (watch_tx, _) = watch::channel(DialogState::closed());
        Self {
            state: DialogState::closed(),
            pending: None,
            queue: VecDeque::new(),
            next_id: 0,
            watch_tx,
        }
    }

    fn open(&mut self, request: DialogRequest, settlement: Settlement) {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let id = self.next_id;
        self.state = match request {
            DialogRequest::Confirm(options) => DialogState {
                is_open: true,
                kind: DialogKind::Confirm,
                id,
                title: options.title,
                message: options.message,
                confirm_label: options
                    .confirm_label
                    .unwrap_or_else(|| DEFAULT_CONFIRM_LABEL.to_string()),
                cancel_label: options
                    .cancel_label
                    .unwrap_or_else(|| DEFAULT_CANCEL_LABEL.to_string()),
                require_value: false,
                input_value: String::new(),
            },
            DialogRequest::Prompt(options) => DialogState {
                is_open: true,
                kind: DialogKind::Prompt,
                id,
                title: options.title,
                message: options.message,
                confirm_label: options
                    .confirm_label
                    .unwrap_or_else(|| DEFAULT_CONFIRM_LABEL.to_string()),
                cancel_label: options
                    .cancel_label
                    .unwrap_or_else(|| DEFAULT_CANCEL_LABEL.to_string()),
                require_value: options.require_value,
                input_value: options.initial_value.unwrap_or_default(),
            },
        };
        self.pending = Some(settlement);
        debug!(id, kind = %self.state.kind, "dialog opened");
    }

    fn advance(&mut self) {
        self.state = DialogState::closed();
        if let Some(next) = self.queue.pop_front() {
            self.open(next.request, next.settlement);
        }
        self.publish();
    }

    fn publish(&self) {
        self.state.assert_invariants();
        self.watch_tx.send_replace(self.state.clone());
    }
}

/// Clones share one modal slot. Not `Send`.
#[derive(Clone)]
pub struct DialogService {
    inner: Rc<RefCell<DialogInner>>,
}

impl Default for DialogService {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogService {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DialogInner::new())),
        }
    }

    pub fn confirm(&self, options: ConfirmOptions) -> DialogReply<bool> {
        let (settlement, reply) = confirm_channel();
        self.submit(DialogRequest::Confirm(options), settlement);
        reply
    }

    pub fn prompt(&self, options: PromptOptions) -> DialogReply<Option<String>> {
        let (settlement, reply) = prompt_channel();
        self.submit(DialogRequest::Prompt(options), settlement);
        reply
    }

    fn submit(&self, request: DialogRequest, settlement: Settlement) {
        let mut inner = self.inner.borrow_mut();
        if inner.state.is_open {
            inner.queue.push_back(QueuedRequest {
                request,
                settlement,
            });
            debug!(
                open_id = inner.state.id,
                queued = inner.queue.len(),
                "dialog busy, request queued"
            );
            return;
        }
        inner.open(request, settlement);
        inner.publish();
    }

    pub fn confirm_dialog(&self) {
        let (id, settlement, value) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_open {
                debug!("confirm ignored: no dialog open");
                return;
            }
            if inner.state.is_confirm_disabled() {
                debug!(id = inner.state.id, "confirm ignored: value required");
                return;
            }
            let Some(settlement) = inner.pending.take() else {
                return;
            };
            let id = inner.state.id;
            let value = std::mem::take(&mut inner.state.input_value);
            inner.advance();
            (id, settlement, value)
        };
        if !settlement.accept(value) {
            debug!(id, "dialog confirmed after caller dropped its reply");
        }
    }

    pub fn cancel_dialog(&self) {
        let (id, settlement) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_open {
                debug!("cancel ignored: no dialog open");
                return;
            }
            let Some(settlement) = inner.pending.take() else {
                return;
            };
            let id = inner.state.id;
            inner.advance();
            (id, settlement)
        };
        if !settlement.cancel() {
            debug!(id, "dialog cancelled after caller dropped its reply");
        }
    }

    pub fn update_input_value(&self, value: impl Into<String>) {
        let mut inner = self.inner.borrow_mut();
        if inner.state.kind != DialogKind::Prompt {
            debug!(kind = %inner.state.kind, "input update ignored: no prompt open");
            return;
        }
        inner.state.input_value = value.into();
        inner.publish();
    }

    pub fn reset(&self) {
        let settlements = {
            let mut inner = self.inner.borrow_mut();
            let mut settlements: Vec<Settlement> = inner.pending.take().into_iter().collect();
            settlements.extend(inner.queue.drain(..).map(|queued| queued.settlement));
            inner.state = DialogState::closed();
            inner.publish();
            settlements
        };
        if !settlements.is_empty() {
            debug!(count = settlements.len(), "dialog service reset");
        }
        for settlement in settlements {
            settlement.cancel();
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().state.is_open
    }

    pub fn kind(&self) -> DialogKind {
        self.inner.borrow().state.kind
    }

    pub fn is_confirm_disabled(&self) -> bool {
        self.inner.borrow().state.is_confirm_disabled()
    }

    pub fn queued_len(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    pub fn snapshot(&self) -> DialogState {
        self.inner.borrow().state.clone()
    }

    pub fn watch(&self) -> watch::Receiver<DialogState> {
        self.inner.borrow().watch_tx.subscribe()
    }
}
