use std::cell::Cell;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

struct PollerInner<F> {
    fetch_jobs: F,
    interval: Duration,
    in_flight: Cell<bool>,
    disabled: watch::Sender<bool>,
}

pub struct JobPoller<F> {
    inner: Rc<PollerInner<F>>,
}

impl<F> Clone for JobPoller<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<F, Fut, E> JobPoller<F>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    pub fn new(interval: Duration, fetch_jobs: F) -> Self {
        let (disabled, _) = watch::channel(false);
        Self {
            inner: Rc::new(PollerInner {
                fetch_jobs,
                interval,
                in_flight: Cell::new(false),
                disabled,
            }),
        }
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub fn is_disabled(&self) -> bool {
        *self.inner.disabled.borrow()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.disabled.send_replace(disabled);
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.in_flight.get()
    }

    /// Returns false when skipped.
    pub async fn refresh(&self) -> bool {
        if self.is_disabled() {
            debug!("job refresh skipped: poller disabled");
            return false;
        }
        if self.inner.in_flight.replace(true) {
            debug!("job refresh skipped: fetch already in flight");
            return false;
        }
        let _guard = InFlightGuard(&self.inner.in_flight);
        if let Err(error) = (self.inner.fetch_jobs)().await {
            warn!(%error, "job fetch failed");
        }
        true
    }

    pub async fn run(&self) {
        let mut disabled = self.inner.disabled.subscribe();
        if *disabled.borrow_and_update() {
            return;
        }
        self.refresh().await;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.inner.interval) => {}
                _ = disabled.wait_for(|value| *value) => {
                    debug!("job poller stopped");
                    return;
                }
            }
            if self.is_disabled() {
                return;
            }
            self.refresh().await;
        }
    }
}
