//! Connection flow: health check and the periodic poller.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};

use super::{Flow, PageController};
use crate::api::BackendApi;
use crate::clipboard::Clipboard;
use crate::page::StatusIndicator;

/// How a call to [`PageController::check_connection`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// The indicator was updated.
    Applied(StatusIndicator),
    /// A newer check was already applied; this result was dropped.
    Stale,
}

impl<B: BackendApi, C: Clipboard> PageController<B, C> {
    /// Check the backend health endpoint and update the status indicator.
    pub fn check_connection(&self) -> ConnectionOutcome {
        let ticket = self.tickets.issue(Flow::Connection);

        let indicator = match self.backend.check_connection() {
            Ok(status) => StatusIndicator::from_status(&status),
            Err(e) => {
                self.record("connection", &e);
                StatusIndicator::network_error()
            }
        };

        let mut page = self.page();
        if !self.tickets.claim_connection(ticket) {
            return ConnectionOutcome::Stale;
        }
        page.connection = Some(indicator.clone());
        ConnectionOutcome::Applied(indicator)
    }
}

impl<B, C> PageController<B, C>
where
    B: BackendApi + 'static,
    C: Clipboard + 'static,
{
    /// Check the connection now and then every `interval` until the
    /// returned [`Poller`] is cancelled or dropped.
    pub fn start_polling(&self, interval: Duration) -> Result<Poller> {
        let controller = self.clone();
        Poller::spawn("connection-poll", interval, move || {
            controller.check_connection();
        })
    }
}

/// A cancellable task that runs a tick immediately and then once per
/// interval, at a fixed rate measured from when it was spawned.
///
/// Each tick runs on its own short-lived worker thread, so a slow tick never
/// pushes back the next one and ticks may overlap. Cancelling (or dropping
/// the handle) stops the schedule and waits for every in-flight tick, so
/// nothing runs after [`Poller::cancel`] returns.
#[derive(Debug)]
pub struct Poller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn spawn<F>(name: &str, interval: Duration, tick: F) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        ensure!(!interval.is_zero(), "{name} interval must be greater than zero");

        let (stop, stopped) = mpsc::channel::<()>();
        let tick = Arc::new(tick);
        let worker_name = format!("{name}-tick");

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut workers: Vec<JoinHandle<()>> = Vec::new();
                let mut deadline = Instant::now();
                loop {
                    workers.retain(|w| !w.is_finished());
                    let tick = Arc::clone(&tick);
                    if let Ok(worker) = thread::Builder::new()
                        .name(worker_name.clone())
                        .spawn(move || (*tick)())
                    {
                        workers.push(worker);
                    }

                    // Missed deadlines are skipped rather than fired in a burst.
                    let now = Instant::now();
                    deadline = (deadline + interval).max(now);
                    match stopped.recv_timeout(deadline.saturating_duration_since(now)) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                for worker in workers {
                    let _ = worker.join();
                }
            })
            .with_context(|| format!("failed to spawn {name} thread"))?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Stop polling and wait for the scheduler and any in-flight tick.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
