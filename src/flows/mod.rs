//! Page controller: the four user-facing flows.
//!
//! | Flow       | Entry point                                    | Module         |
//! |------------|------------------------------------------------|----------------|
//! | Generation | [`PageController::generate`]                   | [`generate`]   |
//! | Copy       | [`PageController::copy_code`]                  | [`copy`]       |
//! | Connection | [`PageController::check_connection`], [`Poller`] | [`connection`] |
//! | History    | [`PageController::open_history`] and friends   | [`history`]    |
//!
//! Each flow locks the shared [`PageState`] only for its synchronous steps
//! and never across a backend call, so a slow request doesn't freeze the
//! other flows. Requests are stamped with a per-flow ticket so that a late
//! response never overwrites state produced by a newer request.

pub mod connection;
pub mod copy;
pub mod generate;
pub mod history;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub use connection::{ConnectionOutcome, Poller};
pub use copy::CopyOutcome;
pub use generate::GenerateOutcome;
pub use history::HistoryOutcome;

use crate::api::BackendApi;
use crate::clipboard::Clipboard;
use crate::diagnostics::Diagnostics;
use crate::page::PageState;

/// Default lifetime of the "copied" toast.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(2_000);

/// Flows that issue backend requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Generation,
    Connection,
    History,
}

/// Monotonic request counters, one per flow.
#[derive(Debug, Default)]
struct Tickets {
    generation: AtomicU64,
    connection: AtomicU64,
    history: AtomicU64,
    connection_applied: AtomicU64,
}

impl Tickets {
    fn counter(&self, flow: Flow) -> &AtomicU64 {
        match flow {
            Flow::Generation => &self.generation,
            Flow::Connection => &self.connection,
            Flow::History => &self.history,
        }
    }

    /// Start a new request; every earlier ticket of `flow` becomes stale.
    fn issue(&self, flow: Flow) -> u64 {
        self.counter(flow).fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, flow: Flow, ticket: u64) -> bool {
        self.counter(flow).load(Ordering::SeqCst) == ticket
    }

    /// Record that a connection result with `ticket` is being applied.
    ///
    /// Returns `false` when a newer connection result was already applied.
    fn claim_connection(&self, ticket: u64) -> bool {
        self.connection_applied.fetch_max(ticket, Ordering::SeqCst) <= ticket
    }
}

/// Drives the page flows against a backend and a clipboard.
///
/// Cheap to clone: clones share the same page state, backend and tickets,
/// which is how the connection poller runs beside the interactive flows.
pub struct PageController<B, C> {
    backend: Arc<B>,
    clipboard: Arc<C>,
    page: Arc<Mutex<PageState>>,
    tickets: Arc<Tickets>,
    diagnostics: Diagnostics,
    toast_ttl: Duration,
}

impl<B, C> Clone for PageController<B, C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clipboard: Arc::clone(&self.clipboard),
            page: Arc::clone(&self.page),
            tickets: Arc::clone(&self.tickets),
            diagnostics: self.diagnostics.clone(),
            toast_ttl: self.toast_ttl,
        }
    }
}

impl<B: BackendApi, C: Clipboard> PageController<B, C> {
    pub fn new(backend: B, clipboard: C, diagnostics: Diagnostics) -> Self {
        Self {
            backend: Arc::new(backend),
            clipboard: Arc::new(clipboard),
            page: Arc::new(Mutex::new(PageState::new())),
            tickets: Arc::new(Tickets::default()),
            diagnostics,
            toast_ttl: DEFAULT_TOAST_TTL,
        }
    }

    /// Override how long the "copied" toast stays visible.
    pub fn with_toast_ttl(mut self, ttl: Duration) -> Self {
        self.toast_ttl = ttl;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lock the page state.
    ///
    /// A panic in another flow while holding the lock leaves the state
    /// usable, so poisoning is ignored.
    pub fn page(&self) -> MutexGuard<'_, PageState> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the page state.
    pub fn snapshot(&self) -> PageState {
        self.page().clone()
    }

    /// Type into the prompt field.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.page().prompt = prompt.into();
    }

    fn record(&self, flow: &str, error: &anyhow::Error) {
        self.diagnostics.record(flow, &format!("{error:#}"));
    }
}
