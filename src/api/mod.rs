/// Backend API for the code-generation service.
///
/// The page controller only talks to the backend through [`BackendApi`], so
/// every flow can run against an in-memory fake in tests. [`HttpBackend`] is
/// the real implementation over HTTP.
///
/// # Endpoints
///
/// | Method   | Path                | Body / result                                   |
/// |----------|---------------------|-------------------------------------------------|
/// | `POST`   | `/generate-code`    | form `prompt=<text>` → [`GenerationResult`]     |
/// | `GET`    | `/check-connection` | → [`ConnectionStatus`]                          |
/// | `GET`    | `/history`          | → `Vec<`[`HistoryItem`]`>`                      |
/// | `DELETE` | `/history/{id}`     | result not inspected beyond transport success   |
use anyhow::Result;

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{ConnectionStatus, GenerationResult, HistoryId, HistoryItem, ResourceLink};

/// Operations the page needs from the backend.
///
/// Implementations must be shareable across threads: the connection poller
/// runs on its own thread while the user drives the other flows.
pub trait BackendApi: Send + Sync {
    /// Submit a prompt for code generation.
    ///
    /// Non-2xx responses are errors.
    fn generate(&self, prompt: &str) -> Result<GenerationResult>;

    /// Query the health endpoint.
    ///
    /// Returns `Ok` whenever a status payload could be read, even from an
    /// error response. `Err` means the backend could not be reached or sent
    /// something that is not a status payload.
    fn check_connection(&self) -> Result<ConnectionStatus>;

    /// Fetch the complete request history (no pagination).
    fn history(&self) -> Result<Vec<HistoryItem>>;

    /// Delete one history item.
    fn delete_history(&self, id: &HistoryId) -> Result<()>;
}

impl<T: BackendApi + ?Sized> BackendApi for std::sync::Arc<T> {
    fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        (**self).generate(prompt)
    }

    fn check_connection(&self) -> Result<ConnectionStatus> {
        (**self).check_connection()
    }

    fn history(&self) -> Result<Vec<HistoryItem>> {
        (**self).history()
    }

    fn delete_history(&self, id: &HistoryId) -> Result<()> {
        (**self).delete_history(id)
    }
}
