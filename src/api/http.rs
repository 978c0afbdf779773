/// HTTP client for the code-generation backend.
///
/// Uses the synchronous `ureq` client. Every call blocks the calling thread
/// until the backend answers or the timeout expires; the page controller
/// releases its view-model lock while a call is in flight.
use std::time::Duration;

use anyhow::{Context, Result};

use super::BackendApi;
use super::types::{ConnectionStatus, GenerationResult, HistoryId, HistoryItem};
use crate::config::schema::BackendConfig;

/// Synchronous backend client.
///
/// Created once per session from a [`BackendConfig`] and shared by all flows.
#[derive(Debug)]
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpBackend {
    /// Build a client from the resolved config.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            &config.base_url,
            Duration::from_millis(config.timeout_ms),
            Duration::from_millis(config.health_timeout_ms),
        )
    }

    /// Build a client for `base_url` with explicit timeouts.
    ///
    /// Resolves `localhost` to `127.0.0.1` to avoid IPv6 lookup delays when
    /// the backend only binds IPv4.
    pub fn new(base_url: &str, timeout: Duration, health_timeout: Duration) -> Self {
        let base_url = base_url
            .trim_end_matches('/')
            .replace("://localhost", "://127.0.0.1");

        Self {
            base_url,
            agent: ureq::AgentBuilder::new().build(),
            timeout,
            health_timeout,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl BackendApi for HttpBackend {
    fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let url = self.endpoint("/generate-code");

        let resp = self
            .agent
            .post(&url)
            .timeout(self.timeout)
            .send_form(&[("prompt", prompt)])
            .map_err(|e| request_error(e, "generate request"))?;

        resp.into_json()
            .context("failed to parse generate response")
    }

    fn check_connection(&self) -> Result<ConnectionStatus> {
        let url = self.endpoint("/check-connection");

        // The status payload is read regardless of the HTTP status: an
        // unhealthy backend may answer 503 with `{"status": ..., "detail": ...}`.
        let resp = match self.agent.get(&url).timeout(self.health_timeout).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(err) => return Err(request_error(err, "connection check")),
        };

        resp.into_json()
            .context("failed to parse connection status")
    }

    fn history(&self) -> Result<Vec<HistoryItem>> {
        let url = self.endpoint("/history");

        let resp = self
            .agent
            .get(&url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| request_error(e, "history request"))?;

        resp.into_json().context("failed to parse history response")
    }

    fn delete_history(&self, id: &HistoryId) -> Result<()> {
        let url = self.endpoint(&format!("/history/{}", encode_path_segment(&id.to_string())));

        self.agent
            .delete(&url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| request_error(e, "history delete"))?;

        Ok(())
    }
}

/// Turn a `ureq` error into an `anyhow` error that names the HTTP status
/// when there is one.
fn request_error(err: ureq::Error, what: &str) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, _) => anyhow::anyhow!("{what} failed: backend returned HTTP {code}"),
        other => anyhow::Error::new(other).context(format!("{what} failed")),
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved set kept).
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
