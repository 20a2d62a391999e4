use thiserror::Error;

/// Top-level error type for the `gibmac-api` crate.
///
/// Covers every failure mode of fetching an upstream resource:
/// transport, HTTP status, and writing the result to disk.
/// `gibmac-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Failed to build the underlying HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The server answered with a non-success status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    // ── Local filesystem ────────────────────────────────────────────
    /// Writing the downloaded body to disk failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } => true,
            _ => false,
        }
    }
}
