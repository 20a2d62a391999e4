// ── Core error types ──
//
// User-facing errors from gibmac-core. Consumers never see reqwest errors
// or raw HTTP plumbing directly. The `From<gibmac_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fetch errors ─────────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Resource {url} is unavailable (HTTP {status})")]
    ResourceUnavailable { url: String, status: u16 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid board map: {message}")]
    InvalidBoardMap { message: String },

    // ── Selection errors ─────────────────────────────────────────────
    #[error("No target {missing} selected")]
    IncompleteSelection { missing: &'static str },

    #[error("Interactive prompt failed: {message}")]
    Prompt { message: String },

    // ── Downloader errors ────────────────────────────────────────────
    #[error("Downloader script not found at {path}")]
    DownloaderMissing { path: String },

    #[error("Could not launch {program}: {reason}")]
    DownloaderLaunch { program: String, reason: String },

    #[error("Downloader exited with {}", exit_description(.code.as_ref()))]
    DownloaderFailed { code: Option<i32> },

    // ── Filesystem errors ────────────────────────────────────────────
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an I/O error with a short description of what was attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn exit_description(code: Option<&i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".into(),
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gibmac_api::Error> for CoreError {
    fn from(err: gibmac_api::Error) -> Self {
        match err {
            // Timeouts arrive as `Error::Timeout` carrying the configured limit.
            gibmac_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            gibmac_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            gibmac_api::Error::ClientBuild(message) => CoreError::Internal(message),
            gibmac_api::Error::Status { url, status } => {
                CoreError::ResourceUnavailable { url, status }
            }
            gibmac_api::Error::Write { path, source } => CoreError::Io {
                context: format!("failed to write {path}"),
                source,
            },
        }
    }
}
