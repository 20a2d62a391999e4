//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use gibmac_config::ConfigError;
use gibmac_core::CoreError;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DOWNLOADER: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetching ─────────────────────────────────────────────────────
    #[error("Could not reach {url}")]
    #[diagnostic(
        code(gibmac::connection_failed),
        help(
            "Check your network connection, or point [sources] in the config\n\
             file at a reachable mirror."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(gibmac::timeout),
        help("Increase the timeout with --timeout or `timeout` in the config file.")
    )]
    Timeout { seconds: u64 },

    #[error("{url} returned HTTP {status}")]
    #[diagnostic(
        code(gibmac::resource_unavailable),
        help("The upstream file may have moved. Check the URLs under [sources].")
    )]
    ResourceUnavailable { url: String, status: u16 },

    // ── Data ─────────────────────────────────────────────────────────
    #[error("{resource} not found at {path}")]
    #[diagnostic(code(gibmac::missing_resource), help("Run: gibmac update"))]
    MissingResource { resource: String, path: String },

    #[error("No {what} matches '{query}'")]
    #[diagnostic(code(gibmac::not_found), help("Run: gibmac {list_command} to see what is available"))]
    NotFound {
        what: String,
        query: String,
        list_command: String,
    },

    // ── Downloader ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(gibmac::downloader),
        help(
            "macrecovery.py needs Python 3. Set --python or `python` in the\n\
             config file if it is not on PATH as {python}."
        )
    )]
    Downloader { message: String, python: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gibmac::validation))]
    Validation { field: String, reason: String },

    #[error("Download of {board} requires confirmation")]
    #[diagnostic(
        code(gibmac::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { board: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(gibmac::config),
        help("Check the file at `gibmac config path` or the GIBMAC_* environment variables.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(gibmac::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::ResourceUnavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::MissingResource { .. } | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Downloader { .. } => exit_code::DOWNLOADER,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the configured interpreter to downloader failures.
    #[must_use]
    pub fn with_python(self, program: &str) -> Self {
        match self {
            Self::Downloader { message, .. } => Self::Downloader {
                message,
                python: program.to_owned(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::ResourceUnavailable { url, status } => {
                CliError::ResourceUnavailable { url, status }
            }

            CoreError::InvalidBoardMap { message } => CliError::Validation {
                field: "boards.json".into(),
                reason: message,
            },

            CoreError::IncompleteSelection { missing } => CliError::Validation {
                field: "target".into(),
                reason: format!("no {missing} selected"),
            },

            CoreError::DownloaderMissing { path } => CliError::MissingResource {
                resource: "macrecovery.py".into(),
                path,
            },

            err @ (CoreError::DownloaderLaunch { .. } | CoreError::DownloaderFailed { .. }) => {
                CliError::Downloader {
                    message: err.to_string(),
                    python: "python3".into(),
                }
            }

            CoreError::Io { context, source } => {
                CliError::Io(std::io::Error::new(source.kind(), format!("{context}: {source}")))
            }

            CoreError::Prompt { message } | CoreError::Internal(message) => {
                CliError::Internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let err = CliError::from(CoreError::ResourceUnavailable {
            url: "https://example.invalid/boards.json".into(),
            status: 404,
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);

        let err = CliError::from(CoreError::Timeout { timeout_secs: 5 });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);

        let err = CliError::from(CoreError::DownloaderFailed { code: Some(1) });
        assert_eq!(err.exit_code(), exit_code::DOWNLOADER);

        let err = CliError::from(CoreError::DownloaderMissing {
            path: "/nope/macrecovery.py".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err = CliError::from(CoreError::IncompleteSelection { missing: "MLB" });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn with_python_only_touches_downloader_errors() {
        let err = CliError::from(CoreError::DownloaderFailed { code: Some(2) }).with_python("py");
        assert!(matches!(err, CliError::Downloader { ref python, .. } if python == "py"));

        let err = CliError::Timeout { seconds: 1 }.with_python("py");
        assert!(matches!(err, CliError::Timeout { seconds: 1 }));
    }
}
