// Resource HTTP client
//
// Streams upstream files straight to disk. Bodies land in a sibling
// `<name>.downloading` file and are renamed into place once the stream
// completes.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Result of a completed file fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Final location of the file.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
}

/// HTTP client for the upstream macrecovery resources.
pub struct ResourceClient {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl ResourceClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// GET a resource and return its body as text.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, Error> {
        let resp = self.get(url).await?;
        resp.text().await.map_err(|e| self.map_transport(e))
    }

    /// GET a resource and stream it to `dest`.
    pub async fn fetch_to_file(&self, url: &Url, dest: &Path) -> Result<FetchedFile, Error> {
        self.fetch_to_file_with_progress(url, dest, |_, _| {}).await
    }

    /// GET a resource and stream it to `dest`, reporting progress as
    /// `(bytes_so_far, content_length)` after every chunk.
    pub async fn fetch_to_file_with_progress(
        &self,
        url: &Url,
        dest: &Path,
        mut on_progress: impl FnMut(u64, Option<u64>),
    ) -> Result<FetchedFile, Error> {
        let resp = self.get(url).await?;
        let total = resp.content_length();

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| write_err(parent, e))?;
            }
        }

        let partial = partial_path(dest);
        let mut file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| write_err(&partial, e))?;

        let mut stream = resp.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(&partial).await;
                    return Err(self.map_transport(e));
                }
            };
            file.write_all(&chunk)
                .await
                .map_err(|e| write_err(&partial, e))?;
            written += u64::try_from(chunk.len()).unwrap_or(u64::MAX);
            on_progress(written, total);
        }
        file.flush().await.map_err(|e| write_err(&partial, e))?;
        drop(file);

        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| write_err(dest, e))?;

        info!(url = %url, path = %dest.display(), bytes = written, "resource saved");
        Ok(FetchedFile {
            path: dest.to_path_buf(),
            bytes: written,
        })
    }

    // ── Internals ───────────────────────────────────────────────────

    async fn get(&self, url: &Url) -> Result<reqwest::Response, Error> {
        debug!(url = %url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// `boards.json` -> `boards.json.downloading`, next to the destination.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".downloading");
    dest.with_file_name(name)
}

fn write_err(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.display().to_string(),
        source,
    }
}
