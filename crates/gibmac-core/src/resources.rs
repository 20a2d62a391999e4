// ── Upstream resources ──
//
// gibmac works from three files kept in its data directory: the board map,
// the recovery catalog, and the macrecovery.py downloader itself. This
// module knows where they live, where they come from, and how to refresh
// them.

use std::path::{Path, PathBuf};

use gibmac_api::{FetchedFile, ResourceClient};
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::info;
use url::Url;

use crate::error::CoreError;
use crate::model::{BoardMap, Catalog};
use crate::parser::load_catalog;

const UPSTREAM_RAW: &str =
    "https://raw.githubusercontent.com/acidanthera/OpenCorePkg/master/Utilities/macrecovery";

/// One of the files gibmac depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[strum(to_string = "boards.json")]
    Boards,
    #[strum(to_string = "macrecovery.py")]
    Macrecovery,
    #[strum(to_string = "recovery_urls.txt")]
    RecoveryUrls,
}

impl ResourceKind {
    /// All resources, in the order they are fetched.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Boards => "boards.json",
            Self::Macrecovery => "macrecovery.py",
            Self::RecoveryUrls => "recovery_urls.txt",
        }
    }

    /// Upstream location in the OpenCorePkg repository.
    pub fn default_url(self) -> String {
        format!("{UPSTREAM_RAW}/{}", self.file_name())
    }
}

// ── Sources ─────────────────────────────────────────────────────────

/// Where each resource is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSources {
    pub boards: Url,
    pub macrecovery: Url,
    pub recovery_urls: Url,
}

impl ResourceSources {
    pub fn url_for(&self, kind: ResourceKind) -> &Url {
        match kind {
            ResourceKind::Boards => &self.boards,
            ResourceKind::Macrecovery => &self.macrecovery,
            ResourceKind::RecoveryUrls => &self.recovery_urls,
        }
    }

    /// All three resources served from one base URL (mirrors, tests).
    pub fn from_base(base: &Url) -> Result<Self, url::ParseError> {
        let join = |kind: ResourceKind| base.join(kind.file_name());
        Ok(Self {
            boards: join(ResourceKind::Boards)?,
            macrecovery: join(ResourceKind::Macrecovery)?,
            recovery_urls: join(ResourceKind::RecoveryUrls)?,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Location of the resource files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    data_dir: PathBuf,
}

impl ResourcePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, kind: ResourceKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    pub fn is_present(&self, kind: ResourceKind) -> bool {
        self.path_for(kind).exists()
    }

    pub fn all_present(&self) -> bool {
        ResourceKind::all().all(|kind| self.is_present(kind))
    }

    /// Parse whatever is currently on disk.
    pub fn load(&self) -> LoadedData {
        LoadedData {
            catalog: load_catalog(&self.path_for(ResourceKind::RecoveryUrls)),
            board_map: BoardMap::load(&self.path_for(ResourceKind::Boards)),
        }
    }
}

/// Parsed resource contents the selection flows work from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedData {
    pub catalog: Catalog,
    pub board_map: BoardMap,
}

// ── Update ──────────────────────────────────────────────────────────

/// Progress notifications from [`update_resources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    Started { kind: ResourceKind, url: Url },
    Progress { kind: ResourceKind, bytes: u64, total: Option<u64> },
    Finished { kind: ResourceKind, bytes: u64 },
}

/// Download every resource into the data directory, in order, stopping at
/// the first failure.
pub async fn update_resources(
    client: &ResourceClient,
    sources: &ResourceSources,
    paths: &ResourcePaths,
    mut on_event: impl FnMut(UpdateEvent),
) -> Result<Vec<FetchedFile>, CoreError> {
    let mut fetched = Vec::new();
    for kind in ResourceKind::all() {
        let url = sources.url_for(kind);
        on_event(UpdateEvent::Started {
            kind,
            url: url.clone(),
        });
        let file = client
            .fetch_to_file_with_progress(url, &paths.path_for(kind), |bytes, total| {
                on_event(UpdateEvent::Progress { kind, bytes, total });
            })
            .await?;
        on_event(UpdateEvent::Finished {
            kind,
            bytes: file.bytes,
        });
        fetched.push(file);
    }
    info!(dir = %paths.data_dir().display(), "resources updated");
    Ok(fetched)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_urls_point_at_opencore() {
        assert_eq!(
            ResourceKind::Boards.default_url(),
            "https://raw.githubusercontent.com/acidanthera/OpenCorePkg/master/Utilities/macrecovery/boards.json"
        );
        assert_eq!(ResourceKind::RecoveryUrls.to_string(), "recovery_urls.txt");
    }

    #[test]
    fn fetch_order_is_boards_script_catalog() {
        let order: Vec<_> = ResourceKind::all().collect();
        assert_eq!(
            order,
            [
                ResourceKind::Boards,
                ResourceKind::Macrecovery,
                ResourceKind::RecoveryUrls
            ]
        );
    }

    #[test]
    fn sources_from_base() {
        let base = Url::parse("http://mirror.local/macrecovery/").unwrap();
        let sources = ResourceSources::from_base(&base).unwrap();
        assert_eq!(
            sources.url_for(ResourceKind::Macrecovery).as_str(),
            "http://mirror.local/macrecovery/macrecovery.py"
        );
    }

    #[test]
    fn status_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ResourcePaths::new(dir.path());
        assert!(!paths.all_present());

        std::fs::write(paths.path_for(ResourceKind::Boards), "{}").unwrap();
        assert!(paths.is_present(ResourceKind::Boards));
        assert!(!paths.is_present(ResourceKind::Macrecovery));
        assert!(!paths.all_present());
    }

    #[test]
    fn load_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ResourcePaths::new(dir.path());
        std::fs::write(paths.path_for(ResourceKind::Boards), r#"{"Mac-1":"10.15"}"#).unwrap();
        std::fs::write(
            paths.path_for(ResourceKind::RecoveryUrls),
            "10.15:\n./m -b Mac-1 -m MLB1 download\n",
        )
        .unwrap();

        let data = paths.load();
        assert_eq!(data.board_map.len(), 1);
        assert_eq!(data.catalog.record_count(), 1);
    }
}
