// ── Board map ──
//
// `boards.json` maps every known board id to the newest macOS release it
// can recover. The file is maintained upstream; a missing or broken copy
// degrades to an empty map instead of failing the session.

use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Release reported for board ids absent from the map.
pub const UNKNOWN_RELEASE: &str = "Unknown";

/// Board id -> release label, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardMap(IndexMap<String, String>);

impl BoardMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `boards.json` document.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidBoardMap {
            message: e.to_string(),
        })
    }

    /// Load `boards.json` from disk, falling back to an empty map when the
    /// file is missing, unreadable, or not a string -> string object.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "board map not present");
            return Self::default();
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read board map");
                return Self::default();
            }
        };
        match Self::from_json_str(&contents) {
            Ok(map) => {
                debug!(boards = map.len(), "board map loaded");
                map
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid board map");
                Self::default()
            }
        }
    }

    pub fn get(&self, board_id: &str) -> Option<&str> {
        self.0.get(board_id).map(String::as_str)
    }

    /// The release for `board_id`, or [`UNKNOWN_RELEASE`].
    pub fn release_for(&self, board_id: &str) -> &str {
        self.get(board_id).unwrap_or(UNKNOWN_RELEASE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(b, r)| (b.as_str(), r.as_str()))
    }

    /// Distinct release labels, sorted descending.
    ///
    /// Plain string order: "10.9" sorts above "10.15".
    pub fn releases_desc(&self) -> Vec<&str> {
        let distinct: BTreeSet<&str> = self.0.values().map(String::as_str).collect();
        distinct.into_iter().rev().collect()
    }

    /// Number of distinct release labels.
    pub fn release_count(&self) -> usize {
        self.0.values().collect::<BTreeSet<_>>().len()
    }

    /// First board id (document order) whose release matches `label`,
    /// ignoring ASCII case.
    pub fn first_board_for(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, release)| release.eq_ignore_ascii_case(label))
            .map(|(board, _)| board.as_str())
    }
}

impl FromIterator<(String, String)> for BoardMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> BoardMap {
        BoardMap::from_json_str(r#"{"Mac-1":"10.15","Mac-2":"10.15","Mac-3":"11.0"}"#).unwrap()
    }

    #[test]
    fn preserves_document_order() {
        let map = sample();
        let boards: Vec<_> = map.iter().map(|(b, _)| b).collect();
        assert_eq!(boards, ["Mac-1", "Mac-2", "Mac-3"]);
    }

    #[test]
    fn releases_are_distinct_and_descending() {
        let map = sample();
        assert_eq!(map.releases_desc(), ["11.0", "10.15"]);
        assert_eq!(map.release_count(), 2);
    }

    #[test]
    fn releases_sort_lexically() {
        let map: BoardMap = [("Mac-A", "10.9"), ("Mac-B", "10.15"), ("Mac-C", "latest")]
            .into_iter()
            .map(|(b, r)| (b.to_owned(), r.to_owned()))
            .collect();
        assert_eq!(map.releases_desc(), ["latest", "10.9", "10.15"]);
    }

    #[test]
    fn first_board_wins() {
        assert_eq!(sample().first_board_for("10.15"), Some("Mac-1"));
        assert_eq!(sample().first_board_for("12"), None);
    }

    #[test]
    fn first_board_ignores_case() {
        let map = BoardMap::from_json_str(r#"{"Mac-7":"Latest"}"#).unwrap();
        assert_eq!(map.first_board_for("latest"), Some("Mac-7"));
    }

    #[test]
    fn unknown_board_release() {
        assert_eq!(sample().release_for("Mac-3"), "11.0");
        assert_eq!(sample().release_for("Mac-9"), UNKNOWN_RELEASE);
    }

    #[test]
    fn rejects_non_string_values() {
        let err = BoardMap::from_json_str(r#"{"Mac-1": 10}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBoardMap { .. }));
    }

    #[test]
    fn load_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("boards.json");
        assert!(BoardMap::load(&missing).is_empty());

        std::fs::write(&missing, "not json").unwrap();
        assert!(BoardMap::load(&missing).is_empty());

        std::fs::write(&missing, r#"{"Mac-1":"10.15"}"#).unwrap();
        assert_eq!(BoardMap::load(&missing).len(), 1);
    }
}
