// ── Recovery catalog types ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One downloadable recovery entry: a board id and the MLB that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub board_id: String,
    pub mlb: String,
}

impl DeviceRecord {
    pub fn new(board_id: impl Into<String>, mlb: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            mlb: mlb.into(),
        }
    }
}

/// Release label -> device records, in the order the source listed them.
///
/// Upstream lists the oldest release first, so menus walk
/// [`Catalog::newest_first`] rather than the raw insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    releases: IndexMap<String, Vec<DeviceRecord>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to `label`, creating the release on first use.
    pub fn push(&mut self, label: &str, record: DeviceRecord) {
        if let Some(records) = self.releases.get_mut(label) {
            records.push(record);
        } else {
            self.releases.insert(label.to_owned(), vec![record]);
        }
    }

    pub fn get(&self, label: &str) -> Option<&[DeviceRecord]> {
        self.releases.get(label).map(Vec::as_slice)
    }

    /// Number of releases (not records).
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Total number of device records across every release.
    pub fn record_count(&self) -> usize {
        self.releases.values().map(Vec::len).sum()
    }

    /// Releases in source order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &[DeviceRecord])> {
        self.releases
            .iter()
            .map(|(label, records)| (label.as_str(), records.as_slice()))
    }

    /// Releases in display order (reverse of source order).
    pub fn newest_first(&self) -> Vec<(&str, &[DeviceRecord])> {
        self.iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_extends_existing_release() {
        let mut catalog = Catalog::new();
        catalog.push("10.15", DeviceRecord::new("Mac-1", "A"));
        catalog.push("11", DeviceRecord::new("Mac-2", "B"));
        catalog.push("10.15", DeviceRecord::new("Mac-3", "C"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.record_count(), 3);
        let labels: Vec<_> = catalog.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["10.15", "11"]);
        assert_eq!(catalog.get("10.15").map(<[_]>::len), Some(2));
    }

    #[test]
    fn newest_first_reverses_source_order() {
        let mut catalog = Catalog::new();
        catalog.push("10.14", DeviceRecord::new("Mac-1", "A"));
        catalog.push("10.15", DeviceRecord::new("Mac-2", "B"));
        catalog.push("11", DeviceRecord::new("Mac-3", "C"));

        let labels: Vec<_> = catalog.newest_first().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["11", "10.15", "10.14"]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut catalog = Catalog::new();
        catalog.push("11.6", DeviceRecord::new("Mac-A", "C02"));
        let json = serde_json::to_string(&catalog).unwrap_or_default();
        assert_eq!(json, r#"{"11.6":[{"board_id":"Mac-A","mlb":"C02"}]}"#);
    }
}
