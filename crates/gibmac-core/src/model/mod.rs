// ── Domain model ──
//
// The parsed recovery catalog, the board map, and the selection state
// every menu flow threads through.

pub mod board_map;
pub mod catalog;
pub mod selection;

pub use board_map::{BoardMap, UNKNOWN_RELEASE};
pub use catalog::{Catalog, DeviceRecord};
pub use selection::{MLB_LEN, PLACEHOLDER_MLB, SelectionState, Variant};
