// gibmac-core: Catalog parsing and target selection between gibmac-api and the CLI.

pub mod download;
pub mod error;
pub mod model;
pub mod parser;
pub mod resources;
pub mod selection;

// ── Primary re-exports ──────────────────────────────────────────────
pub use download::{DEFAULT_OUTPUT_DIR, DownloadPlan};
pub use error::CoreError;
pub use parser::{CatalogParser, ParserState, load_catalog, parse};
pub use resources::{LoadedData, ResourceKind, ResourcePaths, ResourceSources, UpdateEvent};
pub use selection::{
    FlowOutcome, InvalidInput, MenuInput, Prompted, Prompter, Screen, SelectionEngine,
    toggle_variant,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BoardMap, Catalog, DeviceRecord, MLB_LEN, PLACEHOLDER_MLB, SelectionState, UNKNOWN_RELEASE,
    Variant,
};
