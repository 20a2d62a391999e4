// ── Selection state ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Width every MLB is padded to.
pub const MLB_LEN: usize = 17;

/// MLB used when a target is picked from the board map, which carries none.
pub const PLACEHOLDER_MLB: &str = "00000000000000000";

/// Recovery image family requested from Apple's servers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Variant {
    #[default]
    Default,
    Latest,
}

impl Variant {
    /// `Latest` when the release label mentions "latest", else `Default`.
    pub fn for_release(label: &str) -> Self {
        if label.to_lowercase().contains("latest") {
            Self::Latest
        } else {
            Self::Default
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Default => Self::Latest,
            Self::Latest => Self::Default,
        }
    }
}

/// The target the download step will fetch.
///
/// Flows never edit this in place: each returns a complete replacement
/// or leaves the caller's copy untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub target_os: Option<String>,
    pub target_board: Option<String>,
    pub target_mlb: Option<String>,
    pub variant: Variant,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully populated state, as produced by the catalog and board map flows.
    pub fn resolved(
        os: impl Into<String>,
        board: impl Into<String>,
        mlb: impl Into<String>,
        variant: Variant,
    ) -> Self {
        Self {
            target_os: Some(os.into()),
            target_board: Some(board.into()),
            target_mlb: Some(mlb.into()),
            variant,
        }
    }

    /// A download needs both a board id and an MLB.
    pub fn is_downloadable(&self) -> bool {
        self.target_board.is_some() && self.target_mlb.is_some()
    }

    /// The "current target" block shown at the top of every menu.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("     Target macOS: {}", or_none(self.target_os.as_deref())),
            format!("  Target Board ID: {}", or_none(self.target_board.as_deref())),
            format!("       Target MLB: {}", or_none(self.target_mlb.as_deref())),
            format!("          OS Type: {}", self.variant),
        ]
    }
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}
