// ── recovery_urls.txt parser ──
//
// The catalog is an informal listing maintained upstream: release headers
// ending in a colon, each followed by `./macrecovery.py ...` invocation
// lines. Board id and MLB sit at fixed whitespace-separated positions.
// Diagnostics/default sections are not addressable targets and are skipped.
//
// Parsing never fails. Lines that do not fit are dropped and the parser
// keeps going.

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::model::{Catalog, DeviceRecord};

const RECORD_PREFIX: &str = "./";
const ESCAPE_MARKER: char = '<';
const SECTION_SENTINELS: [&str; 2] = ["diagnostics", "default"];
const HEADER_NOISE: &str = " version";

const BOARD_TOKEN: usize = 2;
const MLB_TOKEN: usize = 4;

/// How a single non-blank line reads, independent of parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Whitespace only.
    Blank,
    /// Starts a diagnostics/default section.
    Sentinel,
    /// `./...` invocation line.
    Record,
    /// `./...` line carrying `<placeholder>` fields.
    EscapedRecord,
    /// Anything else: a release header.
    Header,
}

/// Classify one line of catalog text.
pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if starts_with_sentinel(line) {
        return LineKind::Sentinel;
    }
    if line.starts_with(RECORD_PREFIX) {
        if line.contains(ESCAPE_MARKER) {
            return LineKind::EscapedRecord;
        }
        return LineKind::Record;
    }
    LineKind::Header
}

fn starts_with_sentinel(line: &str) -> bool {
    SECTION_SENTINELS.iter().any(|sentinel| {
        line.get(..sentinel.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(sentinel))
    })
}

/// Turn a header line into its release label.
///
/// `"11.6 version:"` becomes `"11.6"`: trims whitespace, drops one
/// trailing colon, and removes the first `" version"`.
pub fn normalize_header(line: &str) -> String {
    let trimmed = line.trim();
    let without_colon = trimmed.strip_suffix(':').unwrap_or(trimmed);
    without_colon.replacen(HEADER_NOISE, "", 1)
}

/// Pull the board id and MLB out of a record line, if it has enough tokens.
pub fn parse_record(line: &str) -> Option<DeviceRecord> {
    let mut tokens = line.split_whitespace();
    let board_id = tokens.nth(BOARD_TOKEN)?;
    let mlb = tokens.nth(MLB_TOKEN - BOARD_TOKEN - 1)?;
    Some(DeviceRecord::new(board_id, mlb))
}

// ── State machine ───────────────────────────────────────────────────

/// Where the parser is between lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParserState {
    /// No release is active; record lines are ignored.
    #[default]
    SeekingHeader,
    /// Record lines append to `label`.
    InRecords { label: String },
}

/// Incremental catalog parser. Feed lines, then [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct CatalogParser {
    state: ParserState,
    catalog: Catalog,
    dropped: usize,
}

impl CatalogParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Record lines discarded so far for having too few tokens.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn feed_line(&mut self, line: &str) {
        match classify(line) {
            LineKind::Blank => {}
            LineKind::Sentinel => {
                trace!(line, "section sentinel, clearing release");
                self.state = ParserState::SeekingHeader;
            }
            LineKind::Record => self.on_record(line),
            LineKind::EscapedRecord => {}
            LineKind::Header => {
                let label = normalize_header(line);
                // An empty label (a bare ":") cannot own records.
                self.state = if label.is_empty() {
                    ParserState::SeekingHeader
                } else {
                    ParserState::InRecords { label }
                };
            }
        }
    }

    fn on_record(&mut self, line: &str) {
        let ParserState::InRecords { label } = &self.state else {
            return;
        };
        if let Some(record) = parse_record(line) {
            self.catalog.push(label, record);
        } else {
            self.dropped += 1;
            trace!(line, "record line has too few fields");
        }
    }

    pub fn finish(self) -> Catalog {
        if self.dropped > 0 {
            warn!(dropped = self.dropped, "skipped malformed catalog lines");
        }
        debug!(
            releases = self.catalog.len(),
            records = self.catalog.record_count(),
            dropped = self.dropped,
            "catalog parsed"
        );
        self.catalog
    }
}

/// Parse a whole catalog document.
pub fn parse(text: &str) -> Catalog {
    let mut parser = CatalogParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Read and parse `recovery_urls.txt`. Missing or unreadable files give an
/// empty catalog.
pub fn load_catalog(path: &Path) -> Catalog {
    if !path.exists() {
        debug!(path = %path.display(), "catalog not present");
        return Catalog::default();
    }
    match std::fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read catalog");
            Catalog::default()
        }
    }
}
