//! `gibmac catalog`: targets parsed from recovery_urls.txt.

use serde::Serialize;
use tabled::Tabled;

use gibmac_core::{Catalog, ResourceKind, Variant, load_catalog};

use crate::cli::{CatalogArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::require;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub release: String,
    pub board_id: String,
    pub mlb: String,
    pub os_type: Variant,
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Release")]
    release: String,
    #[tabled(rename = "Board ID")]
    board_id: String,
    #[tabled(rename = "MLB")]
    mlb: String,
    #[tabled(rename = "OS Type")]
    os_type: String,
}

impl From<&CatalogEntry> for CatalogRow {
    fn from(e: &CatalogEntry) -> Self {
        Self {
            release: e.release.clone(),
            board_id: e.board_id.clone(),
            mlb: e.mlb.clone(),
            os_type: e.os_type.to_string(),
        }
    }
}

/// Flatten the catalog, newest release first, optionally keeping one release.
pub fn entries(catalog: &Catalog, release: Option<&str>) -> Vec<CatalogEntry> {
    catalog
        .newest_first()
        .into_iter()
        .filter(|(label, _)| release.is_none_or(|r| label.eq_ignore_ascii_case(r)))
        .flat_map(|(label, records)| {
            records.iter().map(move |record| CatalogEntry {
                release: label.to_owned(),
                board_id: record.board_id.clone(),
                mlb: record.mlb.clone(),
                os_type: Variant::for_release(label),
            })
        })
        .collect()
}

pub fn handle(args: &CatalogArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    require(settings, ResourceKind::RecoveryUrls)?;
    let catalog = load_catalog(&settings.paths.path_for(ResourceKind::RecoveryUrls));

    let entries = entries(&catalog, args.release.as_deref());
    if let Some(release) = args.release.as_ref().filter(|_| entries.is_empty()) {
        return Err(CliError::NotFound {
            what: "release".into(),
            query: release.clone(),
            list_command: "catalog".into(),
        });
    }

    let out = output::render_list(
        &global.output,
        &entries,
        |e: &CatalogEntry| CatalogRow::from(e),
        |e| e.board_id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use gibmac_core::parse;

    use super::*;

    const TEXT: &str = "\
10.15 version:
./macrecovery.py -b Mac-00BE6ED71E35EB86 -m 00000000000000000 download
Latest version:
./macrecovery.py -b Mac-E43C1C25D4880AD6 -m 00000000000000000 -os latest download
./macrecovery.py -b Mac-AAAAAAAAAAAAAAAA -m C02123456789ABCDE -os latest download
";

    #[test]
    fn entries_are_newest_first() {
        let ids: Vec<_> = entries(&parse(TEXT), None)
            .into_iter()
            .map(|e| (e.release, e.board_id, e.os_type))
            .collect();
        assert_eq!(
            ids,
            [
                ("Latest".to_owned(), "Mac-E43C1C25D4880AD6".to_owned(), Variant::Latest),
                ("Latest".to_owned(), "Mac-AAAAAAAAAAAAAAAA".to_owned(), Variant::Latest),
                ("10.15".to_owned(), "Mac-00BE6ED71E35EB86".to_owned(), Variant::Default),
            ]
        );
    }

    #[test]
    fn release_filter_ignores_case() {
        let only = entries(&parse(TEXT), Some("latest"));
        assert_eq!(only.len(), 2);
        assert!(entries(&parse(TEXT), Some("12")).is_empty());
    }
}
