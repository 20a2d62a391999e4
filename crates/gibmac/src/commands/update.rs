//! `gibmac update`: fetch the three upstream resources with progress bars.

use std::collections::HashMap;
use std::path::PathBuf;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use gibmac_core::resources::update_resources;
use gibmac_core::{ResourceKind, UpdateEvent};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

const BAR_TEMPLATE: &str = "{msg:>18} [{bar:30}] {bytes:>10}/{total_bytes:<10}";
const SPINNER_TEMPLATE: &str = "{msg:>18} {spinner} {bytes:>10}";

#[derive(Debug, Clone, Serialize)]
struct Updated {
    resource: ResourceKind,
    path: PathBuf,
    bytes: u64,
}

#[derive(Tabled)]
struct UpdatedRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Bytes")]
    bytes: u64,
    #[tabled(rename = "Path")]
    path: String,
}

impl From<&Updated> for UpdatedRow {
    fn from(u: &Updated) -> Self {
        Self {
            resource: u.resource.to_string(),
            bytes: u.bytes,
            path: u.path.display().to_string(),
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

pub async fn handle(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let client = settings.client()?;

    let target = if global.quiet {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr()
    };
    let multi = MultiProgress::with_draw_target(target);
    let mut bars: HashMap<ResourceKind, ProgressBar> = HashMap::new();

    let fetched = update_resources(&client, &settings.sources, &settings.paths, |event| {
        match event {
            UpdateEvent::Started { kind, url } => {
                tracing::debug!(%url, "fetching {kind}");
                let bar = multi.add(ProgressBar::no_length());
                bar.set_style(style(SPINNER_TEMPLATE));
                bar.set_message(kind.to_string());
                bars.insert(kind, bar);
            }
            UpdateEvent::Progress { kind, bytes, total } => {
                if let Some(bar) = bars.get(&kind) {
                    if let Some(total) = total.filter(|_| bar.length().is_none()) {
                        bar.set_length(total);
                        bar.set_style(style(BAR_TEMPLATE));
                    }
                    bar.set_position(bytes);
                }
            }
            UpdateEvent::Finished { kind, bytes } => {
                if let Some(bar) = bars.get(&kind) {
                    bar.set_position(bytes);
                    bar.finish();
                }
            }
        }
    })
    .await?;

    let updated: Vec<Updated> = ResourceKind::all()
        .zip(fetched)
        .map(|(resource, file)| Updated {
            resource,
            path: file.path,
            bytes: file.bytes,
        })
        .collect();

    let out = output::render_list(&global.output, &updated, |u: &Updated| UpdatedRow::from(u), |u| {
        u.path.display().to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
