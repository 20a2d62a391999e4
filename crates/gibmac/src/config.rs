//! Effective runtime settings: the config file and environment, then
//! command-line overrides on top.

use std::path::PathBuf;
use std::time::Duration;

use gibmac_api::{ResourceClient, TransportConfig};
use gibmac_config::Config;
use gibmac_core::{CoreError, ResourceKind, ResourcePaths, ResourceSources};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command needs to know about where things live.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: ResourcePaths,
    pub sources: ResourceSources,
    pub output_dir: PathBuf,
    pub python: String,
    pub timeout: Duration,
    pub auto_return: Duration,
}

impl Settings {
    /// Load the config file and apply `global`'s overrides.
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = gibmac_config::load_config()?;
        Self::resolve(cfg, global)
    }

    pub fn resolve(mut cfg: Config, global: &GlobalOpts) -> Result<Self, CliError> {
        apply_overrides(&mut cfg, global);
        let sources = cfg.resource_sources()?;
        Ok(Self {
            paths: cfg.resource_paths(),
            sources,
            output_dir: cfg.output_dir,
            python: cfg.python,
            timeout: Duration::from_secs(cfg.timeout),
            auto_return: Duration::from_secs(cfg.auto_return_secs),
        })
    }

    pub fn script_path(&self) -> PathBuf {
        self.paths.path_for(ResourceKind::Macrecovery)
    }

    pub fn client(&self) -> Result<ResourceClient, CoreError> {
        let transport = TransportConfig::default().with_timeout(self.timeout);
        Ok(ResourceClient::new(&transport)?)
    }
}

/// Copy command-line overrides into the loaded config.
pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref dir) = global.data_dir {
        cfg.data_dir = Some(dir.clone());
    }
    if let Some(ref dir) = global.output_dir {
        cfg.output_dir.clone_from(dir);
    }
    if let Some(ref python) = global.python {
        cfg.python.clone_from(python);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}
