//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::Input;

use gibmac_config::{Config, ConfigError};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::apply_overrides;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn render_toml(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Config(ConfigError::from(e)))
}

/// Walk through each setting, offering the current value as the default.
fn prompt_config(mut cfg: Config) -> Result<Config, CliError> {
    let data_dir: String = Input::new()
        .with_prompt("Data directory (boards.json, recovery_urls.txt, macrecovery.py)")
        .default(cfg.data_dir().display().to_string())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.data_dir = Some(PathBuf::from(data_dir));

    let output_dir: String = Input::new()
        .with_prompt("Download folder")
        .default(cfg.output_dir.display().to_string())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.output_dir = PathBuf::from(output_dir);

    cfg.python = Input::new()
        .with_prompt("Python interpreter")
        .default(cfg.python.clone())
        .interact_text()
        .map_err(prompt_err)?;

    cfg.timeout = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(cfg.timeout)
        .interact_text()
        .map_err(prompt_err)?;

    Ok(cfg)
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match &args.command {
        ConfigCommand::Path => {
            output::print_output(
                &gibmac_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = gibmac_config::load_config()?;
            apply_overrides(&mut cfg, global);
            cfg.data_dir = Some(cfg.data_dir());
            output::print_output(render_toml(&cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { yes } => {
            let mut cfg = gibmac_config::load_config_or_default();
            apply_overrides(&mut cfg, global);
            let cfg = if *yes { cfg } else { prompt_config(cfg)? };

            // Reject bad source URLs before writing them out.
            cfg.resource_sources()?;
            let path = gibmac_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Config written to {}", path.display());
            }
            Ok(())
        }
    }
}
