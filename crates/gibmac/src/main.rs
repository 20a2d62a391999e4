mod cli;
mod commands;
mod config;
mod error;
mod menu;
mod output;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::error::{CliError, exit_code};
use crate::menu::Session;
use crate::terminal::TerminalPrompter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
    std::process::exit(exit_code::SUCCESS);
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands work without resolving resource settings
        Some(Command::Config(ref args)) => commands::config_cmd::handle(args, &cli.global),

        Some(Command::Completions(args)) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "gibmac", &mut std::io::stdout());
            Ok(())
        }

        None | Some(Command::Menu) => {
            let settings = Settings::load(&cli.global)?;
            let color = output::should_color(&cli.global.color);
            let mut session = Session::new(&settings, TerminalPrompter::new(), color);
            let result = session.run().await;
            session.into_prompter().finish();
            result.map_err(CliError::from)
        }

        Some(cmd) => {
            let settings = Settings::load(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &settings, &cli.global).await
        }
    }
}
