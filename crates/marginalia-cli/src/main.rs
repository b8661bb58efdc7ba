//! Marginalia CLI - Export Kindle highlights and notes.

use clap::Parser;
use marginalia_cli::cli::{ConfigAction, ConfigArgs};
use marginalia_cli::commands;
use marginalia_cli::logging;
use marginalia_cli::{Cli, Command, Config, Formatter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> marginalia_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    logging::init(cli.verbose);

    // A broken config file must not block writing a fresh one
    let config = match &cli.command {
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. },
        }) => Config::default(),
        _ => Config::load(cli.config.as_deref())?,
    };

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled);

    match cli.command {
        Command::Export(args) => {
            commands::execute_export(args, &config, &formatter, cli.verbose > 0)?;
        }
        Command::Books(args) => {
            commands::execute_books(args, &config, &formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter)?;
        }
    }

    Ok(())
}
