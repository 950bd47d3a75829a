mod analysis;
mod classifier;
mod cli;
mod error;
mod exporter;
mod fmt;
mod models;
mod parser;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, SettingsCommands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            file,
            output,
            format,
            all,
            quiet,
        } => cli::analyze::run(&file, output, format, all, quiet),
        Commands::Settings { command } => match command {
            SettingsCommands::Show => cli::settings::show(),
            SettingsCommands::Set { export_dir, format } => cli::settings::set(export_dir, format),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
