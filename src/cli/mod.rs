pub mod analyze;
pub mod settings;

use clap::{Parser, Subcommand};

use crate::exporter::ExportFormat;

#[derive(Parser)]
#[command(
    name = "virada",
    version,
    about = "Find flipped accounts in HTML trial-balance reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a balance report and export the flipped accounts.
    Analyze {
        /// Path to the HTML balance report (.htm/.html)
        file: String,
        /// Output file (default: <export_dir>/contas-viradas-YYYY-MM-DD.<ext>)
        #[arg(long, short = 'o')]
        output: Option<String>,
        /// Spreadsheet format (default from settings)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
        /// Also export every account with a flipped yes/no column
        #[arg(long)]
        all: bool,
        /// Only print the summary, not the table of flipped accounts
        #[arg(long, short = 'q')]
        quiet: bool,
    },
    /// View or change preferences.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings.
    Show,
    /// Update settings.
    Set {
        /// Directory for exported spreadsheets
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Default spreadsheet format
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },
}
