use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::DEFAULT_PORT;
use crate::utils::get_env_port;

#[derive(Parser)]
#[command(name = "marketfacade")]
#[command(about = "Stock market data facade and dataset cleaner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Listen port (falls back to FACADE_PORT, then the default)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Clean a tabular dataset (salary repair, age imputation, gender
    /// normalization)
    Clean {
        /// Path to the input CSV file
        #[arg(short, long)]
        input: PathBuf,
        /// Path for the cleaned CSV (defaults to <input>_cleaned.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let port = port.or_else(get_env_port).unwrap_or(DEFAULT_PORT);
            commands::serve::run(port).await;
        }
        Commands::Clean { input, output } => {
            commands::clean::run(input, output);
        }
    }
}
