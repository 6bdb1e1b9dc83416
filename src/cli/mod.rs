pub mod run;

#[cfg(test)]
mod run_test;

use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use run::{handle_run, RunArgs};

use crate::config::Config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML config file to use instead of the standard locations
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sample orientation and print the display state (default)
    Run(RunArgs),
    /// Print the effective configuration
    Config,
}

pub async fn main_cli(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = match args.config.as_ref() {
        Some(path) => Config::from_yaml_path(path)?,
        None => Config::load()?,
    };

    match args.cmd.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(run_args) => handle_run(config, run_args).await?,
        Commands::Config => print!("{}", serde_yaml::to_string(&config)?),
    }

    Ok(())
}
