use std::env;
use std::error::Error;

use bubblelevel::cli::{main_cli, Args};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting bubblelevel v{}", VERSION);

    let args = Args::parse();
    if let Err(e) = main_cli(args).await {
        log::error!("bubblelevel exited with error: {e}");
        return Err(e);
    }

    log::info!("bubblelevel stopped");

    Ok(())
}
