use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;

mod api;
mod cli;
mod controllers;
mod core;
mod logging;
mod utils;
mod validation;

use crate::api::ApiClient;
use crate::cli::handlers::{self, Session};
use crate::cli::{render, Args};
use crate::core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let (mut config, config_warnings) = Config::load();
    if let Some(dir) = &args.download_dir {
        config.download_directory = dir.clone();
    }

    logging::init(&config, args.verbose).context("Failed to initialize logging")?;
    log::info!("🔒 Starting password audit client v{}", env!("CARGO_PKG_VERSION"));
    for warning in &config_warnings {
        log::warn!("{}", warning);
        eprintln!("{}", render::warning_line(warning));
    }
    log::debug!("Analysis endpoint: {}", config.analyse_url);

    let client = ApiClient::new(&config).context("Invalid backend configuration")?;
    let mut session = Session::new(client, &config, args.json);

    match args.command {
        Some(command) => {
            if let Err(e) = handlers::run_command(&mut session, command).await {
                log::error!("Command failed: {:#}", e);
                eprintln!("{}", render::error_line(&e.to_string()));
                std::process::exit(1);
            }
        }
        None => {
            let should_exit = Arc::new(AtomicBool::new(false));
            {
                let should_exit = Arc::clone(&should_exit);
                ctrlc::set_handler(move || {
                    log::info!("🔴 Ctrl+C received. Shutting down...");
                    should_exit.store(true, Ordering::SeqCst);
                    println!("\n👋 Goodbye!");
                    std::process::exit(0);
                })
                .context("Failed to set Ctrl+C handler")?;
            }

            cli::menu::run_cli_menu(&mut session, should_exit).await?;
        }
    }

    log::info!("✅ Password audit client finished");
    Ok(())
}
