#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(
    clippy::use_self,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::missing_panics_doc
)]

use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use eframe::{egui::ViewportBuilder, run_native};
use log::info;
use roosty_chrono::{config::Config, store::JsonFileStore, webhook::Dispatcher, Clock};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// use this config file instead of the one in the config directory
    #[clap(long, short)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<Command>,
}
#[derive(Subcommand)]
enum Command {
    /// write the default config file
    Init {
        /// overwrite an existing config
        #[clap(long, short)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    // initilize the logger
    simple_file_logger::init_logger!("roosty_chrono")
        .map_err(|e| format!("couldn't initialize logger: {e}"))?;

    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    match args.command {
        Some(Command::Init { force }) => {
            if force || !config_path.exists() {
                Config::new().save(&config_path)?;
                info!("wrote default config to {}", config_path.display());
            } else {
                info!(
                    "config already exists at {}, use --force to overwrite it",
                    config_path.display()
                );
            }
        }
        None => {}
    }

    let config = Config::load_or_default(&config_path);
    let store = JsonFileStore::new(config.alarms_path()?);
    // webhooks are sent from their own thread so a slow endpoint can't stall the clock
    let dispatcher = Dispatcher::spawn(config.webhook_timeout());

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Roosty Chrono")
            .with_inner_size([480.0, 640.0]),
        ..Default::default()
    };

    // run the gui, the dispatcher is joined when the clock is dropped
    run_native(
        "Roosty Chrono",
        native_options,
        Box::new(move |_| Ok(Box::new(Clock::new(config, config_path, store, dispatcher)))),
    )
    .map_err(std::convert::Into::into)
}
