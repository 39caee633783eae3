use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ShipxTransport, TrackingClient};
use crossbeam_channel::bounded;
use storage::TrackingStore;

mod backend_bridge;
mod config;
mod controller;
mod logging;
mod ui;

use backend_bridge::{
    commands::BackendCommand,
    runtime::{self, BackendDeps},
};
use config::AppPaths;
use controller::{events::AppMessage, reducer::SessionState};
use ui::{terminal, view::ViewOptions};

/// Track parcels sent through the ShipX (InPost) network.
#[derive(Parser, Debug)]
#[command(name = "tracker", version)]
struct Args {
    /// JSON file holding the saved tracking numbers.
    #[arg(long)]
    store_path: Option<PathBuf>,
    /// Base URL of the tracking API.
    #[arg(long)]
    api_url: Option<String>,
    /// Locale for dates, e.g. `pl_PL` or `en_US`.
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the key bindings and exit.
    #[arg(long)]
    keys: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.keys {
        println!("{}", terminal::KEY_HELP);
        return Ok(());
    }

    let config_dir = storage::app_config_dir().ok();
    let mut settings = config::load_settings(config_dir.as_deref());
    if let Some(path) = args.store_path {
        settings.store_path = Some(path);
    }
    if let Some(url) = args.api_url {
        settings.api_url = url;
    }
    if let Some(locale) = args.locale {
        settings.locale = locale;
    }
    if let Some(path) = args.log_file {
        settings.log_file = Some(path);
    }

    let paths = AppPaths::resolve(&settings)?;
    logging::init_file_logging(&paths.log_file, &settings.log_filter)?;
    let options = ViewOptions {
        locale: settings.locale()?,
    };
    tracing::info!(
        api_url = %settings.api_url,
        store = %paths.store_path.display(),
        config_dir = ?config_dir,
        "starting tracker"
    );

    let transport = ShipxTransport::new(&settings.api_url)
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?;
    let deps = BackendDeps {
        store: TrackingStore::new(paths.store_path),
        client: Arc::new(TrackingClient::over_http(transport)),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<AppMessage>(2048);
    let worker = runtime::launch(cmd_rx, ui_tx, deps);

    let result = terminal::run(SessionState::new(), &cmd_tx, &ui_rx, &options);

    drop(cmd_tx);
    drop(ui_rx);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    tracing::info!("tracker stopped");
    result
}
