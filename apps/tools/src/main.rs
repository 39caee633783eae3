use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client_core::{ShipxTransport, TrackingClient, DEFAULT_API_URL};
use shared::domain::TrackingNumber;
use storage::TrackingStore;
use tracing_subscriber::EnvFilter;

/// Scriptable access to the tracker's saved numbers and the tracking API.
#[derive(Parser, Debug)]
#[command(name = "tracker-tools")]
struct Cli {
    /// Defaults to the tracker's per-user store.
    #[arg(long)]
    store_path: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print saved numbers with their 1-based positions.
    List,
    Add {
        number: String,
    },
    /// Remove by position as printed by `list`.
    Remove {
        position: usize,
    },
    /// Fetch and print the history of a number.
    Show {
        number: String,
    },
    /// Print the status catalog.
    Statuses,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, api_url = %cli.api_url, "running tool command");

    match cli.command {
        Command::List => {
            let store = open_store(cli.store_path)?;
            let state = store.ensure_initialized().await?;
            print_numbers(&state.tracking_numbers);
        }
        Command::Add { number } => {
            let Some(number) = TrackingNumber::parse(&number) else {
                bail!("tracking number must not be blank");
            };
            let store = open_store(cli.store_path)?;
            tracing::info!(
                tracking_number = %number,
                store = %store.path().display(),
                "adding tracking number"
            );
            let numbers = store.append(number).await?;
            print_numbers(&numbers);
        }
        Command::Remove { position } => {
            let index = position_to_index(position)?;
            let store = open_store(cli.store_path)?;
            tracing::info!(position, store = %store.path().display(), "removing tracking number");
            let numbers = store.remove(index).await?;
            print_numbers(&numbers);
        }
        Command::Show { number } => {
            let Some(number) = TrackingNumber::parse(&number) else {
                bail!("tracking number must not be blank");
            };
            let client = http_client(&cli.api_url)?;
            let record = client.fetch_history(&number).await?;
            tracing::debug!(
                tracking_number = %number,
                entries = record.history.len(),
                "history fetched"
            );
            match record.latest() {
                Some(latest) => println!("{number}: {}", latest.status.title),
                None => println!("{number}: no history yet"),
            }
            for entry in &record.history {
                println!(
                    "  {} {} ({})",
                    entry.timestamp.with_timezone(&Local).format("%a %H:%M %d.%m.%Y"),
                    entry.status.title,
                    entry.status_code
                );
            }
        }
        Command::Statuses => {
            let client = http_client(&cli.api_url)?;
            let catalog = client.catalog().load().await?;
            for status in catalog.statuses() {
                println!("{:<40} {}", status.code, status.title);
            }
        }
    }

    Ok(())
}

/// `list` prints positions starting at 1; the store indexes from 0.
fn position_to_index(position: usize) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("positions start at 1"),
    }
}

fn open_store(path: Option<PathBuf>) -> Result<TrackingStore> {
    match path {
        Some(path) => Ok(TrackingStore::new(path)),
        None => TrackingStore::at_default_location().context("locating the tracking store"),
    }
}

fn http_client(api_url: &str) -> Result<TrackingClient> {
    let transport = ShipxTransport::new(api_url)?;
    Ok(TrackingClient::over_http(transport))
}

fn print_numbers(numbers: &[TrackingNumber]) {
    for (index, number) in numbers.iter().enumerate() {
        println!("{:>3}. {number}", index + 1);
    }
}
