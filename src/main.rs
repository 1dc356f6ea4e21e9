//! Command-line entry point.

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use roomledger::config::AppConfig;
use roomledger::core::billing;
use roomledger::errors::Result;
use roomledger::model::Building;
use roomledger::service::DormService;
use roomledger::store::SqlStore;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roomledger", about = "Dormitory and housing management", version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default mock tree and admin account into the store
    Seed {
        /// Seed even if the store already holds data
        #[arg(long)]
        yes: bool,
    },
    /// Print the building tree with occupancy
    Tree,
    /// Print the monthly usage report for one or all buildings
    Report {
        /// Building id; all buildings when omitted
        #[arg(long)]
        building: Option<String>,
        /// Month key (YYYY-MM); the current month when omitted
        #[arg(long)]
        month: Option<String>,
    },
    /// Import a JSON table dump into the store
    Import {
        /// Path to the JSON dump
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load .env non-fatally, env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    let store = Arc::new(SqlStore::connect(&config.database_url).await?);
    let mut service = DormService::load(Arc::clone(&store), vec![config.bootstrap_admin()]).await;
    if service.offline() {
        warn!("running offline against the mock tree, nothing will be persisted");
    }

    match cli.command {
        Command::Seed { yes } => {
            if service.state().buildings.is_empty() || yes {
                service.seed().await?;
                println!("Seeded {} buildings.", service.state().buildings.len());
            } else {
                println!("Store already holds data; pass --yes to seed anyway.");
            }
        }
        Command::Tree => {
            print!("{}", render_tree(&service.state().buildings));
        }
        Command::Report { building, month } => {
            let month = month.unwrap_or_else(billing::current_month);
            let ids: Vec<String> = building.map_or_else(
                || {
                    service
                        .state()
                        .buildings
                        .iter()
                        .map(|b| b.id.clone())
                        .collect()
                },
                |id| vec![id],
            );
            for id in ids {
                println!("{}", service.report(&id, &month)?);
            }
        }
        Command::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let count = service.import_snapshot(&json).await?;
            println!("Imported {count} rows.");
        }
    }

    Ok(())
}

fn render_tree(buildings: &[Building]) -> String {
    let mut out = String::new();
    for building in buildings {
        let _ = writeln!(out, "{} ({})", building.name, building.id);
        for floor in &building.floors {
            let _ = writeln!(out, "  {}", floor.display_name());
            for room in &floor.rooms {
                let occupants = if room.residents.is_empty() {
                    "vacant".to_string()
                } else {
                    room.residents
                        .iter()
                        .map(|r| r.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let _ = writeln!(
                    out,
                    "    {} [{}] {}",
                    room.number,
                    room.room_type.as_str(),
                    occupants
                );
            }
        }
    }
    out
}
