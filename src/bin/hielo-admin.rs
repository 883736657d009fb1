use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hielo_polar_admin::clients_csv;
use hielo_polar_admin::config::{ClientOptions, MapConfig, MapToken, SupabaseConfig};
use hielo_polar_admin::error::{Error, Result};
use hielo_polar_admin::map;
use hielo_polar_admin::mapper::{AssetMapper, ClientMapper, MaintenanceMapper, RepairMapper};
use hielo_polar_admin::models::{
    AssetPatch, AssetStatus, ClientPatch, ClientStatus, MaintenancePatch, MaintenanceStatus,
    NewAssetForm, RepairPatch, RepairStatus,
};
use hielo_polar_admin::repository::{ListFilter, MemoryRepository};
use hielo_polar_admin::store::{Notification, NotificationKind, Notifier};
use hielo_polar_admin::Dashboard;

#[derive(Parser, Debug)]
#[clap(name = "hielo-admin", version)]
#[clap(about = "Hielo Polar dashboard data from the command line", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Work against an in-memory copy seeded with the demo data
    #[clap(long)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List coolers, clients, repairs or maintenances
    List {
        entity: Entity,
        /// Only repairs of this cooler
        #[clap(long)]
        asset: Option<String>,
    },
    /// Change the status of one record
    SetStatus {
        entity: Entity,
        id: String,
        status: String,
    },
    /// Register a new cooler
    NewAsset {
        #[clap(long)]
        model: String,
        #[clap(long)]
        serial: String,
        #[clap(long, default_value = "100 bolsas (5kg)")]
        capacity: String,
        #[clap(long)]
        temperature: String,
        #[clap(long, default_value = "Almacén Principal")]
        location: String,
        #[clap(long, default_value = "")]
        image: String,
    },
    /// Write the client list to clientes-<date>.csv
    ExportClients {
        #[clap(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Add every client found in a CSV file
    ImportClients { file: PathBuf },
    /// Print the GeoJSON the map layer consumes
    Map { entity: Entity },
}

#[derive(Debug, Clone, Copy)]
enum Entity {
    Assets,
    Clients,
    Repairs,
    Maintenances,
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "assets" | "conservadores" => Ok(Entity::Assets),
            "clients" | "clientes" => Ok(Entity::Clients),
            "repairs" | "reparaciones" => Ok(Entity::Repairs),
            "maintenances" | "mantenimientos" => Ok(Entity::Maintenances),
            other => Err(format!("unknown entity {:?}", other)),
        }
    }
}

/// Prints notifications the way the dashboard would toast them
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "✔",
            NotificationKind::Error => "✘",
        };
        eprintln!("{} {}: {}", marker, notification.title, notification.description);
    }
}

fn connect(offline: bool) -> Result<Dashboard> {
    let notifier = Arc::new(StderrNotifier);
    if offline {
        return Ok(Dashboard::with_repositories(
            Arc::new(MemoryRepository::<AssetMapper>::new()),
            Arc::new(MemoryRepository::<ClientMapper>::new()),
            Arc::new(MemoryRepository::<RepairMapper>::new()),
            Arc::new(MemoryRepository::<MaintenanceMapper>::new()),
            notifier,
            None,
        ));
    }
    let config = SupabaseConfig::from_env()?;
    Dashboard::connect(&config, ClientOptions::default(), notifier)
}

fn parse_status<T, E: std::fmt::Display>(
    raw: &str,
    parse: fn(&str) -> std::result::Result<T, E>,
) -> Result<T> {
    parse(raw).map_err(Error::invalid_input)
}

async fn list(dashboard: &Dashboard, entity: Entity, asset: Option<String>) -> Result<()> {
    match entity {
        Entity::Assets => {
            for asset in dashboard.assets.list(None).await?.iter() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    asset.id,
                    asset.model,
                    asset.status.label(),
                    asset.location,
                    asset.assigned_to.as_deref().unwrap_or("-")
                );
            }
        }
        Entity::Clients => {
            for client in dashboard.clients.list(None).await?.iter() {
                println!(
                    "{}\t{}\t{}\t{}\t{:.0}%",
                    client.id,
                    client.name,
                    client.status.label(),
                    client.channel_type.label(),
                    client.credit_utilization()
                );
            }
        }
        Entity::Repairs => {
            let filter = asset.map(|id| ListFilter::eq("asset_id", &id));
            for repair in dashboard.repairs.list(filter).await?.iter() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    repair.id,
                    repair.repair_number(),
                    repair.asset_id,
                    repair.status.label(),
                    repair.priority.label()
                );
            }
        }
        Entity::Maintenances => {
            for maintenance in dashboard.maintenances.list(None).await?.iter() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    maintenance.id,
                    maintenance.date,
                    maintenance.title,
                    maintenance.asset,
                    maintenance.status.label()
                );
            }
        }
    }
    Ok(())
}

async fn set_status(dashboard: &Dashboard, entity: Entity, id: &str, status: &str) -> Result<()> {
    match entity {
        Entity::Assets => {
            let status = parse_status(status, AssetStatus::parse)?;
            dashboard.assets.update(id, &AssetPatch::status(status)).await?;
        }
        Entity::Clients => {
            let status = parse_status(status, ClientStatus::parse)?;
            dashboard.clients.update(id, &ClientPatch::status(status)).await?;
        }
        Entity::Repairs => {
            let status = parse_status(status, RepairStatus::parse)?;
            dashboard.repairs.update(id, &RepairPatch::status(status)).await?;
        }
        Entity::Maintenances => {
            let status = parse_status(status, MaintenanceStatus::parse)?;
            dashboard
                .maintenances
                .update(id, &MaintenancePatch::status(status))
                .await?;
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let dashboard = connect(cli.offline)?;

    match cli.command {
        Command::List { entity, asset } => list(&dashboard, entity, asset).await?,
        Command::SetStatus { entity, id, status } => {
            set_status(&dashboard, entity, &id, &status).await?
        }
        Command::NewAsset {
            model,
            serial,
            capacity,
            temperature,
            location,
            image,
        } => {
            let form = NewAssetForm {
                model,
                serial_number: serial,
                location,
                capacity,
                temperature_range: temperature,
                image_src: image,
            };
            let existing = dashboard.assets.list(None).await?;
            let asset = form.into_asset(&existing, Local::now().date_naive())?;
            let created = dashboard.assets.add(&asset).await?;
            println!("{}", created.id);
        }
        Command::ExportClients { dir } => {
            let clients = dashboard.clients.list(None).await?;
            let path = clients_csv::write_export_file(&dir, &clients, Local::now().date_naive())?;
            println!("{}", path.display());
        }
        Command::ImportClients { file } => {
            let imported = clients_csv::read_import_file(&file)?;
            let mut rng = rand::thread_rng();
            let mut added = 0;
            for client in imported {
                // one failed row does not stop the rest
                if dashboard.clients.add(&client.into_draft(&mut rng)).await.is_ok() {
                    added += 1;
                }
            }
            println!("Se importaron {} clientes correctamente.", added);
        }
        Command::Map { entity } => {
            match MapConfig::from_env().token {
                MapToken::Configured(_) => {}
                MapToken::NeedsEntry => eprintln!("Falta el token del mapa: defina MAPBOX_API_TOKEN"),
            }
            let collection = match entity {
                Entity::Assets => map::asset_features(&dashboard.assets.list(None).await?),
                Entity::Clients => map::client_features(&dashboard.clients.list(None).await?),
                other => {
                    return Err(Error::invalid_input(format!("{:?} have no map layer", other)));
                }
            };
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!(error = %err, "command failed");
        std::process::exit(1);
    }
}
