//! Hielo Polar data layer
//!
//! Keeps the cooler rental dashboard in sync with its Supabase tables:
//! coolers ("conservadores"), clients, repair orders and maintenance visits.
//! Each entity gets a cached [`EntityStore`](store::EntityStore) over an
//! injected [`Repository`](repository::Repository); field mappers translate
//! between the camelCase entities and the snake_case rows.

pub mod clients_csv;
pub mod config;
pub mod error;
pub mod map;
pub mod mapper;
pub mod models;
pub mod postgrest;
pub mod repository;
pub mod seed;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use crate::config::{ClientOptions, SupabaseConfig};
use crate::error::Result;
use crate::mapper::{AssetMapper, ClientMapper, MaintenanceMapper, RepairMapper};
use crate::repository::{
    AssetRepository, ClientRepository, MaintenanceRepository, PostgrestRepository, RepairRepository,
};
use crate::store::{AssetStore, ClientStore, MaintenanceStore, Notifier, RepairStore};

pub use crate::supabase::Supabase;

/// The four entity stores the dashboard pages read from
pub struct Dashboard {
    pub assets: AssetStore,
    pub clients: ClientStore,
    pub repairs: RepairStore,
    pub maintenances: MaintenanceStore,
}

impl Dashboard {
    /// Connects every store to the hosted tables
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use hielo_polar_admin::config::{ClientOptions, SupabaseConfig};
    /// use hielo_polar_admin::store::TracingNotifier;
    /// use hielo_polar_admin::Dashboard;
    ///
    /// # async fn run() -> hielo_polar_admin::error::Result<()> {
    /// let config = SupabaseConfig::from_env()?;
    /// let dashboard = Dashboard::connect(&config, ClientOptions::default(), Arc::new(TracingNotifier))?;
    /// let clients = dashboard.clients.list(None).await?;
    /// println!("{} clients", clients.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(
        config: &SupabaseConfig,
        options: ClientOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let stale_time = options.stale_time;
        let supabase = Supabase::new_with_options(config, options)?;
        Ok(Self::with_repositories(
            Arc::new(PostgrestRepository::<AssetMapper>::new(supabase.clone())),
            Arc::new(PostgrestRepository::<ClientMapper>::new(supabase.clone())),
            Arc::new(PostgrestRepository::<RepairMapper>::new(supabase.clone())),
            Arc::new(PostgrestRepository::<MaintenanceMapper>::new(supabase)),
            notifier,
            stale_time,
        ))
    }

    pub fn with_repositories(
        assets: Arc<AssetRepository>,
        clients: Arc<ClientRepository>,
        repairs: Arc<RepairRepository>,
        maintenances: Arc<MaintenanceRepository>,
        notifier: Arc<dyn Notifier>,
        stale_time: Option<std::time::Duration>,
    ) -> Self {
        Self {
            assets: AssetStore::with_stale_time(assets, Arc::clone(&notifier), stale_time),
            clients: ClientStore::with_stale_time(clients, Arc::clone(&notifier), stale_time),
            repairs: RepairStore::with_stale_time(repairs, Arc::clone(&notifier), stale_time),
            maintenances: MaintenanceStore::with_stale_time(maintenances, notifier, stale_time),
        }
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, MapConfig, MapToken, SupabaseConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::repository::{ListFilter, MemoryRepository, PostgrestRepository, Repository};
    pub use crate::store::{
        ChannelNotifier, EntityStore, Notification, NotificationKind, Notifier, QueryState,
        TracingNotifier,
    };
    pub use crate::Dashboard;
    pub use crate::Supabase;
}
