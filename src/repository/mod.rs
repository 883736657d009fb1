//! Per-table storage access behind one trait
//!
//! Stores never talk to the gateway directly; they are handed a
//! [`Repository`] so the caching and mapping logic can run against
//! [`MemoryRepository`] in tests and offline.

use async_trait::async_trait;

use crate::error::Result;
use crate::mapper::{AssetMapper, ClientMapper, FieldMapper, MaintenanceMapper, RepairMapper};

mod memory;
mod postgrest;

pub use self::memory::MemoryRepository;
pub use self::postgrest::PostgrestRepository;

/// Single equality condition for list reads, e.g. repairs of one asset
pub use crate::postgrest::Filter as ListFilter;

/// Row-level operations on the table of mapper `M`
#[async_trait]
pub trait Repository<M: FieldMapper>: Send + Sync {
    /// All rows matching `filter`, newest first
    async fn fetch_all(&self, filter: Option<&ListFilter>) -> Result<Vec<M::Row>>;

    /// Inserts one row and returns it as stored. Anything other than
    /// exactly one row back is an error.
    async fn insert(&self, row: &M::NewRow) -> Result<M::Row>;

    /// Bulk insert; returns the number of rows written
    async fn insert_many(&self, rows: &[M::NewRow]) -> Result<usize>;

    /// Applies `patch` to the row with id `id` and returns the stored row
    async fn update(&self, id: &str, patch: &M::RowPatch) -> Result<M::Row>;

    async fn delete(&self, id: &str) -> Result<()>;
}

pub type AssetRepository = dyn Repository<AssetMapper>;
pub type ClientRepository = dyn Repository<ClientMapper>;
pub type RepairRepository = dyn Repository<RepairMapper>;
pub type MaintenanceRepository = dyn Repository<MaintenanceMapper>;
