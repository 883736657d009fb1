use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ListFilter, Repository};
use crate::error::{Error, Result};
use crate::mapper::{FieldMapper, IdKind};
use crate::postgrest::PostgrestApiErrorDetails;

#[derive(Default)]
struct Table {
    rows: Vec<Value>,
    next_serial: i64,
}

/// In-process table that behaves like the hosted one: it assigns ids,
/// stamps `created_at`/`updated_at`, rejects duplicate ids and merges
/// partial updates.
pub struct MemoryRepository<M> {
    table: Mutex<Table>,
    fetches: AtomicUsize,
    offline: AtomicBool,
    latency: Option<Duration>,
    _mapper: PhantomData<fn() -> M>,
}

impl<M> Default for MemoryRepository<M> {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table::default()),
            fetches: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
            latency: None,
            _mapper: PhantomData,
        }
    }
}

impl<M: FieldMapper> MemoryRepository<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every read, to make overlapping calls observable
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `fetch_all` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// While offline every operation fails like an unreachable backend
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Stores a row verbatim, bypassing id assignment and timestamps
    pub async fn insert_raw(&self, row: Value) {
        self.table.lock().await.rows.push(row);
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every row, like truncating the table
    pub async fn clear(&self) {
        self.table.lock().await.rows.clear();
    }

    /// The stored row with id `id`, as the storage layer sees it
    pub async fn raw_row(&self, id: &str) -> Option<Value> {
        self.table
            .lock()
            .await
            .rows
            .iter()
            .find(|row| column_text(row, M::ID_COLUMN).as_deref() == Some(id))
            .cloned()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::UnparsedApi {
                message: "backend unreachable".to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(())
    }

    fn stamp_new(table: &mut Table, row: Value) -> Result<Value> {
        let mut object = into_object(row)?;
        match M::ID_KIND {
            IdKind::Serial => {
                table.next_serial += 1;
                object.insert(M::ID_COLUMN.to_string(), Value::from(table.next_serial));
            }
            IdKind::Text => {
                let missing = object.get(M::ID_COLUMN).map_or(true, Value::is_null);
                if missing {
                    object.insert(
                        M::ID_COLUMN.to_string(),
                        Value::String(Uuid::new_v4().to_string()),
                    );
                }
            }
        }

        let id = object.get(M::ID_COLUMN).and_then(text).unwrap_or_default();
        let taken = table
            .rows
            .iter()
            .any(|existing| column_text(existing, M::ID_COLUMN).as_deref() == Some(id.as_str()));
        if taken {
            return Err(duplicate_key(M::TABLE, &id));
        }

        let now = timestamp();
        object
            .entry("created_at")
            .or_insert_with(|| Value::String(now.clone()));
        object.insert("updated_at".to_string(), Value::String(now));
        Ok(Value::Object(object))
    }
}

#[async_trait]
impl<M: FieldMapper> Repository<M> for MemoryRepository<M> {
    async fn fetch_all(&self, filter: Option<&ListFilter>) -> Result<Vec<M::Row>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.check_online()?;

        let mut rows: Vec<Value> = {
            let table = self.table.lock().await;
            table
                .rows
                .iter()
                .rev()
                .filter(|row| filter.map_or(true, |f| f.matches(column_text(row, &f.column).as_deref())))
                .cloned()
                .collect()
        };
        // newest first; rows sharing a timestamp keep reverse insertion order
        rows.sort_by(|a, b| {
            let a = column_text(a, "created_at").unwrap_or_default();
            let b = column_text(b, "created_at").unwrap_or_default();
            b.cmp(&a)
        });

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Error::from))
            .collect()
    }

    async fn insert(&self, row: &M::NewRow) -> Result<M::Row> {
        self.check_online()?;
        let value = serde_json::to_value(row)?;
        let mut table = self.table.lock().await;
        let stored = Self::stamp_new(&mut table, value)?;
        table.rows.push(stored.clone());
        Ok(serde_json::from_value(stored)?)
    }

    async fn insert_many(&self, rows: &[M::NewRow]) -> Result<usize> {
        self.check_online()?;
        let mut table = self.table.lock().await;
        // all or nothing, like a single INSERT statement
        let mut staged = Table {
            rows: table.rows.clone(),
            next_serial: table.next_serial,
        };
        for row in rows {
            let stored = Self::stamp_new(&mut staged, serde_json::to_value(row)?)?;
            staged.rows.push(stored);
        }
        *table = staged;
        Ok(rows.len())
    }

    async fn update(&self, id: &str, patch: &M::RowPatch) -> Result<M::Row> {
        self.check_online()?;
        let changes = into_object(serde_json::to_value(patch)?)?;
        let mut table = self.table.lock().await;
        let row = table
            .rows
            .iter_mut()
            .find(|row| column_text(row, M::ID_COLUMN).as_deref() == Some(id))
            .ok_or_else(|| Error::not_found(M::TABLE, id))?;

        if let Value::Object(object) = row {
            for (key, value) in changes {
                object.insert(key, value);
            }
            object.insert("updated_at".to_string(), Value::String(timestamp()));
        }
        Ok(serde_json::from_value(row.clone())?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.check_online()?;
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table
            .rows
            .retain(|row| column_text(row, M::ID_COLUMN).as_deref() != Some(id));
        if table.rows.len() == before {
            return Err(Error::not_found(M::TABLE, id));
        }
        Ok(())
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(Error::invalid_input(format!("expected a row object, got {}", other))),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn column_text(row: &Value, column: &str) -> Option<String> {
    row.get(column).and_then(text)
}

fn duplicate_key(table: &str, id: &str) -> Error {
    Error::Api {
        details: PostgrestApiErrorDetails {
            code: Some("23505".to_string()),
            message: Some(format!(
                "duplicate key value violates unique constraint \"{}_pkey\"",
                table
            )),
            details: Some(format!("Key (id)=({}) already exists.", id)),
            hint: None,
        },
        status: StatusCode::CONFLICT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{ClientMapper, RepairMapper};
    use crate::models::{ClientDraft, RepairDraft};

    #[tokio::test]
    async fn serial_ids_and_timestamps() {
        let repo = MemoryRepository::<RepairMapper>::new();
        let draft = RepairDraft {
            asset_id: "CON-001".into(),
            ..Default::default()
        };
        let first = repo.insert(&RepairMapper::to_new_row(&draft)).await.unwrap();
        let second = repo.insert(&RepairMapper::to_new_row(&draft)).await.unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
        assert!(first.created_at.is_some());
        assert!(repo.raw_row("2").await.unwrap()["id"].is_number());
    }

    #[tokio::test]
    async fn text_ids_are_generated_when_missing() {
        let repo = MemoryRepository::<ClientMapper>::new();
        let row = ClientMapper::to_new_row(&ClientDraft::default());
        let stored = repo.insert(&row).await.unwrap();
        assert!(Uuid::parse_str(&stored.id).is_ok());
    }

    #[tokio::test]
    async fn bulk_insert_is_atomic_on_duplicate_ids() {
        let repo = MemoryRepository::<ClientMapper>::new();
        let mut rows = ClientMapper::seed_rows();
        rows.push(rows[0].clone());

        let err = repo.insert_many(&rows).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: StatusCode::CONFLICT, .. }));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn filters_on_stringified_columns() {
        let repo = MemoryRepository::<RepairMapper>::new();
        for asset_id in ["CON-001", "CON-002", "CON-001"] {
            let draft = RepairDraft {
                asset_id: asset_id.into(),
                ..Default::default()
            };
            repo.insert(&RepairMapper::to_new_row(&draft)).await.unwrap();
        }

        let filter = ListFilter::eq("asset_id", "CON-001");
        assert_eq!(repo.fetch_all(Some(&filter)).await.unwrap().len(), 2);
        let by_id = ListFilter::eq("id", "2");
        assert_eq!(repo.fetch_all(Some(&by_id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let repo = MemoryRepository::<ClientMapper>::new();
        let patch = ClientMapper::to_row_patch(&Default::default());
        assert!(matches!(
            repo.update("CL-404", &patch).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(repo.delete("CL-404").await, Err(Error::NotFound { .. })));
    }
}
