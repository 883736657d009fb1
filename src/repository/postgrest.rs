use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ListFilter, Repository};
use crate::error::{Error, Result};
use crate::mapper::FieldMapper;
use crate::postgrest::SortOrder;
use crate::supabase::Supabase;

/// [`Repository`] backed by the hosted PostgREST API
pub struct PostgrestRepository<M> {
    supabase: Supabase,
    _mapper: PhantomData<fn() -> M>,
}

impl<M> PostgrestRepository<M> {
    pub fn new(supabase: Supabase) -> Self {
        Self {
            supabase,
            _mapper: PhantomData,
        }
    }
}

impl<M> Clone for PostgrestRepository<M> {
    fn clone(&self) -> Self {
        Self::new(self.supabase.clone())
    }
}

// `single()` answers with an object, but some proxies strip the Accept
// header and hand back a one-element array.
fn exactly_one<T: DeserializeOwned>(value: Value) -> Result<T> {
    match value {
        Value::Array(mut rows) if rows.len() == 1 => Ok(serde_json::from_value(rows.remove(0))?),
        Value::Array(rows) => Err(Error::RowCount {
            expected: 1,
            actual: rows.len(),
        }),
        Value::Null => Err(Error::RowCount {
            expected: 1,
            actual: 0,
        }),
        object => Ok(serde_json::from_value(object)?),
    }
}

#[async_trait]
impl<M: FieldMapper> Repository<M> for PostgrestRepository<M> {
    async fn fetch_all(&self, filter: Option<&ListFilter>) -> Result<Vec<M::Row>> {
        let mut query = self
            .supabase
            .from(M::TABLE)
            .select("*")
            .order("created_at", SortOrder::Descending);
        if let Some(filter) = filter {
            query = query.filter(filter);
        }
        let rows = query.execute::<M::Row>().await?;
        tracing::debug!(table = M::TABLE, count = rows.len(), "fetched rows");
        Ok(rows)
    }

    async fn insert(&self, row: &M::NewRow) -> Result<M::Row> {
        let value = self
            .supabase
            .from(M::TABLE)
            .select("*")
            .single()
            .insert(row)
            .await?;
        exactly_one(value)
    }

    async fn insert_many(&self, rows: &[M::NewRow]) -> Result<usize> {
        let value = self.supabase.from(M::TABLE).insert(rows).await?;
        Ok(match value {
            Value::Array(inserted) => inserted.len(),
            _ => rows.len(),
        })
    }

    async fn update(&self, id: &str, patch: &M::RowPatch) -> Result<M::Row> {
        let value = self
            .supabase
            .from(M::TABLE)
            .eq(M::ID_COLUMN, id)
            .select("*")
            .single()
            .update(patch)
            .await?;
        exactly_one(value)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let value = self
            .supabase
            .from(M::TABLE)
            .eq(M::ID_COLUMN, id)
            .delete()
            .await?;
        match value {
            Value::Array(deleted) if deleted.is_empty() => Err(Error::not_found(M::TABLE, id)),
            _ => Ok(()),
        }
    }
}
