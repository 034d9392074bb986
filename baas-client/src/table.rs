//! Typed table access over a [`DataStore`]

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use shared::models::Record;
use uuid::Uuid;

use crate::{ClientError, ClientResult, DataStore, Query};

/// Repository for one record type
pub struct Table<T: Record> {
    store: Arc<dyn DataStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Table<T> {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Every row, unfiltered
    pub async fn list(&self) -> ClientResult<Vec<T>> {
        self.list_where(Query::new()).await
    }

    pub async fn list_where(&self, query: Query) -> ClientResult<Vec<T>> {
        let rows = self.store.select(T::TABLE, &query).await?;
        rows.into_iter().map(decode).collect()
    }

    pub async fn find(&self, id: Uuid) -> ClientResult<Option<T>> {
        let rows = self
            .store
            .select(T::TABLE, &Query::by_id(id).limit(1))
            .await?;
        rows.into_iter().next().map(decode).transpose()
    }

    /// Like [`find`](Self::find) but absent rows are an error
    pub async fn get(&self, id: Uuid) -> ClientResult<T> {
        self.find(id).await?.ok_or_else(|| not_found::<T>(id))
    }

    pub async fn insert<P: Serialize>(&self, payload: &P) -> ClientResult<T> {
        let row = self.store.insert(T::TABLE, to_object(payload)?).await?;
        decode(row)
    }

    /// Unconditional partial update of one row (toggles, status changes)
    pub async fn patch<P: Serialize>(&self, id: Uuid, patch: &P) -> ClientResult<T> {
        let rows = self
            .store
            .update(T::TABLE, &Query::by_id(id), to_object(patch)?)
            .await?;
        rows.into_iter()
            .next()
            .map(decode)
            .transpose()?
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Full-row update conditional on the version the caller read.
    ///
    /// Bumps `version`. When nothing matched, the row is looked up again to
    /// tell a stale version (`Conflict`) from a missing row (`NotFound`).
    pub async fn update_versioned<P: Serialize>(
        &self,
        id: Uuid,
        version: i64,
        data: &P,
    ) -> ClientResult<T> {
        let mut patch = to_object(data)?;
        if let Value::Object(map) = &mut patch {
            map.remove("id");
            map.insert("version".to_string(), Value::from(version + 1));
        }
        let query = Query::by_id(id).eq("version", version);
        let rows = self.store.update(T::TABLE, &query, patch).await?;
        if let Some(row) = rows.into_iter().next() {
            return decode(row);
        }
        match self.find(id).await? {
            Some(_) => Err(ClientError::Conflict(format!(
                "{} {} was modified by someone else",
                T::RESOURCE,
                id
            ))),
            None => Err(not_found::<T>(id)),
        }
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<()> {
        match self.store.delete(T::TABLE, &Query::by_id(id)).await? {
            0 => Err(not_found::<T>(id)),
            _ => Ok(()),
        }
    }

    pub async fn upsert<P: Serialize>(&self, payload: &P, on_conflict: &str) -> ClientResult<T> {
        let row = self
            .store
            .upsert(T::TABLE, to_object(payload)?, on_conflict)
            .await?;
        decode(row)
    }
}

fn decode<T: Record>(row: Value) -> ClientResult<T> {
    serde_json::from_value(row).map_err(|e| {
        ClientError::InvalidResponse(format!("{} row does not match schema: {}", T::TABLE, e))
    })
}

fn to_object<P: Serialize>(payload: &P) -> ClientResult<Value> {
    match serde_json::to_value(payload)? {
        value @ Value::Object(_) => Ok(value),
        other => Err(ClientError::Validation(format!(
            "expected an object payload, got {}",
            other
        ))),
    }
}

fn not_found<T: Record>(id: Uuid) -> ClientError {
    ClientError::NotFound(format!("{} {} not found", T::RESOURCE, id))
}
