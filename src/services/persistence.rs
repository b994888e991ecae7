use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("no such table: {0}")]
    NoSuchTable(String),
    #[error("unexpected error, {0}")]
    Unexpected(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Record CRUD by table name, the boundary to whatever actually persists
/// portal data. Records are raw JSON objects; the store never interprets
/// them beyond their `id` field.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError>;

    /// Returns the records of `table` matching every `(column, value)`
    /// equality filter. An empty filter list selects the whole table.
    async fn select(&self, table: &str, filters: &[(&str, &str)]) -> Result<Vec<Value>, StoreError>;

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError>;

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;

    async fn find(&self, table: &str, id: &str) -> Result<Value, StoreError> {
        self.select(table, &[("id", id)])
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }
}

/// Test double keeping every table in memory, with sequential ids.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: Mutex<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(record: &Value, filters: &[(&str, &str)]) -> bool {
        filters.iter().all(|(column, value)| {
            record
                .get(column)
                .map(|field| match field {
                    Value::String(s) => s == value,
                    other => other.to_string() == *value,
                })
                .unwrap_or(false)
        })
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, table: &str, mut record: Value) -> Result<Value, StoreError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            next_id.to_string()
        };
        record["id"] = Value::String(id);

        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn select(&self, table: &str, filters: &[(&str, &str)]) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let records = match tables.get(table) {
            Some(records) => records,
            None => return Ok(vec![]),
        };
        Ok(records
            .iter()
            .filter(|record| Self::matches(record, filters))
            .cloned()
            .collect())
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let records = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;
        let record = records
            .iter_mut()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
            .ok_or(StoreError::NotFound)?;

        if let (Value::Object(target), Value::Object(changes)) = (&mut *record, patch) {
            for (key, value) in changes {
                target.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let records = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;
        let before = records.len();
        records.retain(|record| record.get("id").and_then(Value::as_str) != Some(id));
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
