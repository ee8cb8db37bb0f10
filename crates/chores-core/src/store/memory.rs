use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use chores_shared::SortDirection;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::{Query, Store, StoreError};

/// A write observed by [`MemoryStore`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Insert { collection: String, record: Value },
    Update { collection: String, id: Uuid, patch: Value },
    Delete { collection: String, id: Uuid },
}

#[derive(Debug, Default)]
struct Inner {
    collections: BTreeMap<String, Vec<Map<String, Value>>>,
    calls: Vec<StoreCall>,
    inserted: i64,
    fail_writes: bool,
}

/// Process-local store with the same contract as the REST binding. Inserted
/// rows get an `id` and a monotonically increasing `created_at`.
#[derive(Debug)]
pub struct MemoryStore {
    epoch: DateTime<Utc>,
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            epoch: Utc::now(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Inserts rows directly, bypassing the call log.
    pub fn seed<T: Serialize>(&self, collection: &str, rows: &[T]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        for row in rows {
            let record = to_object(collection, row)?;
            let record = self.stamp(&mut inner, record);
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(record);
        }
        Ok(())
    }

    /// Makes every following write fail with HTTP 503 until turned off.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    fn stamp(&self, inner: &mut Inner, mut record: Map<String, Value>) -> Map<String, Value> {
        if !record.get("id").is_some_and(Value::is_string) {
            record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        if !record.contains_key("created_at") {
            let created = self.epoch + Duration::microseconds(inner.inserted);
            record.insert(
                "created_at".to_string(),
                Value::String(created.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
        inner.inserted += 1;
        record
    }

    fn check_writable(inner: &Inner, collection: &str) -> Result<(), StoreError> {
        if inner.fail_writes {
            return Err(StoreError::Status {
                collection: collection.to_string(),
                status: 503,
                body: "injected write failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn select<T>(&self, collection: &str, query: &Query) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let mut rows: Vec<Map<String, Value>> = {
            let inner = self.inner.lock();
            inner
                .collections
                .get(collection)
                .map(|rows| {
                    rows.iter()
                        .filter(|row| {
                            query
                                .filters
                                .iter()
                                .all(|(field, value)| field_equals(row, field, value))
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        debug!(collection, count = rows.len(), "selected rows from memory");
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(Value::Object(row)).map_err(|source| StoreError::Decode {
                    collection: collection.to_string(),
                    source,
                })
            })
            .collect()
    }

    async fn insert<T>(&self, collection: &str, record: &T) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let record = to_object(collection, record)?;
        let mut inner = self.inner.lock();
        Self::check_writable(&inner, collection)?;
        inner.calls.push(StoreCall::Insert {
            collection: collection.to_string(),
            record: Value::Object(record.clone()),
        });
        let record = self.stamp(&mut inner, record);
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn update<T>(&self, collection: &str, id: Uuid, patch: &T) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let patch = to_object(collection, patch)?;
        let mut inner = self.inner.lock();
        Self::check_writable(&inner, collection)?;
        inner.calls.push(StoreCall::Update {
            collection: collection.to_string(),
            id,
            patch: Value::Object(patch.clone()),
        });

        let row = inner
            .collections
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|row| row_has_id(row, id)))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })?;
        row.extend(patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        Self::check_writable(&inner, collection)?;
        inner.calls.push(StoreCall::Delete {
            collection: collection.to_string(),
            id,
        });

        let rows = inner.collections.entry(collection.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| !row_has_id(row, id));
        if rows.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id,
            });
        }
        Ok(())
    }
}

fn to_object<T: Serialize>(collection: &str, value: &T) -> Result<Map<String, Value>, StoreError> {
    let encode = |source| StoreError::Encode {
        collection: collection.to_string(),
        source,
    };
    match serde_json::to_value(value).map_err(encode)? {
        Value::Object(map) => Ok(map),
        other => Err(encode(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

fn row_has_id(row: &Map<String, Value>, id: Uuid) -> bool {
    field_equals(row, "id", &id.to_string())
}

fn field_equals(row: &Map<String, Value>, field: &str, value: &str) -> bool {
    match row.get(field) {
        Some(Value::String(text)) => text == value,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == value,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (None | Some(Value::Null), None | Some(Value::Null)) => CmpOrdering::Equal,
        (None | Some(Value::Null), _) => CmpOrdering::Less,
        (_, None | Some(Value::Null)) => CmpOrdering::Greater,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}
