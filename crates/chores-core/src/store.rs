//! Generic access to the external store: select with equality filters and
//! ordering, insert, update-by-id and delete-by-id over named collections.

pub mod memory;
pub mod rest;

use std::future::Future;

use chores_shared::SortDirection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub use memory::{MemoryStore, StoreCall};
pub use rest::RestStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request to '{collection}' failed: {source}")]
    Transport {
        collection: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{collection}' returned HTTP {status}: {body}")]
    Status {
        collection: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode '{collection}' response: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record for '{collection}': {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no record in '{collection}' with id {id}")]
    NotFound { collection: String, id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: SortDirection,
}

/// Row selection for [`Store::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order: Option<Ordering>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((field.into(), value.to_string()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(Ordering {
            field: field.into(),
            direction,
        });
        self
    }
}

/// The store is an opaque collaborator; every implementation must return a
/// `NotFound` error when an update or delete matches no record.
pub trait Store {
    fn select<T>(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send
    where
        T: DeserializeOwned + Send;

    fn insert<T>(
        &self,
        collection: &str,
        record: &T,
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        T: Serialize + Sync;

    fn update<T>(
        &self,
        collection: &str,
        id: Uuid,
        patch: &T,
    ) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        T: Serialize + Sync;

    fn delete(
        &self,
        collection: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
