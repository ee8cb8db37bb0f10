use anyhow::Context;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{Query, Store, StoreError};
use crate::config::StoreEndpoint;

const REST_PREFIX: &str = "rest/v1";

/// PostgREST-compatible HTTP binding of [`Store`].
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

impl RestStore {
    pub fn new(endpoint: &StoreEndpoint) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .context("failed building HTTP client for the store")?;

        Ok(Self {
            client,
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            key: endpoint.key.clone(),
        })
    }

    fn collection_url(&self, collection: &str, params: &[(String, String)]) -> String {
        let mut url = format!("{}/{REST_PREFIX}/{collection}", self.base_url);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&encode_params(params));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.key))
            .header(ACCEPT, "application/json")
    }

    fn encode<T: Serialize>(collection: &str, record: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(record).map_err(|source| StoreError::Encode {
            collection: collection.to_string(),
            source,
        })
    }

    async fn send(&self, collection: &str, request: RequestBuilder) -> Result<String, StoreError> {
        let transport = |source| StoreError::Transport {
            collection: collection.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            warn!(collection, status = %status, "store rejected request");
            return Err(StoreError::Status {
                collection: collection.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Sends a write that returns the affected rows, failing when none matched.
    async fn write_by_id(
        &self,
        collection: &str,
        id: Uuid,
        request: RequestBuilder,
    ) -> Result<(), StoreError> {
        let body = self
            .send(collection, request.header("Prefer", "return=representation"))
            .await?;
        let rows: Vec<serde_json::Value> = decode(collection, &body)?;
        if rows.is_empty() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id,
            });
        }
        Ok(())
    }
}

impl Store for RestStore {
    #[instrument(skip(self, query), fields(filters = query.filters.len()))]
    async fn select<T>(&self, collection: &str, query: &Query) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let url = self.collection_url(collection, &select_params(query));
        let body = self
            .send(collection, self.request(Method::GET, &url))
            .await?;
        let rows: Vec<T> = decode(collection, &body)?;
        debug!(collection, count = rows.len(), "selected rows");
        Ok(rows)
    }

    #[instrument(skip(self, record))]
    async fn insert<T>(&self, collection: &str, record: &T) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let payload = Self::encode(collection, record)?;
        let url = self.collection_url(collection, &[]);
        let request = self
            .request(Method::POST, &url)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(payload);
        self.send(collection, request).await?;
        debug!(collection, "inserted row");
        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn update<T>(&self, collection: &str, id: Uuid, patch: &T) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let payload = Self::encode(collection, patch)?;
        let url = self.collection_url(collection, &id_params(id));
        let request = self
            .request(Method::PATCH, &url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.write_by_id(collection, id, request).await?;
        debug!(collection, %id, "updated row");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let url = self.collection_url(collection, &id_params(id));
        let request = self.request(Method::DELETE, &url);
        self.write_by_id(collection, id, request).await?;
        debug!(collection, %id, "deleted row");
        Ok(())
    }
}

/// Query string pairs in PostgREST's `field=op.value` syntax.
pub fn select_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (field, value) in &query.filters {
        params.push((field.clone(), format!("eq.{value}")));
    }
    if let Some(order) = &query.order {
        params.push((
            "order".to_string(),
            format!("{}.{}", order.field, order.direction.as_key()),
        ));
    }
    params
}

fn id_params(id: Uuid) -> Vec<(String, String)> {
    vec![("id".to_string(), format!("eq.{id}"))]
}

fn encode_params(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

fn decode<T: DeserializeOwned>(collection: &str, body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|source| StoreError::Decode {
        collection: collection.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chores_shared::SortDirection;

    use super::*;

    fn store() -> RestStore {
        RestStore::new(&StoreEndpoint {
            url: "https://household.example/".to_string(),
            key: "anon-key".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn select_encodes_filters_and_order() {
        let category = Uuid::nil();
        let query = Query::all()
            .eq("category_id", category)
            .order_by("created_at", SortDirection::Ascending);

        let url = store().collection_url("tasks", &select_params(&query));
        assert_eq!(
            url,
            format!(
                "https://household.example/rest/v1/tasks?select=*&category_id=eq.{category}&order=created_at.asc"
            )
        );
    }

    #[test]
    fn writes_target_a_single_id() {
        let id = Uuid::new_v4();
        let url = store().collection_url("tasks", &id_params(id));
        assert_eq!(
            url,
            format!("https://household.example/rest/v1/tasks?id=eq.{id}")
        );
    }

    #[test]
    fn undecodable_bodies_are_store_errors() {
        let err = decode::<Vec<serde_json::Value>>("tasks", "<html>").unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
        assert!(err.to_string().contains("tasks"));
    }
}
