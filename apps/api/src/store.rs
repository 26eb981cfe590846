//! Record store client — typed CRUD façade over the hosted document
//! collections API.
//!
//! ARCHITECTURAL RULE: no other module may talk to the record store
//! directly. All collection access goes through `RecordStore`.
//!
//! The trait works on raw JSON documents so it stays object-safe and can be
//! carried in `AppState` as `Arc<dyn RecordStore>`; the typed `get_all` /
//! `get_by_id` / `create` / `delete` layer lives on `dyn RecordStore`.
//! Calls are single round-trips: no pagination, no retry, no caching.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Collection holding uploaded certificates.
pub const CERTIFICATES: &str = "certificates";
/// Collection holding the user's skill inventory.
pub const SKILLS: &str = "skills";
/// Collection holding AI-generated career recommendations (read-only).
pub const CAREER_RECOMMENDATIONS: &str = "careerrecommendations";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("record store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("record {id} not found in {collection}")]
    NotFound { collection: String, id: String },

    #[error("failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Wire shape of a collection listing: `{ "items": [...] }`.
/// Result-set size and ordering are entirely server-determined.
#[derive(Debug, Deserialize)]
struct ListResponse {
    items: Vec<Value>,
}

/// Object-safe CRUD surface over a named document collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
    async fn fetch(&self, collection: &str, id: &str) -> Result<Value, StoreError>;
    async fn insert(&self, collection: &str, record: Value) -> Result<Value, StoreError>;
    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

impl dyn RecordStore {
    /// Lists every record in `collection`, decoded as `T`.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, StoreError> {
        let items = self.list(collection).await?;
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(StoreError::Decode))
            .collect()
    }

    /// Fetches a single record by identifier.
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, StoreError> {
        let item = self.fetch(collection, id).await?;
        serde_json::from_value(item).map_err(StoreError::Decode)
    }

    /// Stores a new record and returns it as acknowledged by the remote.
    pub async fn create<T: Serialize + DeserializeOwned>(
        &self,
        collection: &str,
        record: &T,
    ) -> Result<T, StoreError> {
        let body = serde_json::to_value(record)?;
        let created = self.insert(collection, body).await?;
        serde_json::from_value(created).map_err(StoreError::Decode)
    }

    /// Deletes a record by identifier.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.remove(collection, id).await
    }
}

/// HTTP implementation backed by the hosted record store.
///
/// Endpoints: `{base}/v1/collections/{collection}/items[/{id}]`, bearer auth.
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpRecordStore {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn items_url(&self, collection: &str) -> String {
        format!("{}/v1/collections/{collection}/items", self.base_url)
    }

    fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{id}", self.items_url(collection))
    }

    /// Maps any non-success response to `StoreError::Api`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(self.items_url(collection))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let listing: ListResponse = Self::check(response).await?.json().await?;
        debug!("listed {} items from {collection}", listing.items.len());
        Ok(listing.items)
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let response = self
            .client
            .get(self.item_url(collection, id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(Self::check(response).await?.json().await?)
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.items_url(collection))
            .bearer_auth(&self.token)
            .json(&record)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.item_url(collection, id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Self::check(response).await?;
        Ok(())
    }
}

/// In-memory store double for controller tests: seedable collections plus a
/// switch that makes every write fail while reads keep serving the snapshot,
/// which is exactly the shape the optimistic-rollback protocol needs.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        collections: Mutex<HashMap<String, Vec<Value>>>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, collection: &str, items: Vec<Value>) {
            self.collections
                .lock()
                .unwrap()
                .insert(collection.to_string(), items);
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        pub fn snapshot(&self, collection: &str) -> Vec<Value> {
            self.collections
                .lock()
                .unwrap()
                .get(collection)
                .cloned()
                .unwrap_or_default()
        }

        fn failure(kind: &str) -> StoreError {
            StoreError::Api {
                status: 503,
                message: format!("simulated {kind} failure"),
            }
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(Self::failure("read"));
            }
            Ok(self.snapshot(collection))
        }

        async fn fetch(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(Self::failure("read"));
            }
            self.snapshot(collection)
                .into_iter()
                .find(|item| item.get("_id").and_then(Value::as_str) == Some(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
        }

        async fn insert(&self, collection: &str, record: Value) -> Result<Value, StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::failure("write"));
            }
            self.collections
                .lock()
                .unwrap()
                .entry(collection.to_string())
                .or_default()
                .push(record.clone());
            Ok(record)
        }

        async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::failure("write"));
            }
            let mut collections = self.collections.lock().unwrap();
            let items = collections.entry(collection.to_string()).or_default();
            let before = items.len();
            items.retain(|item| item.get("_id").and_then(Value::as_str) != Some(id));
            if items.len() == before {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
            Ok(())
        }
    }
}
