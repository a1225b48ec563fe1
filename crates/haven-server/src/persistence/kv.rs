//! Minimal authenticated HTTP client for the key-value service.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A persistent-backend operation failed. Never surfaced to API callers;
/// the store recovers through its in-memory mirror.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("KV request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("KV store error: {status} {message}")]
    Status { status: u16, message: String },
    #[error("Failed to decode KV payload: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for a namespaced key-value HTTP service.
///
/// Key listing by prefix is the only query primitive the service offers,
/// which is why incident keys embed a spatial bucket.
pub struct KvClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    store_name: String,
}

#[derive(Debug, serde::Deserialize)]
struct ListKeysResponse {
    keys: Vec<String>,
}

impl KvClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        store_name: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
            store_name: store_name.into(),
        }
    }

    fn value_url(&self, key: &str) -> String {
        format!("{}/kv/{}/{}", self.base_url, self.store_name, key)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let response = self
            .client
            .put(self.value_url(key))
            .header("Authorization", self.auth_header())
            .json(value)
            .send()
            .await
            .map_err(StorageError::Transport)?;

        Self::check(response).await?;
        Ok(())
    }

    /// Fetch and decode a value. A missing key is `None`, not an error.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let response = self
            .client
            .get(self.value_url(key))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(StorageError::Transport)?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let response = Self::check(response).await?;
        let value = response.json().await.map_err(StorageError::Decode)?;
        Ok(Some(value))
    }

    /// Delete a key. Deleting a missing key is a no-op.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.value_url(key))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(StorageError::Transport)?;

        if response.status().as_u16() == 404 {
            return Ok(());
        }

        Self::check(response).await?;
        Ok(())
    }

    /// List every key in the store starting with `prefix`.
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let url = format!("{}/kv/{}/keys", self.base_url, self.store_name);
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .query(&[("prefix", prefix)])
            .send()
            .await
            .map_err(StorageError::Transport)?;

        let response = Self::check(response).await?;
        let payload: ListKeysResponse = response.json().await.map_err(StorageError::Decode)?;
        Ok(payload.keys)
    }
}
