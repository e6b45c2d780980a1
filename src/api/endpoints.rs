use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use super::client::ApiClient;
use super::error::ApiError;
use crate::buffered_eprintln;
use crate::priority::Priority;
use crate::records::{Customer, Envelope, Lead, LeadStatus, RecordId, Service, ServiceStatus};

/// Which collection a priority update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Lead,
    Customer,
}

impl RecordKind {
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Lead => "leads",
            RecordKind::Customer => "customers",
        }
    }

    /// Body key the backend reads the record id from.
    pub fn id_field(&self) -> &'static str {
        match self {
            RecordKind::Lead => "leadId",
            RecordKind::Customer => "customerId",
        }
    }

    pub fn priority_path(&self, id: &RecordId) -> String {
        format!("{}/priority/{}", self.collection(), id)
    }
}

pub fn lead_status_path(id: &RecordId) -> String {
    format!("leads/status/{}", id)
}

pub fn service_status_path(id: &RecordId) -> String {
    format!("services/status/{}", id)
}

/// `{"priority": ..., "leadId" | "customerId": id}`
pub fn priority_body(kind: RecordKind, id: &RecordId, priority: Priority) -> Value {
    let mut body = Map::new();
    body.insert("priority".to_string(), json!(priority));
    body.insert(kind.id_field().to_string(), json!(id));
    Value::Object(body)
}

pub fn lead_status_body(id: &RecordId, status: LeadStatus) -> Value {
    json!({ "status": status, "leadId": id })
}

pub fn service_status_body(status: ServiceStatus) -> Value {
    json!({ "status": status })
}

fn retry_strategy() -> impl Iterator<Item = std::time::Duration> {
    // One try plus two retries
    ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(2)
}

async fn get_body(client: &ApiClient, url: &str) -> Result<Vec<u8>, ApiError> {
    let response = client.http.get(url).send().await?;
    if let Some(err) = ApiError::from_status(response.status(), url) {
        return Err(err);
    }
    Ok(response.bytes().await?.to_vec())
}

/// Decode a `{ success, data }` envelope holding a list.
pub fn decode_collection<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    let envelope: Envelope<Vec<T>> = serde_json::from_slice(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    envelope.into_data()
}

/// GET a collection endpoint with retries. Falls back to the last cached body
/// when the backend cannot be reached.
pub async fn get_collection<T: DeserializeOwned>(client: &ApiClient, path: &str) -> Result<Vec<T>> {
    let url = client.url(path);

    let fetched = RetryIf::start(
        retry_strategy(),
        || get_body(client, &url),
        |e: &ApiError| e.is_transient(),
    )
    .await;

    match fetched {
        Ok(body) => {
            let items = decode_collection(&body)
                .with_context(|| format!("Failed to decode response from {}", url))?;
            if let Some(cache) = &client.cache {
                if let Err(e) = cache.store(&url, &body) {
                    buffered_eprintln!("Warning: {}", e);
                }
            }
            Ok(items)
        }
        Err(err) => {
            let cached = client.cache.as_ref().and_then(|c| c.load(&url));
            match cached {
                Some(entry) if err.is_transient() => {
                    let age = (chrono::Utc::now() - entry.fetched_at)
                        .to_std()
                        .unwrap_or_default();
                    buffered_eprintln!(
                        "Warning: {} - using cached data from {} ago",
                        err,
                        humantime::format_duration(std::time::Duration::from_secs(age.as_secs()))
                    );
                    decode_collection(&entry.body)
                        .with_context(|| format!("Cached response for {} is unreadable", url))
                }
                _ => Err(err.into()),
            }
        }
    }
}

pub async fn fetch_leads(client: &ApiClient) -> Result<Vec<Lead>> {
    get_collection(client, "leads").await
}

pub async fn fetch_customers(client: &ApiClient) -> Result<Vec<Customer>> {
    get_collection(client, "customers").await
}

pub async fn fetch_services(client: &ApiClient) -> Result<Vec<Service>> {
    get_collection(client, "services").await
}

// Shared by every write. Writes are not retried.
async fn patch_json(client: &ApiClient, path: &str, body: &Value) -> Result<(), ApiError> {
    let url = client.url(path);
    let response = client.http.patch(&url).json(body).send().await?;

    if let Some(err) = ApiError::from_status(response.status(), &url) {
        return Err(err);
    }

    // Some handlers answer 200 with `success: false`.
    let body = response.bytes().await?;
    if let Ok(envelope) = serde_json::from_slice::<Envelope<Value>>(&body) {
        if !envelope.success {
            return Err(ApiError::Backend(
                envelope.message.unwrap_or_else(|| "update rejected".to_string()),
            ));
        }
    }
    Ok(())
}

/// PATCH `{collection}/priority/{id}` with the new tag and the record id.
pub async fn update_priority(
    client: &ApiClient,
    kind: RecordKind,
    id: &RecordId,
    priority: Priority,
) -> Result<(), ApiError> {
    patch_json(client, &kind.priority_path(id), &priority_body(kind, id, priority)).await
}

/// PATCH `leads/status/{id}`.
pub async fn update_lead_status(
    client: &ApiClient,
    id: &RecordId,
    status: LeadStatus,
) -> Result<(), ApiError> {
    patch_json(client, &lead_status_path(id), &lead_status_body(id, status)).await
}

/// PATCH `services/status/{id}`.
pub async fn update_service_status(
    client: &ApiClient,
    id: &RecordId,
    status: ServiceStatus,
) -> Result<(), ApiError> {
    patch_json(client, &service_status_path(id), &service_status_body(status)).await
}
