pub mod cache;
pub mod client;
pub mod endpoints;
pub mod error;

pub use cache::{clear_cache, CacheConfig};
pub use client::{create_client, ApiClient, DEFAULT_TIMEOUT};
pub use endpoints::{
    fetch_customers, fetch_leads, fetch_services, get_collection, update_lead_status,
    update_priority, update_service_status, RecordKind,
};
pub use error::ApiError;
