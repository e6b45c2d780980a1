use anyhow::{Context, Result};
use std::time::Duration;

use super::cache::{get_cache_path, CacheConfig, ResponseCache};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client bound to one backend base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    pub(crate) cache: Option<ResponseCache>,
}

impl ApiClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/api/{path}` with exactly one slash at each joint.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Create a client for the admin backend.
pub fn create_client(base_url: &str, timeout: Duration, cache_config: &CacheConfig) -> Result<ApiClient> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        anyhow::bail!("API base URL is empty");
    }
    reqwest::Url::parse(&base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;

    let http = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("leaddesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let cache = cache_config
        .enabled
        .then(|| ResponseCache::new(get_cache_path()));

    Ok(ApiClient {
        http,
        base_url,
        cache,
    })
}
