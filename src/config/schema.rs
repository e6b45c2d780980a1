use serde::{Deserialize, Serialize};

use crate::priority::PriorityConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend base URL, e.g. "http://localhost:5000"
    #[serde(default)]
    pub api_url: Option<String>,

    /// Per-request timeout as a humantime duration ("15s", "1m")
    #[serde(default)]
    pub timeout: Option<String>,

    #[serde(default)]
    pub priority: Option<PriorityConfig>,
}
