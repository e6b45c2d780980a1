use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::dates::deserialize_lenient;
use crate::priority::Priority;

/// Backend identifiers are numeric for some collections and strings for others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

// Ids typed on the command line: all digits is numeric, anything else is text.
impl std::str::FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<i64>()
            .map(RecordId::Number)
            .unwrap_or_else(|_| RecordId::Text(s.to_string())))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// An unconverted inquiry awaiting follow-up.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(default)]
    pub lead_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub budget: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub business: Option<String>,
}

/// A converted lead with an ongoing service relationship.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub customer_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub last_service: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub total_spent: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub last_activity: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub response_urgency: Option<String>,
    #[serde(default)]
    pub customer_history: Option<String>,
    #[serde(default)]
    pub service_complexity: Option<String>,
}

impl Customer {
    /// The service used for valuation: `service`, then `lastService`, then the
    /// first entry of `services`.
    pub fn primary_service(&self) -> Option<&str> {
        let non_blank = |s: &&str| !s.trim().is_empty();
        self.service
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.last_service.as_deref().filter(non_blank))
            .or_else(|| self.services.first().map(String::as_str))
    }

    /// Date used for windows and months: `date`, else `lastActivity`.
    pub fn activity_date(&self) -> Option<NaiveDateTime> {
        self.date.or(self.last_activity)
    }
}

/// A unit of billable work tracked per customer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub service_id: RecordId,
    #[serde(default)]
    pub customer_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub completed_date: Option<NaiveDateTime>,
}

impl Service {
    /// Creation date: `date`, else `startDate`.
    pub fn created_date(&self) -> Option<NaiveDateTime> {
        self.date.or(self.start_date)
    }

    /// Date used for completion windows: completion date, falling back to creation.
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.completed_date.or_else(|| self.created_date())
    }
}

/// Standard backend response wrapper: `{ success, data, message? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning `success: false` into an error carrying the
    /// backend's message.
    pub fn into_data(self) -> anyhow::Result<T> {
        if !self.success {
            anyhow::bail!(
                "Backend reported failure: {}",
                self.message.as_deref().unwrap_or("no message")
            );
        }
        self.data
            .ok_or_else(|| anyhow::anyhow!("Backend response is missing the data field"))
    }
}

/// All three collections the dashboard aggregates over.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub services: Vec<Service>,
}

fn deserialize_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Priority::parse(&s),
        _ => None,
    })
}

// Numbers may arrive as JSON numbers or numeric strings; anything else is None.
fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
