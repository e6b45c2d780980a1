use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statuses a lead can be moved to from the inquiry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            other => Err(format!("unknown lead status '{}' (expected new or contacted)", other)),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Workflow stages of a service. Only `completed` counts towards the KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "not started")]
    NotStarted,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "under review")]
    UnderReview,
    #[serde(rename = "completed")]
    Completed,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::NotStarted => "not started",
            ServiceStatus::InProgress => "in progress",
            ServiceStatus::UnderReview => "under review",
            ServiceStatus::Completed => "completed",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not started" => Ok(ServiceStatus::NotStarted),
            "in progress" => Ok(ServiceStatus::InProgress),
            "under review" => Ok(ServiceStatus::UnderReview),
            "completed" => Ok(ServiceStatus::Completed),
            other => Err(format!(
                "unknown service status '{}' (expected \"not started\", \"in progress\", \"under review\" or completed)",
                other
            )),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
