use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const HIGH_THRESHOLD: u32 = 70;
    pub const MEDIUM_THRESHOLD: u32 = 40;

    pub fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Priority::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Case-insensitive parse. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessType {
    Enterprise,
    TechnologyStartup,
    Manufacturing,
    Healthcare,
    Finance,
    Retail,
    Consulting,
    Individual,
    Other(String),
}

impl BusinessType {
    /// Exact label match as the backend stores it. Anything else, including a
    /// case variant such as "enterprise", is `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Enterprise" => BusinessType::Enterprise,
            "Technology Startup" => BusinessType::TechnologyStartup,
            "Manufacturing" => BusinessType::Manufacturing,
            "Healthcare" => BusinessType::Healthcare,
            "Finance" => BusinessType::Finance,
            "Retail" => BusinessType::Retail,
            "Consulting" => BusinessType::Consulting,
            "Individual" => BusinessType::Individual,
            _ => BusinessType::Other(s.to_string()),
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            BusinessType::Enterprise => 20,
            BusinessType::TechnologyStartup => 18,
            BusinessType::Manufacturing | BusinessType::Healthcare | BusinessType::Finance => 15,
            BusinessType::Retail | BusinessType::Consulting => 10,
            BusinessType::Individual => 5,
            BusinessType::Other(_) => 8,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BusinessType::Enterprise => "Enterprise",
            BusinessType::TechnologyStartup => "Technology Startup",
            BusinessType::Manufacturing => "Manufacturing",
            BusinessType::Healthcare => "Healthcare",
            BusinessType::Finance => "Finance",
            BusinessType::Retail => "Retail",
            BusinessType::Consulting => "Consulting",
            BusinessType::Individual => "Individual",
            BusinessType::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    Urgent,
    #[default]
    Normal,
    Low,
}

impl Urgency {
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Some(Urgency::Urgent),
            "normal" => Some(Urgency::Normal),
            "low" => Some(Urgency::Low),
            _ => None,
        }
    }

    /// Unknown values fall back to `normal`.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerHistory {
    #[default]
    New,
    Returning,
    Vip,
}

impl CustomerHistory {
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Some(CustomerHistory::New),
            "returning" => Some(CustomerHistory::Returning),
            "vip" => Some(CustomerHistory::Vip),
            _ => None,
        }
    }

    /// Unknown values fall back to `new`.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_default()
    }

    pub fn weight(&self) -> u32 {
        match self {
            CustomerHistory::Vip => 10,
            CustomerHistory::Returning => 7,
            CustomerHistory::New => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceComplexity {
    High,
    #[default]
    Medium,
    Low,
}

impl ServiceComplexity {
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(ServiceComplexity::High),
            "medium" => Some(ServiceComplexity::Medium),
            "low" => Some(ServiceComplexity::Low),
            _ => None,
        }
    }

    /// Unknown values fall back to `medium`.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_default()
    }

    pub fn weight(&self) -> u32 {
        match self {
            ServiceComplexity::High => 5,
            ServiceComplexity::Medium => 3,
            ServiceComplexity::Low => 1,
        }
    }
}

/// Inputs to the priority score for one lead or customer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityFactors {
    pub service_value: f64,
    /// `None` when the record had no usable date.
    pub inquiry_date: Option<NaiveDateTime>,
    pub business_type: BusinessType,
    pub response_urgency: Urgency,
    pub customer_history: CustomerHistory,
    pub service_complexity: ServiceComplexity,
}
