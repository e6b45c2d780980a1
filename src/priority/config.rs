use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::factors::{BusinessType, CustomerHistory, ServiceComplexity, Urgency};

/// How records are turned into priority factors.
///
/// The factor weights themselves are fixed. This only controls where the
/// inputs come from when a record leaves them blank.
///
/// Example YAML:
/// ```yaml
/// priority:
///   prefer_budget: true
///   service_values:
///     "Patent Filing": 60000
///   defaults:
///     business_type: Individual
///     response_urgency: normal
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PriorityConfig {
    /// Score leads by their stated budget when it is positive (default: true)
    #[serde(default)]
    pub prefer_budget: Option<bool>,

    /// Per-service value overrides, merged over the built-in catalogue
    #[serde(default)]
    pub service_values: Option<BTreeMap<String, f64>>,

    /// Factor values used when a record carries no hint
    #[serde(default)]
    pub defaults: Option<FactorDefaults>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FactorDefaults {
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub response_urgency: Option<String>,
    #[serde(default)]
    pub customer_history: Option<String>,
    #[serde(default)]
    pub service_complexity: Option<String>,
}

impl PriorityConfig {
    pub fn prefer_budget(&self) -> bool {
        self.prefer_budget.unwrap_or(true)
    }

    fn defaults(&self) -> Option<&FactorDefaults> {
        self.defaults.as_ref()
    }

    pub fn default_business_type(&self) -> BusinessType {
        self.defaults()
            .and_then(|d| d.business_type.as_deref())
            .map(BusinessType::parse)
            .unwrap_or(BusinessType::Individual)
    }

    pub fn default_urgency(&self) -> Urgency {
        self.defaults()
            .and_then(|d| d.response_urgency.as_deref())
            .map(Urgency::parse)
            .unwrap_or_default()
    }

    pub fn default_history(&self) -> CustomerHistory {
        self.defaults()
            .and_then(|d| d.customer_history.as_deref())
            .map(CustomerHistory::parse)
            .unwrap_or_default()
    }

    pub fn default_complexity(&self) -> ServiceComplexity {
        self.defaults()
            .and_then(|d| d.service_complexity.as_deref())
            .map(ServiceComplexity::parse)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config: PriorityConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.prefer_budget());
        assert_eq!(config.default_business_type(), BusinessType::Individual);
        assert_eq!(config.default_urgency(), Urgency::Normal);
        assert_eq!(config.default_history(), CustomerHistory::New);
        assert_eq!(config.default_complexity(), ServiceComplexity::Medium);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
prefer_budget: false
service_values:
  "Patent Filing": 60000
  "Visa Assistance": 3000
defaults:
  business_type: Retail
  response_urgency: urgent
  customer_history: vip
  service_complexity: high
"#;
        let config: PriorityConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(!config.prefer_budget());
        assert_eq!(config.service_values.as_ref().unwrap().len(), 2);
        assert_eq!(config.default_business_type(), BusinessType::Retail);
        assert_eq!(config.default_urgency(), Urgency::Urgent);
        assert_eq!(config.default_history(), CustomerHistory::Vip);
        assert_eq!(config.default_complexity(), ServiceComplexity::High);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "weights: { service_value: 50 }";
        assert!(serde_saphyr::from_str::<PriorityConfig>(yaml).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PriorityConfig {
            prefer_budget: Some(true),
            service_values: Some(BTreeMap::from([("GST Registration".to_string(), 6000.0)])),
            defaults: Some(FactorDefaults {
                business_type: Some("Finance".to_string()),
                ..Default::default()
            }),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: PriorityConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
