use super::config::PriorityConfig;
use super::factors::{CustomerHistory, ServiceComplexity, Urgency};

/// Validate priority configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_priority_config(config: &PriorityConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref values) = config.service_values {
        for (name, value) in values {
            if !value.is_finite() || *value < 0.0 {
                errors.push(format!(
                    "priority.service_values['{}']: must be a non-negative number, got {}",
                    name, value
                ));
            }
        }
    }

    // business_type is exempt: unknown types are scored, not rejected.
    if let Some(ref defaults) = config.defaults {
        if let Some(ref u) = defaults.response_urgency {
            if Urgency::try_parse(u).is_none() {
                errors.push(format!(
                    "priority.defaults.response_urgency: invalid '{}' - expected urgent, normal or low",
                    u
                ));
            }
        }
        if let Some(ref h) = defaults.customer_history {
            if CustomerHistory::try_parse(h).is_none() {
                errors.push(format!(
                    "priority.defaults.customer_history: invalid '{}' - expected new, returning or vip",
                    h
                ));
            }
        }
        if let Some(ref c) = defaults.service_complexity {
            if ServiceComplexity::try_parse(c).is_none() {
                errors.push(format!(
                    "priority.defaults.service_complexity: invalid '{}' - expected high, medium or low",
                    c
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
