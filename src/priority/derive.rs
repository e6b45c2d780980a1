use super::config::PriorityConfig;
use super::factors::{BusinessType, CustomerHistory, PriorityFactors, ServiceComplexity, Urgency};
use super::service_values::service_value;
use crate::records::{Customer, Lead};

/// Build scoring inputs for a customer, filling gaps from the config defaults.
pub fn factors_for_customer(customer: &Customer, config: &PriorityConfig) -> PriorityFactors {
    let overrides = config.service_values.as_ref();
    let value = service_value(customer.primary_service().unwrap_or_default(), overrides);

    PriorityFactors {
        service_value: value,
        inquiry_date: customer.activity_date(),
        business_type: hint(&customer.business_type)
            .map(BusinessType::parse)
            .unwrap_or_else(|| config.default_business_type()),
        response_urgency: hint(&customer.response_urgency)
            .and_then(Urgency::try_parse)
            .unwrap_or_else(|| config.default_urgency()),
        customer_history: hint(&customer.customer_history)
            .and_then(CustomerHistory::try_parse)
            .unwrap_or_else(|| config.default_history()),
        service_complexity: hint(&customer.service_complexity)
            .and_then(ServiceComplexity::try_parse)
            .unwrap_or_else(|| config.default_complexity()),
    }
}

/// Build scoring inputs for a lead. A positive budget stands in for the
/// catalogue value unless `prefer_budget` is off.
pub fn factors_for_lead(lead: &Lead, config: &PriorityConfig) -> PriorityFactors {
    let budget = lead.budget.filter(|b| b.is_finite() && *b > 0.0);
    let value = match budget {
        Some(b) if config.prefer_budget() => b,
        _ => service_value(&lead.service, config.service_values.as_ref()),
    };

    PriorityFactors {
        service_value: value,
        inquiry_date: lead.date,
        business_type: hint(&lead.business)
            .map(BusinessType::parse)
            .unwrap_or_else(|| config.default_business_type()),
        response_urgency: config.default_urgency(),
        customer_history: config.default_history(),
        service_complexity: config.default_complexity(),
    }
}

fn hint(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
