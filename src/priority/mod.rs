pub mod config;
pub mod derive;
pub mod distribution;
pub mod engine;
pub mod factors;
pub mod service_values;
pub mod validation;

pub use config::{FactorDefaults, PriorityConfig};
pub use derive::{factors_for_customer, factors_for_lead};
pub use distribution::{priority_distribution, PriorityCounts};
pub use engine::{calculate_priority, Breakdown, FactorKey, PriorityResult};
pub use factors::{
    BusinessType, CustomerHistory, Priority, PriorityFactors, ServiceComplexity, Urgency,
};
pub use service_values::{service_value, DEFAULT_SERVICE_VALUE, SERVICE_CATALOGUE};
pub use validation::validate_priority_config;
