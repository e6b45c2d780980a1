pub mod dates;
pub mod status;
pub mod types;

pub use dates::parse_timestamp;
pub use status::{LeadStatus, ServiceStatus};
pub use types::{Customer, Dataset, Envelope, Lead, RecordId, Service};
