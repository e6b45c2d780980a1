pub mod api;
pub mod clock;
pub mod config;
pub mod fetch;
pub mod output;
pub mod priority;
pub mod records;
pub mod reprioritize;
pub mod stats;
pub mod stderr_buffer;
