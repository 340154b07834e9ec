//! Query metrics log implementations

mod in_memory;

pub use in_memory::InMemoryMetricsLog;
