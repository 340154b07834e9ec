//! Infrastructure layer - Concrete adapters for the domain ports

pub mod embedding;
pub mod logging;
pub mod metrics;
pub mod observability;
pub mod retrieval;
pub mod semantic_cache;
pub mod services;
