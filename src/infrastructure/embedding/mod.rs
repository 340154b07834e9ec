//! Embedding provider implementations

mod hashing;
pub mod http_client;
mod openai;

pub use hashing::HashingEmbeddingProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiEmbeddingProvider;
