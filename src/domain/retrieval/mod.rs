//! Retrieval domain: documents and backend seams

mod document;
mod retriever;

pub use document::{DocumentRef, PREVIEW_CHARS, RetrievedDocument, preview};
pub use retriever::{AnswerSynthesizer, DocumentRetriever};

#[cfg(test)]
pub use retriever::{MockAnswerSynthesizer, MockDocumentRetriever};
