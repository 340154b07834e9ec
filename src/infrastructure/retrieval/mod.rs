//! Retrieval backend implementations

mod corpus;
mod in_memory_index;
mod template_synthesizer;

pub use corpus::{CorpusDocument, demo_corpus, load_corpus, parse_corpus};
pub use in_memory_index::{InMemoryDocumentIndex, IndexHealth};
pub use template_synthesizer::TemplateAnswerSynthesizer;
