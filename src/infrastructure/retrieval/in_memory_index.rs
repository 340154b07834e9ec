//! In-memory document index ranked by cosine similarity

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use super::CorpusDocument;
use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, cosine_similarity};
use crate::domain::retrieval::{DocumentRetriever, RetrievedDocument};

#[derive(Debug, Clone)]
struct IndexedDocument {
    document: CorpusDocument,
    embedding: Vec<f32>,
}

/// Summary reported by the health endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexHealth {
    pub status: &'static str,
    pub num_documents: usize,
    pub embedding_dim: usize,
    pub embedding_provider: &'static str,
}

/// Document index for development and demos.
///
/// Documents are embedded once at build time; the index is read-only
/// afterwards, so searches need no locking.
#[derive(Debug)]
pub struct InMemoryDocumentIndex {
    documents: Vec<IndexedDocument>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl InMemoryDocumentIndex {
    /// Embed every document and build the index
    pub async fn build(
        documents: Vec<CorpusDocument>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let mut indexed = Vec::with_capacity(documents.len());

        for document in documents {
            let embedding = embedder.embed(&document.index_text()).await?;
            indexed.push(IndexedDocument {
                document,
                embedding,
            });
        }

        info!(
            num_documents = indexed.len(),
            provider = embedder.provider_name(),
            "Document index built"
        );

        Ok(Self {
            documents: indexed,
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn health(&self) -> IndexHealth {
        IndexHealth {
            status: "healthy",
            num_documents: self.documents.len(),
            embedding_dim: self.embedder.dimensions(),
            embedding_provider: self.embedder.provider_name(),
        }
    }
}

#[async_trait]
impl DocumentRetriever for InMemoryDocumentIndex {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        let query_embedding = self.embedder.embed(query).await?;

        let mut scored: Vec<(f32, &IndexedDocument)> = self
            .documents
            .iter()
            .map(|doc| (cosine_similarity(&query_embedding, &doc.embedding), doc))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);

        debug!(
            top_k = top_k,
            returned = scored.len(),
            best = scored.first().map(|(s, _)| *s),
            "Index search complete"
        );

        Ok(scored
            .into_iter()
            .map(|(score, indexed)| {
                let doc = &indexed.document;
                let mut result =
                    RetrievedDocument::new(&doc.id, &doc.title, &doc.content, score);
                if let Some(category) = &doc.category {
                    result = result.with_category(category);
                }
                result
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}
