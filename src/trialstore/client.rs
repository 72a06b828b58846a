use qdrant_client::Qdrant;
use qdrant_client::qdrant::SearchPointsBuilder;
use tracing::{debug, warn};

use super::TrialFilter;
use super::error::TrialStoreError;
use super::model::TrialDocument;
use crate::embedding::QueryEmbedder;

/// Minimal async interface used by the pipeline.
pub trait TrialStore: Send + Sync {
    /// Returns `true` when the store can serve retrieval requests.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Performs one similarity search, returning up to `limit` documents
    /// matching `filter` in rank order.
    ///
    /// An unavailable or empty index yields an empty sequence, not an error;
    /// the caller decides whether that is fatal.
    fn retrieve(
        &self,
        query: &str,
        limit: u64,
        filter: &TrialFilter,
    ) -> impl std::future::Future<Output = Result<Vec<TrialDocument>, TrialStoreError>> + Send;
}

/// Qdrant-backed trial store.
///
/// Wraps the nearest-neighbor index as a black box: embeds the query with the
/// injected [`QueryEmbedder`] and pushes the metadata filter down into the
/// search request.
#[derive(Clone)]
pub struct QdrantTrialStore<E> {
    client: Qdrant,
    collection: String,
    embedder: E,
}

impl<E: QueryEmbedder> QdrantTrialStore<E> {
    /// Creates a store for `url` searching `collection`.
    pub fn connect(
        url: &str,
        collection: impl Into<String>,
        embedder: E,
    ) -> Result<Self, TrialStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| TrialStoreError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            collection: collection.into(),
            embedder,
        })
    }

    /// Returns the collection searched by this store.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl<E> TrialStore for QdrantTrialStore<E>
where
    E: QueryEmbedder,
{
    async fn is_ready(&self) -> bool {
        if self.client.health_check().await.is_err() {
            return false;
        }

        self.client
            .collection_exists(&self.collection)
            .await
            .unwrap_or(false)
    }

    async fn retrieve(
        &self,
        query: &str,
        limit: u64,
        filter: &TrialFilter,
    ) -> Result<Vec<TrialDocument>, TrialStoreError> {
        let vector = self.embedder.embed(query).await?;

        let mut search_builder =
            SearchPointsBuilder::new(&self.collection, vector, limit).with_payload(true);

        if let Some(qdrant_filter) = filter.to_qdrant() {
            search_builder = search_builder.filter(qdrant_filter);
        }

        let search_result = match self.client.search_points(search_builder).await {
            Ok(result) => result,
            Err(e) => {
                // An unreachable or empty index is not an error at this
                // layer; the orchestrator gates on is_ready() separately.
                warn!(collection = %self.collection, error = %e, "trial search failed, returning no candidates");
                return Ok(Vec::new());
            }
        };

        let documents: Vec<TrialDocument> = search_result
            .result
            .into_iter()
            .map(TrialDocument::from_scored_point)
            .collect();

        debug!(
            collection = %self.collection,
            candidates = documents.len(),
            "retrieved trial candidates"
        );

        Ok(documents)
    }
}
