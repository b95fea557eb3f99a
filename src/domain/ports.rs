use crate::domain::model::{NormalizedRecord, RawRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where pages of raw records come from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Total number of rows in the dataset.
    async fn count(&self) -> Result<u64>;

    /// Fetch one page of at most `limit` rows starting at `offset`.
    async fn fetch_page(&self, limit: usize, offset: u64) -> Result<Vec<RawRecord>>;
}

/// Where normalized records end up.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Submit one batch as a single bulk write. Individual-document failures
    /// inside the call are the store's concern, not distinguished here.
    async fn bulk_index(&self, docs: &[NormalizedRecord]) -> Result<()>;
}
