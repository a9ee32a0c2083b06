use crate::error::{StoreError, StoreResult};
use crate::revision::RevisionInfo;

/// Read access to the saved revisions of versioned items.
///
/// Implementations must satisfy these invariants:
/// - `history` lists revisions newest first.
/// - Every id returned by `history` can be passed to `content`.
/// - Stored content is returned exactly as saved.
pub trait RevisionStore: Send + Sync {
    /// Revisions of `item`, newest first.
    ///
    /// Returns `StoreError::ItemNotFound` if the item has no history.
    fn history(&self, item: &str) -> StoreResult<Vec<RevisionInfo>>;

    /// The document text of one revision.
    fn content(&self, item: &str, revision_id: &str) -> StoreResult<String>;

    /// Names of all items with at least one revision, sorted.
    fn items(&self) -> StoreResult<Vec<String>>;

    /// Metadata of one revision.
    ///
    /// Default implementation scans `history()`.
    fn revision(&self, item: &str, revision_id: &str) -> StoreResult<RevisionInfo> {
        self.history(item)?
            .into_iter()
            .find(|r| r.id == revision_id)
            .ok_or_else(|| StoreError::RevisionNotFound {
                item: item.to_string(),
                revision: revision_id.to_string(),
            })
    }

    /// The newest revision of `item`.
    fn latest(&self, item: &str) -> StoreResult<RevisionInfo> {
        self.history(item)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::ItemNotFound(item.to_string()))
    }
}
