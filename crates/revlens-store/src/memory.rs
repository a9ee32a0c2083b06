use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::names::validate_name;
use crate::revision::RevisionInfo;
use crate::traits::RevisionStore;

#[derive(Clone)]
struct StoredRevision {
    info: RevisionInfo,
    content: String,
}

/// In-memory, HashMap-based revision store.
///
/// Intended for tests and embedding. Revisions are held behind a `RwLock`
/// for safe concurrent access and cloned on read.
pub struct InMemoryRevisionStore {
    items: RwLock<HashMap<String, Vec<StoredRevision>>>,
}

impl InMemoryRevisionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Save a revision of `item`.
    ///
    /// A revision with the same id replaces the earlier one.
    pub fn record(
        &self,
        item: &str,
        info: RevisionInfo,
        content: impl Into<String>,
    ) -> StoreResult<()> {
        validate_name(item)?;
        validate_name(&info.id)?;
        debug!(item, id = %info.id, revision = info.revision, "recording revision");

        let mut map = self.items.write().expect("lock poisoned");
        let revisions = map.entry(item.to_string()).or_default();
        revisions.retain(|r| r.info.id != info.id);
        revisions.push(StoredRevision {
            info,
            content: content.into(),
        });
        Ok(())
    }

    /// Total number of stored revisions across all items.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .expect("lock poisoned")
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRevisionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RevisionStore for InMemoryRevisionStore {
    fn history(&self, item: &str) -> StoreResult<Vec<RevisionInfo>> {
        let map = self.items.read().expect("lock poisoned");
        let revisions = map
            .get(item)
            .ok_or_else(|| StoreError::ItemNotFound(item.to_string()))?;
        let mut history: Vec<RevisionInfo> = revisions.iter().map(|r| r.info.clone()).collect();
        sort_newest_first(&mut history);
        Ok(history)
    }

    fn content(&self, item: &str, revision_id: &str) -> StoreResult<String> {
        let map = self.items.read().expect("lock poisoned");
        let revisions = map
            .get(item)
            .ok_or_else(|| StoreError::ItemNotFound(item.to_string()))?;
        revisions
            .iter()
            .find(|r| r.info.id == revision_id)
            .map(|r| r.content.clone())
            .ok_or_else(|| StoreError::RevisionNotFound {
                item: item.to_string(),
                revision: revision_id.to_string(),
            })
    }

    fn items(&self) -> StoreResult<Vec<String>> {
        let map = self.items.read().expect("lock poisoned");
        let mut items: Vec<String> = map.keys().cloned().collect();
        items.sort();
        Ok(items)
    }
}

impl std::fmt::Debug for InMemoryRevisionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRevisionStore")
            .field("revision_count", &self.len())
            .finish()
    }
}

/// Newest first: higher revision number, then later time.
pub(crate) fn sort_newest_first(history: &mut [RevisionInfo]) {
    history.sort_by(|a, b| b.revision.cmp(&a.revision).then(b.time.cmp(&a.time)));
}
