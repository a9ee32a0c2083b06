use tracing::info;

use revlens_decompose::Decomposer;
use revlens_store::{RevisionInfo, RevisionStore};
use revlens_types::DecompositionResult;

use crate::comparison::ComparisonView;
use crate::config::RevlensConfig;
use crate::error::{SdkError, SdkResult};

/// Two stored revisions and their comparison.
#[derive(Clone, Debug)]
pub struct RevisionComparison {
    pub left: RevisionInfo,
    pub right: RevisionInfo,
    pub view: ComparisonView,
}

impl RevisionComparison {
    /// Column headers, e.g. `"Old - Rev 3 (user: admin, time: ...)"`.
    pub fn side_labels(&self) -> (String, String) {
        (self.left.side_label("Old"), self.right.side_label("New"))
    }
}

/// High-level revlens API.
///
/// Owns its store and configuration; nothing is shared through globals.
pub struct Revlens<S: RevisionStore> {
    store: S,
    config: RevlensConfig,
    decomposer: Decomposer,
}

impl<S: RevisionStore> Revlens<S> {
    pub fn new(store: S, config: RevlensConfig) -> Self {
        let decomposer = Decomposer::new(config.decompose.clone());
        Self {
            store,
            config,
            decomposer,
        }
    }

    pub fn config(&self) -> &RevlensConfig {
        &self.config
    }

    // ---- Text operations ----

    /// Decompose one document.
    pub fn decompose(&self, text: &str) -> SdkResult<DecompositionResult> {
        Ok(self.decomposer.decompose(text)?)
    }

    /// Compare two document texts.
    pub fn compare_texts(&self, old: &str, new: &str) -> ComparisonView {
        ComparisonView::build(
            &self.decomposer,
            self.config.display.highlight_policy(),
            old,
            new,
        )
    }

    // ---- Store operations ----

    /// Revisions of `item`, newest first.
    pub fn history(&self, item: &str) -> SdkResult<Vec<RevisionInfo>> {
        Ok(self.store.history(item)?)
    }

    /// Compare two stored revisions of `item`.
    pub fn compare_revisions(
        &self,
        item: &str,
        left_id: &str,
        right_id: &str,
    ) -> SdkResult<RevisionComparison> {
        let left = self.store.revision(item, left_id)?;
        let right = self.store.revision(item, right_id)?;
        let old = self.store.content(item, left_id)?;
        let new = self.store.content(item, right_id)?;
        info!(
            item,
            left = %left.short_label(),
            right = %right.short_label(),
            "comparing revisions"
        );

        Ok(RevisionComparison {
            view: self.compare_texts(&old, &new),
            left,
            right,
        })
    }

    /// Compare a stored revision with the one saved just before it.
    pub fn compare_with_previous(
        &self,
        item: &str,
        revision_id: &str,
    ) -> SdkResult<RevisionComparison> {
        let history = self.store.history(item)?;
        let position = history
            .iter()
            .position(|r| r.id == revision_id)
            .ok_or_else(|| revlens_store::StoreError::RevisionNotFound {
                item: item.to_string(),
                revision: revision_id.to_string(),
            })?;
        let previous = history
            .get(position + 1)
            .ok_or_else(|| SdkError::NoPreviousRevision {
                item: item.to_string(),
                revision: revision_id.to_string(),
            })?;
        self.compare_revisions(item, &previous.id, revision_id)
    }

    /// Compare the newest revision of `item` with the one before it.
    pub fn compare_latest(&self, item: &str) -> SdkResult<RevisionComparison> {
        let latest = self.store.latest(item)?;
        self.compare_with_previous(item, &latest.id)
    }
}

impl<S: RevisionStore + std::fmt::Debug> std::fmt::Debug for Revlens<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Revlens")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use revlens_decompose::Granularity;
    use revlens_store::{DirRevisionStore, InMemoryRevisionStore, StoreError};
    use revlens_types::{ChangeType, Path};

    const REV1: &str = r#"<channel><name>Orders</name><revision>1</revision>
        <sourceConnector><properties><script>return;</script></properties>
          <transformer><elements>
            <com.x.JavaScriptStep><name>stamp</name><script>a();</script></com.x.JavaScriptStep>
          </elements></transformer>
        </sourceConnector></channel>"#;

    const REV2: &str = r#"<channel><name>Orders</name><revision>2</revision>
        <sourceConnector><properties><script>return;</script></properties>
          <transformer><elements>
            <com.x.JavaScriptStep><name>stamp</name><script>b();</script></com.x.JavaScriptStep>
          </elements></transformer>
        </sourceConnector></channel>"#;

    fn info(id: &str, revision: u32) -> RevisionInfo {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 10, revision, 0).unwrap();
        RevisionInfo::new(id, revision, time).with_committer("admin")
    }

    fn memory_store() -> InMemoryRevisionStore {
        let store = InMemoryRevisionStore::new();
        store.record("orders", info("1", 1), REV1).unwrap();
        store.record("orders", info("2", 2), REV2).unwrap();
        store
    }

    #[test]
    fn compare_stored_revisions() {
        let revlens = Revlens::new(memory_store(), RevlensConfig::default());
        let cmp = revlens.compare_revisions("orders", "1", "2").unwrap();

        let (left, right) = cmp.side_labels();
        assert!(left.starts_with("Old - Rev 1 (user: admin"));
        assert!(right.starts_with("New - Rev 2"));

        let c = cmp.view.as_decomposed().unwrap();
        let step = Path::new(["Source Connector", "Transformer", "Step 0"]);
        assert_eq!(c.status(&step), ChangeType::Modified);
        assert_eq!(c.status(&Path::new(["Source Connector", "Script"])), ChangeType::Unchanged);
        assert_eq!(c.label(&step), "Step 0: stamp");
    }

    #[test]
    fn compare_with_previous_revision() {
        let revlens = Revlens::new(memory_store(), RevlensConfig::default());
        let cmp = revlens.compare_with_previous("orders", "2").unwrap();
        assert_eq!(cmp.left.id, "1");
        assert_eq!(cmp.right.id, "2");

        assert!(matches!(
            revlens.compare_with_previous("orders", "1"),
            Err(SdkError::NoPreviousRevision { .. })
        ));
        assert!(matches!(
            revlens.compare_with_previous("orders", "9"),
            Err(SdkError::Store(StoreError::RevisionNotFound { .. }))
        ));
    }

    #[test]
    fn compare_latest_uses_newest_two() {
        let store = memory_store();
        store.record("orders", info("3", 3), REV1).unwrap();
        let revlens = Revlens::new(store, RevlensConfig::default());

        let cmp = revlens.compare_latest("orders").unwrap();
        assert_eq!(cmp.left.id, "2");
        assert_eq!(cmp.right.id, "3");
        let c = cmp.view.as_decomposed().unwrap();
        let step = Path::new(["Source Connector", "Transformer", "Step 0"]);
        assert_eq!(c.status(&step), ChangeType::Modified);

        let single = InMemoryRevisionStore::new();
        single.record("orders", info("1", 1), REV1).unwrap();
        let revlens = Revlens::new(single, RevlensConfig::default());
        assert!(matches!(
            revlens.compare_latest("orders"),
            Err(SdkError::NoPreviousRevision { .. })
        ));
        assert!(matches!(
            revlens.compare_latest("missing"),
            Err(SdkError::Store(StoreError::ItemNotFound(_)))
        ));
    }

    #[test]
    fn unknown_item_is_a_store_error() {
        let revlens = Revlens::new(InMemoryRevisionStore::new(), RevlensConfig::default());
        assert!(matches!(
            revlens.compare_revisions("missing", "1", "2"),
            Err(SdkError::Store(StoreError::ItemNotFound(_)))
        ));
        assert!(revlens.history("missing").is_err());
    }

    #[test]
    fn configured_granularity_is_used() {
        let mut config = RevlensConfig::default();
        config.decompose.granularity = Granularity::Block;
        let revlens = Revlens::new(memory_store(), config);

        let result = revlens.decompose(REV1).unwrap();
        assert!(result.contains_key(&Path::new(["Source Connector", "Transformer"])));
        assert!(revlens.decompose("<broken").is_err());
    }

    #[test]
    fn directory_store_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirRevisionStore::open(tmp.path()).unwrap();
        store.record("orders", &info("1", 1), REV1).unwrap();
        store.record("orders", &info("2", 2), "<channel><unclosed></channel>").unwrap();

        let revlens = Revlens::new(store, RevlensConfig::default());
        assert_eq!(revlens.history("orders").unwrap().len(), 2);
        let cmp = revlens.compare_revisions("orders", "1", "2").unwrap();
        assert!(cmp.view.is_raw());
    }
}
