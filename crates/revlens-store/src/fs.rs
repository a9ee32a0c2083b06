//! Directory-backed revision store.
//!
//! Layout:
//!
//! ```text
//! <root>/<item>/<id>.xml    document text of one revision
//! <root>/<item>/<id>.toml   optional metadata sidecar
//! ```
//!
//! Without a sidecar the revision number is parsed from a numeric id (else
//! `0`) and the time is the document's modification time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::memory::sort_newest_first;
use crate::names::validate_name;
use crate::revision::RevisionInfo;
use crate::traits::RevisionStore;

const CONTENT_EXT: &str = "xml";
const SIDECAR_EXT: &str = "toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sidecar {
    revision: Option<u32>,
    committer: Option<String>,
    time: Option<DateTime<Utc>>,
    message: Option<String>,
}

/// Revision store over a directory tree.
#[derive(Clone, Debug)]
pub struct DirRevisionStore {
    root: PathBuf,
}

impl DirRevisionStore {
    /// Open a store rooted at `root`. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("store root {} is not a directory", root.display()),
            )));
        }
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a revision and its metadata sidecar.
    pub fn record(&self, item: &str, info: &RevisionInfo, content: &str) -> StoreResult<()> {
        validate_name(item)?;
        validate_name(&info.id)?;
        let dir = self.root.join(item);
        fs::create_dir_all(&dir)?;

        fs::write(dir.join(format!("{}.{CONTENT_EXT}", info.id)), content)?;

        let sidecar_path = dir.join(format!("{}.{SIDECAR_EXT}", info.id));
        let sidecar = Sidecar {
            revision: Some(info.revision),
            committer: info.committer.clone(),
            time: Some(info.time),
            message: info.message.clone(),
        };
        let text = toml::to_string_pretty(&sidecar).map_err(|e| StoreError::Metadata {
            path: sidecar_path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&sidecar_path, text)?;

        debug!(item, id = %info.id, dir = %dir.display(), "wrote revision");
        Ok(())
    }

    fn item_dir(&self, item: &str) -> StoreResult<PathBuf> {
        validate_name(item)?;
        let dir = self.root.join(item);
        if !dir.is_dir() {
            return Err(StoreError::ItemNotFound(item.to_string()));
        }
        Ok(dir)
    }

    fn load_info(&self, dir: &Path, id: &str) -> StoreResult<RevisionInfo> {
        let content_path = dir.join(format!("{id}.{CONTENT_EXT}"));
        let sidecar_path = dir.join(format!("{id}.{SIDECAR_EXT}"));

        let sidecar = if sidecar_path.is_file() {
            let text = fs::read_to_string(&sidecar_path)?;
            toml::from_str::<Sidecar>(&text).map_err(|e| StoreError::Metadata {
                path: sidecar_path.clone(),
                reason: e.to_string(),
            })?
        } else {
            Sidecar::default()
        };

        let time = match sidecar.time {
            Some(time) => time,
            None => DateTime::<Utc>::from(fs::metadata(&content_path)?.modified()?),
        };

        Ok(RevisionInfo {
            id: id.to_string(),
            revision: sidecar
                .revision
                .unwrap_or_else(|| id.parse().unwrap_or_default()),
            committer: sidecar.committer,
            time,
            message: sidecar.message,
        })
    }
}

impl RevisionStore for DirRevisionStore {
    fn history(&self, item: &str) -> StoreResult<Vec<RevisionInfo>> {
        let dir = self.item_dir(item)?;
        let mut history = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CONTENT_EXT) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "skipping revision with non UTF-8 name");
                continue;
            };
            if validate_name(id).is_err() {
                warn!(path = %path.display(), "skipping revision with invalid id");
                continue;
            }
            history.push(self.load_info(&dir, id)?);
        }

        if history.is_empty() {
            return Err(StoreError::ItemNotFound(item.to_string()));
        }
        sort_newest_first(&mut history);
        debug!(item, revisions = history.len(), "loaded history");
        Ok(history)
    }

    fn content(&self, item: &str, revision_id: &str) -> StoreResult<String> {
        let dir = self.item_dir(item)?;
        validate_name(revision_id)?;
        let path = dir.join(format!("{revision_id}.{CONTENT_EXT}"));
        if !path.is_file() {
            return Err(StoreError::RevisionNotFound {
                item: item.to_string(),
                revision: revision_id.to_string(),
            });
        }
        Ok(fs::read_to_string(path)?)
    }

    fn items(&self) -> StoreResult<Vec<String>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_name(name).is_ok() {
                    items.push(name.to_string());
                }
            }
        }
        items.sort();
        Ok(items)
    }
}
