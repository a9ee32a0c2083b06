use std::fmt;

use serde::{Deserialize, Serialize};

/// Change classification of a component or group between two revisions.
///
/// "Left" is the older revision, "right" the newer one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    #[default]
    Unchanged,
    Modified,
    /// Present only in the older revision (removed).
    LeftOnly,
    /// Present only in the newer revision (added).
    RightOnly,
}

impl ChangeType {
    /// Classify a key from its content on each side.
    pub fn classify(old: Option<&str>, new: Option<&str>) -> Self {
        match (old, new) {
            (None, None) => Self::Unchanged,
            (None, Some(_)) => Self::RightOnly,
            (Some(_), None) => Self::LeftOnly,
            (Some(a), Some(b)) if a != b => Self::Modified,
            (Some(_), Some(_)) => Self::Unchanged,
        }
    }

    /// Returns `true` for anything but `Unchanged`.
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// The classification seen when old and new are swapped.
    pub fn inverse(&self) -> Self {
        match self {
            Self::LeftOnly => Self::RightOnly,
            Self::RightOnly => Self::LeftOnly,
            other => *other,
        }
    }

    /// Short suffix used next to tree labels.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged => "",
            Self::Modified => " (changed)",
            Self::LeftOnly => " (removed)",
            Self::RightOnly => " (added)",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchanged => "unchanged",
            Self::Modified => "modified",
            Self::LeftOnly => "removed",
            Self::RightOnly => "added",
        };
        f.write_str(s)
    }
}
