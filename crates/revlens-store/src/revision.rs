use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of one stored revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionInfo {
    /// Storage id of the revision.
    pub id: String,
    /// Revision number recorded in the document itself.
    pub revision: u32,
    /// Who saved the revision, if known.
    pub committer: Option<String>,
    /// When the revision was saved.
    pub time: DateTime<Utc>,
    /// Free-form note attached to the revision.
    pub message: Option<String>,
}

impl RevisionInfo {
    pub fn new(id: impl Into<String>, revision: u32, time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            revision,
            committer: None,
            time,
            message: None,
        }
    }

    pub fn with_committer(mut self, committer: impl Into<String>) -> Self {
        self.committer = Some(committer.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Compact label: `"Rev N"` for numeric ids, otherwise the first eight
    /// characters of the id.
    pub fn short_label(&self) -> String {
        if !self.id.is_empty() && self.id.chars().all(|c| c.is_ascii_digit()) {
            return format!("Rev {}", self.revision);
        }
        self.id.chars().take(8).collect()
    }

    /// Column header for one side of a comparison, e.g.
    /// `"Old - Rev 3 (user: admin, time: 2024-05-01 10:00:00)"`.
    pub fn side_label(&self, side: &str) -> String {
        format!(
            "{side} - {} (user: {}, time: {})",
            self.short_label(),
            self.committer.as_deref().unwrap_or("unknown"),
            self.time.format("%Y-%m-%d %H:%M:%S"),
        )
    }

    /// How long ago the revision was saved, relative to `now`.
    ///
    /// Under a minute reads `"N seconds ago"`, under an hour `"N minutes
    /// ago"`. Older revisions, and revisions stamped in the future, show the
    /// absolute time.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.time);
        if elapsed.num_milliseconds() < 0 || elapsed.num_minutes() >= 60 {
            return self.time.format("%Y-%m-%d %H:%M:%S").to_string();
        }
        match elapsed.num_minutes() {
            0 => format!("{} seconds ago", elapsed.num_seconds()),
            minutes => format!("{minutes} minutes ago"),
        }
    }
}
