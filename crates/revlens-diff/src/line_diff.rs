//! Line-level diff: minimal edit script between two texts.
//!
//! Uses the `similar` crate (Myers diff algorithm). Adjacent delete and
//! insert runs are reported as a single [`DeltaKind::Replace`].

use std::ops::Range;

use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// Split text into lines on `\n`.
///
/// The empty string has no lines. A trailing newline yields a trailing empty
/// line, so `"a\n"` and `"a"` compare as different.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Kind of a contiguous run in an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeltaKind {
    Equal,
    Insert,
    Delete,
    Replace,
}

impl From<DiffTag> for DeltaKind {
    fn from(tag: DiffTag) -> Self {
        match tag {
            DiffTag::Equal => Self::Equal,
            DiffTag::Insert => Self::Insert,
            DiffTag::Delete => Self::Delete,
            DiffTag::Replace => Self::Replace,
        }
    }
}

/// One run of the edit script, as line index ranges into each side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub kind: DeltaKind,
    pub old_range: Range<usize>,
    pub new_range: Range<usize>,
}

impl Delta {
    /// Number of old lines covered.
    pub fn old_len(&self) -> usize {
        self.old_range.len()
    }

    /// Number of new lines covered.
    pub fn new_len(&self) -> usize {
        self.new_range.len()
    }
}

/// The result of diffing two texts line by line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    /// Runs covering both sides completely, in order.
    pub deltas: Vec<Delta>,
    /// Total number of lines in the old text.
    pub old_lines: usize,
    /// Total number of lines in the new text.
    pub new_lines: usize,
}

impl LineDiff {
    /// Returns `true` if the two texts are identical.
    pub fn is_identical(&self) -> bool {
        self.deltas.iter().all(|d| d.kind == DeltaKind::Equal)
    }

    /// The non-equal runs.
    pub fn changes(&self) -> impl Iterator<Item = &Delta> {
        self.deltas.iter().filter(|d| d.kind != DeltaKind::Equal)
    }

    /// Total number of new lines in insert and replace runs.
    pub fn additions(&self) -> usize {
        self.changes().map(Delta::new_len).sum()
    }

    /// Total number of old lines in delete and replace runs.
    pub fn deletions(&self) -> usize {
        self.changes().map(Delta::old_len).sum()
    }
}

/// Compute a minimal line-level edit script from `old` to `new`.
pub fn diff_lines(old: &str, new: &str) -> LineDiff {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let deltas = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines)
        .iter()
        .map(|op| {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            Delta {
                kind: tag.into(),
                old_range,
                new_range,
            }
        })
        .collect();

    LineDiff {
        deltas,
        old_lines: old_lines.len(),
        new_lines: new_lines.len(),
    }
}
