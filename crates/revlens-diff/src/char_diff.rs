//! Character-level diff of one changed line pair.

use std::ops::Range;

use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// Per-character highlight flags for a line pair, indexed by `char` offset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InlineHighlights {
    pub old: Vec<bool>,
    pub new: Vec<bool>,
}

impl InlineHighlights {
    /// Highlighted runs of the old line as `char` ranges.
    pub fn old_spans(&self) -> Vec<Range<usize>> {
        spans(&self.old)
    }

    /// Highlighted runs of the new line as `char` ranges.
    pub fn new_spans(&self) -> Vec<Range<usize>> {
        spans(&self.new)
    }
}

/// Mark the characters of `old` and `new` that are not part of a minimal
/// common subsequence.
pub fn diff_chars(old: &str, new: &str) -> InlineHighlights {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let mut highlights = InlineHighlights {
        old: vec![false; a.len()],
        new: vec![false; b.len()],
    };

    for op in capture_diff_slices(Algorithm::Myers, &a, &b) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            continue;
        }
        highlights.old[old_range].fill(true);
        highlights.new[new_range].fill(true);
    }
    highlights
}

/// Collapse per-character flags into contiguous ranges.
pub fn spans(flags: &[bool]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, &flag) in flags.iter().enumerate() {
        match (flag, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(s..flags.len());
    }
    out
}
