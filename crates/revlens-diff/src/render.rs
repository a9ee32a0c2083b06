//! Side-by-side render model for one component pair.
//!
//! Rows pair an old line with a new line. Lines that only exist on one side
//! are paired with padding so both columns stay aligned.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::char_diff::diff_chars;
use crate::line_diff::{diff_lines, split_lines, DeltaKind};

/// Whether changed line pairs get character-level highlights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightPolicy {
    #[default]
    Intraline,
    LineOnly,
}

/// Presentation of one rendered line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LineStyle {
    Unchanged,
    Deleted,
    Inserted,
    /// Old half of a changed line pair.
    ChangedOld,
    /// New half of a changed line pair.
    ChangedNew,
    /// Filler opposite a line that has no counterpart.
    Padding,
}

/// One cell of a side-by-side row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    /// 1-based line number; `None` on padding.
    pub number: Option<usize>,
    pub text: String,
    pub style: LineStyle,
    /// Highlighted `char` ranges of `text`.
    pub highlights: Vec<Range<usize>>,
}

impl RenderedLine {
    fn line(index: usize, text: &str, style: LineStyle) -> Self {
        Self {
            number: Some(index + 1),
            text: text.to_string(),
            style,
            highlights: Vec::new(),
        }
    }

    fn padding() -> Self {
        Self {
            number: None,
            text: String::new(),
            style: LineStyle::Padding,
            highlights: Vec::new(),
        }
    }

    /// Returns `true` for filler cells.
    pub fn is_padding(&self) -> bool {
        self.style == LineStyle::Padding
    }
}

/// An aligned pair of cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Row {
    pub left: RenderedLine,
    pub right: RenderedLine,
}

impl Row {
    /// Returns `true` unless both sides are unchanged.
    pub fn is_changed(&self) -> bool {
        self.left.style != LineStyle::Unchanged || self.right.style != LineStyle::Unchanged
    }
}

/// Aligned two-column view of an old and a new text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SideBySide {
    pub rows: Vec<Row>,
}

impl SideBySide {
    /// Returns `true` if no row carries a change.
    pub fn is_identical(&self) -> bool {
        !self.rows.iter().any(Row::is_changed)
    }

    /// Left column cells.
    pub fn left(&self) -> impl Iterator<Item = &RenderedLine> {
        self.rows.iter().map(|r| &r.left)
    }

    /// Right column cells.
    pub fn right(&self) -> impl Iterator<Item = &RenderedLine> {
        self.rows.iter().map(|r| &r.right)
    }

    /// Number of rows that carry a change.
    pub fn changed_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_changed()).count()
    }
}

/// Render `old` and `new` as aligned columns.
///
/// Equal runs are plain on both sides. Deleted and inserted lines face
/// padding. In a replaced run, lines at the same offset are paired as a
/// changed pair and any extra lines on the longer side face padding.
pub fn render_side_by_side(old: &str, new: &str, policy: HighlightPolicy) -> SideBySide {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let mut rows = Vec::new();

    for delta in diff_lines(old, new).deltas {
        match delta.kind {
            DeltaKind::Equal => {
                for (o, n) in delta.old_range.zip(delta.new_range) {
                    rows.push(Row {
                        left: RenderedLine::line(o, old_lines[o], LineStyle::Unchanged),
                        right: RenderedLine::line(n, new_lines[n], LineStyle::Unchanged),
                    });
                }
            }
            DeltaKind::Delete => {
                for o in delta.old_range {
                    rows.push(Row {
                        left: RenderedLine::line(o, old_lines[o], LineStyle::Deleted),
                        right: RenderedLine::padding(),
                    });
                }
            }
            DeltaKind::Insert => {
                for n in delta.new_range {
                    rows.push(Row {
                        left: RenderedLine::padding(),
                        right: RenderedLine::line(n, new_lines[n], LineStyle::Inserted),
                    });
                }
            }
            DeltaKind::Replace => {
                let paired = delta.old_range.len().min(delta.new_range.len());
                for offset in 0..delta.old_range.len().max(delta.new_range.len()) {
                    let o = delta.old_range.start + offset;
                    let n = delta.new_range.start + offset;
                    let row = if offset < paired {
                        changed_pair(o, old_lines[o], n, new_lines[n], policy)
                    } else if offset < delta.old_range.len() {
                        Row {
                            left: RenderedLine::line(o, old_lines[o], LineStyle::Deleted),
                            right: RenderedLine::padding(),
                        }
                    } else {
                        Row {
                            left: RenderedLine::padding(),
                            right: RenderedLine::line(n, new_lines[n], LineStyle::Inserted),
                        }
                    };
                    rows.push(row);
                }
            }
        }
    }

    SideBySide { rows }
}

fn changed_pair(o: usize, old: &str, n: usize, new: &str, policy: HighlightPolicy) -> Row {
    let mut left = RenderedLine::line(o, old, LineStyle::ChangedOld);
    let mut right = RenderedLine::line(n, new, LineStyle::ChangedNew);
    if policy == HighlightPolicy::Intraline {
        let highlights = diff_chars(old, new);
        left.highlights = highlights.old_spans();
        right.highlights = highlights.new_spans();
    }
    Row { left, right }
}
