use std::fmt;

use serde::{Deserialize, Serialize};

/// Hierarchical key of a component or group.
///
/// A `Path` is an ordered list of segments. Group membership is decided by
/// segment-wise prefix comparison, so `Destination [1]` is never mistaken for
/// a parent of `Destination [10]`. The empty path is the root group.
///
/// The `/`-joined form produced by [`Display`](fmt::Display) is for
/// presentation only and is never parsed back.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The root path (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new path with `segment` appended.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The containing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The final segment, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segment-wise prefix test. Every path starts with the root and with itself.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// A copy whose final segment has `suffix` appended.
    ///
    /// The root has no final segment and is returned unchanged.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.push_str(suffix);
        }
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", self.segments)
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent() {
        let root = Path::root();
        assert!(root.is_root());
        assert_eq!(root.parent(), None);
        assert_eq!(root.last(), None);
        assert_eq!(root.to_string(), "");
    }

    #[test]
    fn join_and_parent_are_inverse() {
        let group = Path::new(["Destination [1]", "Transformer"]);
        let step = group.join("Step 0");
        assert_eq!(step.len(), 3);
        assert_eq!(step.parent(), Some(group));
        assert_eq!(step.last(), Some("Step 0"));
    }

    #[test]
    fn prefix_is_segment_wise() {
        let ten = Path::new(["Destination [10]", "Script"]);
        let one = Path::new(["Destination [1]"]);
        assert!(!ten.starts_with(&one));

        // A literal text prefix must not count either.
        let dest = Path::new(["Dest"]);
        let dest_a = Path::new(["Dest A", "Configuration"]);
        assert!(!dest_a.starts_with(&dest));
        assert!(dest_a.starts_with(&Path::new(["Dest A"])));
    }

    #[test]
    fn every_path_starts_with_root_and_itself() {
        let p = Path::new(["a", "b"]);
        assert!(p.starts_with(&Path::root()));
        assert!(p.starts_with(&p));
    }

    #[test]
    fn display_joins_segments() {
        let p = Path::new(["Channel Scripts", "Deploy Script"]);
        assert_eq!(p.to_string(), "Channel Scripts/Deploy Script");
    }

    #[test]
    fn segments_containing_slash_stay_distinct() {
        let a = Path::new(["a/b"]);
        let b = Path::new(["a", "b"]);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn with_suffix_touches_only_last_segment() {
        let p = Path::new(["Source Connector", "Plugin: Props"]);
        assert_eq!(
            p.with_suffix(" (2)"),
            Path::new(["Source Connector", "Plugin: Props (2)"])
        );
        assert_eq!(Path::root().with_suffix(" (2)"), Path::root());
    }

    #[test]
    fn serializes_as_segment_array() {
        let p = Path::new(["a", "b"]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
