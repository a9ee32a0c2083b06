use std::path::Path;

use serde::{Deserialize, Serialize};

use revlens_decompose::DecomposerConfig;
use revlens_diff::HighlightPolicy;

use crate::error::{SdkError, SdkResult};

/// Top-level revlens configuration, usually loaded from `revlens.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevlensConfig {
    /// How documents are split into components.
    pub decompose: DecomposerConfig,
    /// How comparisons are presented.
    pub display: DisplayConfig,
}

/// Presentation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Highlight changed characters within changed line pairs.
    pub intraline: bool,
    /// Hide unchanged components and groups.
    pub changed_only: bool,
    /// Append `(added)`, `(removed)` or `(changed)` to tree labels.
    pub labels: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            intraline: true,
            changed_only: false,
            labels: true,
        }
    }
}

impl DisplayConfig {
    pub fn highlight_policy(&self) -> HighlightPolicy {
        if self.intraline {
            HighlightPolicy::Intraline
        } else {
            HighlightPolicy::LineOnly
        }
    }
}

impl RevlensConfig {
    /// Parse configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> SdkResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| SdkError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load configuration with fallback to default when no path is given.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> SdkResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config {
            path: "<memory>".into(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revlens_decompose::Granularity;

    #[test]
    fn defaults() {
        let config = RevlensConfig::default();
        assert!(config.display.intraline);
        assert!(config.display.labels);
        assert!(!config.display.changed_only);
        assert_eq!(config.decompose.granularity, Granularity::Step);
        assert_eq!(config.display.highlight_policy(), HighlightPolicy::Intraline);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = RevlensConfig::from_toml_str(
            r#"
            [display]
            changed_only = true
            intraline = false
            "#,
        )
        .unwrap();
        assert!(config.display.changed_only);
        assert!(config.display.labels);
        assert_eq!(config.display.highlight_policy(), HighlightPolicy::LineOnly);
        assert_eq!(config.decompose, DecomposerConfig::default());
    }

    #[test]
    fn decompose_section() {
        let config = RevlensConfig::from_toml_str(
            r#"
            [decompose]
            granularity = "block"
            "#,
        )
        .unwrap();
        assert_eq!(config.decompose.granularity, Granularity::Block);
        assert_eq!(config.decompose.channel_scripts.len(), 4);
    }

    #[test]
    fn load_from_file_and_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("revlens.toml");
        let mut config = RevlensConfig::default();
        config.display.changed_only = true;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(RevlensConfig::load(&path).unwrap(), config);
        assert_eq!(
            RevlensConfig::load_or_default(None::<&Path>).unwrap(),
            RevlensConfig::default()
        );
    }

    #[test]
    fn bad_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("revlens.toml");
        std::fs::write(&path, "[display]\nintraline = \"yes\"").unwrap();
        match RevlensConfig::load(&path) {
            Err(SdkError::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Config error, got {:?}", other),
        }
        assert!(matches!(
            RevlensConfig::load(tmp.path().join("missing.toml")),
            Err(SdkError::Io(_))
        ));
    }
}
