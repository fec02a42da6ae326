//! Builder configuration loaded from JSON.

use crate::error::{Result, WoqlError};
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Settings applied to every builder created from them.
///
/// ```text
/// {"vocabulary": {"Person": "@schema:Person"}, "inherit_defaults": true}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoqlConfig {
    /// Extra short-name to IRI entries, applied over the defaults.
    #[serde(default)]
    pub vocabulary: BTreeMap<String, String>,

    /// Seed the vocabulary with the built-in table.
    #[serde(default = "default_true")]
    pub inherit_defaults: bool,

    /// Run `path` predicate names through the vocabulary.
    #[serde(default = "default_true")]
    pub expand_path_predicates: bool,
}

impl Default for WoqlConfig {
    fn default() -> Self {
        WoqlConfig {
            vocabulary: BTreeMap::new(),
            inherit_defaults: true,
            expand_path_predicates: true,
        }
    }
}

impl WoqlConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| WoqlError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| WoqlError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            entries = config.vocabulary.len(),
            "loaded builder configuration"
        );
        Ok(config)
    }

    /// The vocabulary a builder created from this configuration owns.
    pub fn vocabulary(&self) -> Vocabulary {
        let mut vocab = if self.inherit_defaults {
            Vocabulary::default()
        } else {
            Vocabulary::empty()
        };
        vocab.extend(self.vocabulary.clone());
        vocab
    }
}
