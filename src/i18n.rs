//! Label catalogs
//!
//! One flat JSON object per locale, keyed by locale path:
//!
//! ```json
//! { "menu/settings": "Settings", "menu/settings/language": "Language" }
//! ```

use crate::platform::Translator;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// In-memory labels for every locale
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    labels: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        path: impl Into<String>,
        label: impl Into<String>,
    ) -> &mut Self {
        self.labels
            .entry(locale.into())
            .or_default()
            .insert(path.into(), label.into());
        self
    }

    /// Load every `<locale>.json` file in `dir`
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let io_error = |source| CatalogError::Io {
            path: dir.display().to_string(),
            source,
        };
        let mut catalog = Self::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let labels: HashMap<String, String> =
                serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            tracing::debug!(locale, labels = labels.len(), "Loaded catalog");
            catalog.labels.insert(locale.to_string(), labels);
        }
        Ok(catalog)
    }

    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<_> = self.labels.keys().cloned().collect();
        locales.sort();
        locales
    }
}

impl Translator for Catalog {
    fn translate(&self, locale: &str, path: &str) -> String {
        match self.labels.get(locale).and_then(|labels| labels.get(path)) {
            Some(label) => label.clone(),
            None => {
                tracing::warn!(locale, path, "Missing label");
                path.to_string()
            }
        }
    }
}
