//! Menu configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration of a menu instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Locale path of the root node; every other path extends it
    pub base_path: String,
    /// Locale used when a user has no session yet
    pub default_locale: String,
    /// Locales rendered by `render_all`
    pub locales: Vec<String>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            base_path: "menu".to_string(),
            default_locale: "en".to_string(),
            locales: vec!["en".to_string()],
        }
    }
}

impl MenuConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let default_locale = var("MENU_DEFAULT_LOCALE").unwrap_or(defaults.default_locale);
        let mut locales: Vec<String> = var("MENU_LOCALES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|locale| !locale.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if !locales.contains(&default_locale) {
            locales.insert(0, default_locale.clone());
        }

        Self {
            base_path: var("MENU_BASE_PATH").unwrap_or(defaults.base_path),
            default_locale,
            locales,
        }
    }

    /// Directory of `<locale>.json` label catalogs, if configured
    pub fn catalog_dir() -> Option<PathBuf> {
        std::env::var("MENU_CATALOG_DIR").ok().map(PathBuf::from)
    }
}
