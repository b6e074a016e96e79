//! Rendered option layouts

use super::tree::NodeId;
use serde::{Deserialize, Serialize};

/// Separates the render stamp from the locale in option identifiers
pub const UNIQUE_PREFIX: &str = "_node_";

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    /// Identifier the platform echoes back in the callback
    #[serde(rename = "callback_data")]
    pub unique: String,
}

/// The options of one screen, one button per row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    #[serde(rename = "inline_keyboard")]
    pub rows: Vec<Vec<Button>>,
}

impl Markup {
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Identifier of the option leading to `child`, as rendered at `stamp`
pub fn button_id(stamp: i64, locale: &str, child: NodeId) -> String {
    format!("{stamp}{UNIQUE_PREFIX}{locale}{child}")
}
