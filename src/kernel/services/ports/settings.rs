use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::DEFAULT_ROOT_PREFIX;

pub const DEFAULT_LISTING_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extensions (without the dot) the explorer is allowed to open.
    pub openable_extensions: Vec<String>,
    /// Start with a pinned sidebar holding the explorer and history tabs.
    pub sidebar: bool,
    /// Prefix of the first history node of every opened file.
    pub root_prefix: String,
    /// Levels below the opened folder the explorer lists.
    pub listing_depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openable_extensions: vec!["bmp".to_string()],
            sidebar: true,
            root_prefix: DEFAULT_ROOT_PREFIX.to_string(),
            listing_depth: DEFAULT_LISTING_DEPTH,
            log_filter: None,
        }
    }
}

impl Settings {
    pub fn can_open(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.openable_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
