//! Rendering-context configuration for chatkit.
//!
//! Parses `chatkit.toml` files with serde. Each UI surface that displays
//! formatted messages (message list, tooltip, notification toast, ...) is a
//! named *rendering context* with its own supported-tag list:
//!
//! ```toml
//! [formatting]
//! code_font = "Consolas"
//!
//! [formatting.contexts.message_list]
//! supported_tags = ["b", "i", "s", "a", "ul", "li", "color"]
//!
//! [formatting.contexts.toast]
//! plain_text = true
//! ```
//!
//! Contexts with `plain_text = true` cannot render markup at all; callers
//! route those through the plain-text reducer instead of the rich-text
//! formatter.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "chatkit.toml";

/// Default code font when the config does not name one.
const DEFAULT_CODE_FONT: &str = "Consolas";

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Message formatting configuration.
    pub formatting: FormattingConfig,
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Look up a rendering context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&ContextConfig> {
        self.formatting.contexts.get(name)
    }
}

/// Message formatting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Font applied to fenced/inline code spans. Blank disables font
    /// wrapping even where a `font` tag would be supported.
    pub code_font: String,
    /// Rendering contexts by name.
    pub contexts: BTreeMap<String, ContextConfig>,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            code_font: DEFAULT_CODE_FONT.to_owned(),
            contexts: BTreeMap::new(),
        }
    }
}

/// One rendering context: a UI surface with its own markup capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct ContextConfig {
    /// Output tags this context may receive. Empty strips everything.
    pub supported_tags: Vec<String>,
    /// Context cannot render markup at all; use the plain-text reducer.
    pub plain_text: bool,
    /// Per-context override of the code font.
    pub code_font: Option<String>,
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML or has the wrong shape.
    #[error("invalid config file")]
    Parse(#[from] toml::de::Error),
}
