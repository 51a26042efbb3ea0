//! Engine configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::render::i18n::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub default_locale: Locale,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Free templates append the "created with" footer.
    #[serde(default = "default_true")]
    pub marketing_footer: bool,
    /// Refuse to return HTML that lacks the engine signature.
    #[serde(default = "default_true")]
    pub enforce_signature: bool,
}

fn default_true() -> bool { true }

fn default_currency() -> String { "HUF".to_string() }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            default_currency: default_currency(),
            marketing_footer: true,
            enforce_signature: true,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
