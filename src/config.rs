//! Configuration file support.
//!
//! A configuration is a JSON object with an `extract` and a `render` section.
//! Every field is optional:
//!
//! ```json
//! {
//!   "extract": { "accepted_subtypes": ["Highlight", "Text"], "pages": "2-10" },
//!   "render": {
//!     "layout": "notes",
//!     "include_low": false,
//!     "classifier": { "colors": { "level2": "#FFFF00" }, "hue_tolerance_pct": 5 }
//!   }
//! }
//! ```
//!
//! Problems are reported when the file is loaded, never during rendering.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::ExtractOptions;
use crate::render::RenderOptions;

/// Extraction and rendering settings loaded together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub extract: ExtractOptions,
    pub render: RenderOptions,
}

impl NotesConfig {
    /// Parse and validate a configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: NotesConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.render.validate()
    }
}
