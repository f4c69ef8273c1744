//! Converter configuration, read from `.covconv.toml`.
//!
//! ```toml
//! trim_prefix = "github.com/org/repo/"
//!
//! [limits]
//! max_line_index = 10000000
//! lcov_max_line_index = 1000000
//! ```
//!
//! Every field is optional; command-line flags take precedence over the file.

mod loader;

pub use loader::{load_config, load_config_from_path, parse_config, CONFIG_FILE_NAME};

use crate::coverage::LineCounts;
use crate::formats::{ImportOptions, Lcov};
use serde::{Deserialize, Serialize};

/// Root configuration structure for covconv
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Prefix stripped from every filename before export
    #[serde(default)]
    pub trim_prefix: Option<String>,

    /// Line-index safety limits
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Line-index ceilings guarding against corrupt input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Highest line index any file may carry; larger indices fail the import
    #[serde(default = "default_max_line_index")]
    pub max_line_index: usize,

    /// LCOV data lines above this index are dropped
    #[serde(default = "default_lcov_max_line_index")]
    pub lcov_max_line_index: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_index: default_max_line_index(),
            lcov_max_line_index: default_lcov_max_line_index(),
        }
    }
}

fn default_max_line_index() -> usize {
    LineCounts::MAX_LINE_INDEX
}

fn default_lcov_max_line_index() -> usize {
    Lcov::MAX_DATA_LINE
}

impl ConvertConfig {
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            max_line_index: self.limits.max_line_index,
            lcov_max_line_index: self.limits.lcov_max_line_index,
        }
    }
}
