//! Normalize code coverage data between Go cover profiles, LCOV tracefiles
//! and Codecov JSON.
//!
//! ```
//! use covconv::formats::{self, Format};
//!
//! let lcov = "SF:a.go\nDA:1,5\nDA:2,5\nDA:3,5\nend_of_record\n";
//! let profiles = formats::import(Format::Lcov, lcov.as_bytes())?;
//! assert_eq!(profiles.to_string(), "a.go\n  1-3:5\n");
//!
//! let mut json = Vec::new();
//! formats::export(&profiles, Format::from_filename("out.json")?, &mut json)?;
//! # Ok::<(), covconv::Error>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod errors;
pub mod formats;

// Re-export commonly used types
pub use crate::coverage::{LineCounts, Profiles, Run};
pub use crate::errors::{Error, Result};
pub use crate::formats::{export, import, Exporter, Format, ImportOptions, Importer};
