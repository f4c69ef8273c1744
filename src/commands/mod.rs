//! Command implementations behind the `covconv` binary.
//!
//! Available commands:
//! - **convert**: Merge coverage files and write them in another format

pub mod convert;

pub use convert::{convert, ConvertOptions};
