//! In-memory coverage model shared by every format.
//!
//! - [`LineCounts`] - sparse hit counts for one file
//! - [`Profiles`] - a sorted collection of `LineCounts` keyed by filename

pub mod line_counts;
pub mod profiles;

pub use line_counts::{LineCounts, Run};
pub use profiles::Profiles;
