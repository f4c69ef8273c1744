//! Coverage for a collection of files.

use super::line_counts::LineCounts;
use crate::errors::Result;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Stores [`LineCounts`] for a collection of files, keyed by filename.
///
/// Filenames are opaque strings. Files are always listed in lexicographic
/// order, which is the order every exporter writes them in.
#[derive(Debug, Clone)]
pub struct Profiles {
    files: BTreeMap<String, LineCounts>,
    line_limit: usize,
}

impl PartialEq for Profiles {
    /// Compares files and their counts only, like [`LineCounts`] equality.
    fn eq(&self, other: &Self) -> bool {
        self.files == other.files
    }
}

impl Eq for Profiles {}

impl Default for Profiles {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiles {
    pub fn new() -> Self {
        Self::with_line_limit(LineCounts::MAX_LINE_INDEX)
    }

    /// Create an empty collection whose lazily created files accept line
    /// indices up to `line_limit`.
    pub fn with_line_limit(line_limit: usize) -> Self {
        Self {
            files: BTreeMap::new(),
            line_limit,
        }
    }

    /// Returns the LineCounts for the given file, adding the file to the
    /// collection if necessary.
    pub fn line_counts(&mut self, filename: &str) -> &mut LineCounts {
        let line_limit = self.line_limit;
        self.files
            .entry(filename.to_string())
            .or_insert_with(|| LineCounts::with_line_limit(line_limit))
    }

    /// LineCounts for `filename`, without creating it.
    pub fn get(&self, filename: &str) -> Option<&LineCounts> {
        self.files.get(filename)
    }

    /// All filenames in the collection, sorted.
    pub fn files(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    /// Iterate over `(filename, line_counts)` in filename order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, LineCounts> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Rename every file through `rename`. Files that end up with the same
    /// name are combined with [`LineCounts::merge_sum`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::LineOutOfBounds`](crate::errors::Error) when a
    /// collision would put lines above the line limit of the surviving entry.
    /// The collection is unchanged in that case.
    pub fn rename_files<F>(&mut self, mut rename: F) -> Result<()>
    where
        F: FnMut(&str) -> String,
    {
        let targets: Vec<String> = self.files.keys().map(|name| rename(name)).collect();

        let mut survivors: BTreeMap<&str, &LineCounts> = BTreeMap::new();
        for (target, counts) in targets.iter().zip(self.files.values()) {
            match survivors.entry(target.as_str()) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(counts);
                }
                btree_map::Entry::Occupied(entry) => entry.get().check_fits(counts)?,
            }
        }

        let before = std::mem::take(&mut self.files);
        for ((filename, counts), target) in before.into_iter().zip(targets) {
            match self.files.entry(target) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(counts);
                }
                btree_map::Entry::Occupied(mut entry) => {
                    log::debug!(
                        "{} renamed onto existing file {}, merging counts",
                        filename,
                        entry.key()
                    );
                    entry.get_mut().merge_sum(&counts)?;
                }
            }
        }
        Ok(())
    }

    /// Strip `prefix` from every filename that starts with it.
    pub fn trim_prefix(&mut self, prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Ok(());
        }
        self.rename_files(|name| name.strip_prefix(prefix).unwrap_or(name).to_string())
    }

    /// Merge every file of `other` into this collection, summing counts for
    /// files present in both.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::LineOutOfBounds`](crate::errors::Error) when a file
    /// of `other` holds lines above the limit of the entry it merges into.
    /// Nothing is merged in that case.
    pub fn merge_with(&mut self, other: &Profiles) -> Result<()> {
        let empty = LineCounts::with_line_limit(self.line_limit);
        for (filename, counts) in other.iter() {
            self.files.get(filename).unwrap_or(&empty).check_fits(counts)?;
        }
        for (filename, counts) in other.iter() {
            self.line_counts(filename).merge_sum(counts)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Profiles {
    type Item = (&'a String, &'a LineCounts);
    type IntoIter = btree_map::Iter<'a, String, LineCounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Profiles {
    /// One filename per line, followed by its runs indented by two spaces,
    /// one run per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (filename, counts) in self.iter() {
            writeln!(f, "{filename}")?;
            for run in counts.runs() {
                writeln!(f, "  {run}")?;
            }
        }
        Ok(())
    }
}
