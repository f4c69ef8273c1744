//! Sparse per-line hit counts for a single source file.
//!
//! Storage is a dense vector of optional counts indexed by line number. Index
//! 0 is never produced by the supported formats but is not rejected either.
//! A slot holding `None` means "no data for this line", which is distinct
//! from a count of zero ("instrumented but never executed").

use crate::errors::{Error, Result};
use std::fmt;
use std::iter::Enumerate;
use std::slice;
use std::str::FromStr;

/// Hit counts for the lines of one file.
#[derive(Debug, Clone)]
pub struct LineCounts {
    hit_counts: Vec<Option<u64>>,
    line_limit: usize,
}

impl Default for LineCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for LineCounts {
    /// Containers are equal when they hold the same `(line, count)` pairs;
    /// the configured line limit does not take part in the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for LineCounts {}

impl LineCounts {
    /// Highest line index accepted by [`LineCounts::set`] unless overridden.
    pub const MAX_LINE_INDEX: usize = 10_000_000;

    pub fn new() -> Self {
        Self::with_line_limit(Self::MAX_LINE_INDEX)
    }

    /// Create an empty container accepting line indices up to `line_limit`
    /// (inclusive). `usize::MAX` effectively disables the check, although a
    /// line at `usize::MAX` itself can never be stored.
    pub fn with_line_limit(line_limit: usize) -> Self {
        Self {
            hit_counts: Vec::new(),
            line_limit,
        }
    }

    pub fn line_limit(&self) -> usize {
        self.line_limit
    }

    /// Set the hit count for a line. If the line already has a hit count, the
    /// larger value is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfBounds`] when `line` exceeds the line limit;
    /// the container is left untouched in that case.
    pub fn set(&mut self, line: usize, hit_count: u64) -> Result<()> {
        if line > self.line_limit {
            return Err(Error::LineOutOfBounds {
                index: line,
                limit: self.line_limit,
            });
        }
        if line >= self.hit_counts.len() {
            let len = line.checked_add(1).ok_or(Error::LineOutOfBounds {
                index: line,
                limit: self.line_limit,
            })?;
            self.hit_counts.resize(len, None);
        }
        let slot = &mut self.hit_counts[line];
        *slot = Some(slot.map_or(hit_count, |existing| existing.max(hit_count)));
        Ok(())
    }

    /// Hit count recorded for `line`, if any.
    pub fn get(&self, line: usize) -> Option<u64> {
        self.hit_counts.get(line).copied().flatten()
    }

    /// Iterate over `(line, hit_count)` for every line with data, in
    /// increasing line order. Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.hit_counts.iter().enumerate(),
        }
    }

    /// Highest line with data.
    pub fn last_line(&self) -> Option<usize> {
        self.hit_counts.iter().rposition(Option::is_some)
    }

    /// Number of lines with data.
    pub fn len(&self) -> usize {
        self.hit_counts.iter().filter(|c| c.is_some()).count()
    }

    /// Number of lines with a hit count above zero.
    pub fn covered(&self) -> usize {
        self.hit_counts
            .iter()
            .filter(|c| matches!(c, Some(n) if *n > 0))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.hit_counts.iter().all(Option::is_none)
    }

    /// Delete all counts. Allocated capacity is kept.
    pub fn reset(&mut self) {
        self.hit_counts.clear();
    }

    /// Replace the contents with a copy of `other`'s counts. The line limit of
    /// `self` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfBounds`] when `other` holds a line above the
    /// line limit of `self`; the contents are left untouched in that case.
    pub fn copy_from(&mut self, other: &LineCounts) -> Result<()> {
        self.check_fits(other)?;
        self.hit_counts.clone_from(&other.hit_counts);
        Ok(())
    }

    /// Merge `other` into `self` by summing hit counts line by line, so that
    /// merged profiles report total hits across runs. Lines known to only one
    /// side keep that side's count. Sums saturate at `u64::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineOutOfBounds`] when `other` holds a line above the
    /// line limit of `self`; nothing is merged in that case.
    pub fn merge_sum(&mut self, other: &LineCounts) -> Result<()> {
        self.check_fits(other)?;
        if other.hit_counts.len() > self.hit_counts.len() {
            self.hit_counts.resize(other.hit_counts.len(), None);
        }
        for (line, count) in other.iter() {
            let slot = &mut self.hit_counts[line];
            *slot = Some(slot.map_or(count, |existing| existing.saturating_add(count)));
        }
        Ok(())
    }

    /// Fails unless every line of `other` is within the line limit of `self`.
    pub(crate) fn check_fits(&self, other: &LineCounts) -> Result<()> {
        match other.last_line() {
            Some(line) if line > self.line_limit => Err(Error::LineOutOfBounds {
                index: line,
                limit: self.line_limit,
            }),
            _ => Ok(()),
        }
    }

    /// Collapse consecutive lines sharing the same hit count into runs.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for (line, count) in self.iter() {
            match runs.last_mut() {
                Some(run) if run.end + 1 == line && run.count == count => run.end = line,
                _ => runs.push(Run {
                    start: line,
                    end: line,
                    count,
                }),
            }
        }
        runs
    }

    /// Render the run-length encoded counts, runs joined by `separator`.
    /// Example: `1-3:5 7:0`.
    pub fn render(&self, separator: &str) -> String {
        self.runs()
            .iter()
            .map(Run::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for LineCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(" "))
    }
}

impl<'a> IntoIterator for &'a LineCounts {
    type Item = (usize, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the lines of a [`LineCounts`] that carry data.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: Enumerate<slice::Iter<'a, Option<u64>>>,
}

impl Iterator for Iter<'_> {
    type Item = (usize, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find_map(|(line, count)| (*count).map(|c| (line, c)))
    }
}

/// A contiguous range of lines (inclusive) sharing one hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end: usize,
    pub count: u64,
}

impl Run {
    /// Expand the run back into `(line, count)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        (self.start..=self.end).map(move |line| (line, self.count))
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}:{}", self.start, self.count)
        } else {
            write!(f, "{}-{}:{}", self.start, self.end, self.count)
        }
    }
}

impl FromStr for Run {
    type Err = String;

    /// Parse `start:count` or `start-end:count`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (range, count) = s
            .split_once(':')
            .ok_or_else(|| format!("missing ':' in run {s:?}"))?;
        let count = count
            .parse::<u64>()
            .map_err(|e| format!("bad count in run {s:?}: {e}"))?;
        let parse_line = |v: &str| {
            v.parse::<usize>()
                .map_err(|e| format!("bad line in run {s:?}: {e}"))
        };
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (parse_line(start)?, parse_line(end)?),
            None => {
                let line = parse_line(range)?;
                (line, line)
            }
        };
        if end < start {
            return Err(format!("run {s:?} ends before it starts"));
        }
        Ok(Run { start, end, count })
    }
}
