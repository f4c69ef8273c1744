//! Go cover profile import.
//!
//! A profile starts with a `mode:` line followed by one line per block:
//!
//! ```text
//! mode: count
//! github.com/org/pkg/file.go:12.34,15.2 3 1
//! ```
//!
//! `12.34,15.2` is the block's start line/column and end line/column, `3` the
//! number of statements and `1` the hit count. Every line of a block receives
//! the block's count; where blocks overlap the larger count wins.

use super::Importer;
use crate::coverage::{LineCounts, Profiles};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;

static BLOCK_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$").unwrap()
});

const MODE_PREFIX: &str = "mode: ";

/// A single block of a Go cover profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
    num_stmt: u64,
    count: u64,
}

impl Block {
    fn position(&self) -> (usize, usize, usize, usize) {
        (self.start_line, self.start_col, self.end_line, self.end_col)
    }
}

/// Importer for Go cover profiles.
#[derive(Debug, Clone, Copy)]
pub struct GoCover {
    line_limit: usize,
}

impl Default for GoCover {
    fn default() -> Self {
        Self::with_line_limit(LineCounts::MAX_LINE_INDEX)
    }
}

impl GoCover {
    pub fn with_line_limit(line_limit: usize) -> Self {
        Self { line_limit }
    }
}

impl Importer for GoCover {
    fn import<R: BufRead>(&self, reader: R) -> Result<Profiles> {
        let (mode, files) = parse_profile(reader)?;
        let mut profiles = Profiles::with_line_limit(self.line_limit);
        for (filename, blocks) in files {
            let blocks = merge_duplicate_blocks(&filename, blocks, &mode)?;
            let line_counts = profiles.line_counts(&filename);
            for block in blocks {
                for line in block.start_line..=block.end_line {
                    line_counts.set(line, block.count)?;
                }
            }
        }
        log::debug!(
            "imported {} files from Go cover profile (mode {})",
            profiles.len(),
            if mode.is_empty() { "<none>" } else { mode.as_str() }
        );
        Ok(profiles)
    }
}

/// Read the mode header and the blocks of every file.
fn parse_profile<R: BufRead>(reader: R) -> Result<(String, BTreeMap<String, Vec<Block>>)> {
    let mut mode = String::new();
    let mut files: BTreeMap<String, Vec<Block>> = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let text = line.trim_end_matches('\r');
        if text.is_empty() {
            continue;
        }
        if mode.is_empty() {
            mode = parse_mode_line(text).ok_or_else(|| Error::BadModeLine {
                line: line_no,
                text: text.to_string(),
            })?;
            continue;
        }
        let (filename, block) = parse_block_line(text).ok_or_else(|| Error::InvalidBlock {
            line: line_no,
            text: text.to_string(),
        })?;
        files.entry(filename).or_default().push(block);
    }
    Ok((mode, files))
}

fn parse_mode_line(text: &str) -> Option<String> {
    text.strip_prefix(MODE_PREFIX)
        .filter(|mode| !mode.is_empty())
        .map(str::to_string)
}

fn parse_block_line(text: &str) -> Option<(String, Block)> {
    let caps = BLOCK_LINE.captures(text)?;
    let number = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();
    let line = |i: usize| number(i).and_then(|n| usize::try_from(n).ok());
    let block = Block {
        start_line: line(2)?,
        start_col: line(3)?,
        end_line: line(4)?,
        end_col: line(5)?,
        num_stmt: number(6)?,
        count: number(7)?,
    };
    Some((caps[1].to_string(), block))
}

/// Sort blocks by position and fold identical positions into one block.
/// Counts are summed, or OR-ed in `set` mode.
fn merge_duplicate_blocks(
    filename: &str,
    mut blocks: Vec<Block>,
    mode: &str,
) -> Result<Vec<Block>> {
    blocks.sort_by_key(Block::position);
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.position() == block.position() => {
                if last.num_stmt != block.num_stmt {
                    return Err(Error::InconsistentStatements {
                        file: filename.to_string(),
                        before: last.num_stmt,
                        after: block.num_stmt,
                    });
                }
                last.count = if mode == "set" {
                    last.count | block.count
                } else {
                    last.count.saturating_add(block.count)
                };
            }
            _ => merged.push(block),
        }
    }
    Ok(merged)
}
