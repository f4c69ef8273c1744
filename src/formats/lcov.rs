//! LCOV tracefile import and export.
//!
//! Only the line-level subset of the format is interpreted:
//!
//! ```text
//! SF:<path>            start of a record for <path>
//! DA:<line>,<count>    hit count of one line (an optional checksum may follow)
//! end_of_record        end of the record
//! ```
//!
//! Other LCOV directives (functions, branches, summaries) are skipped. Export
//! writes `SF`, `DA`, `LH`, `LF` and `end_of_record` for every file.

use super::{Exporter, Importer};
use crate::coverage::{LineCounts, Profiles};
use crate::errors::{Error, Result};
use std::io::{BufRead, BufWriter, Write};

const END_OF_RECORD: &str = "end_of_record";

/// Directives that are valid LCOV but carry nothing this model keeps.
const IGNORED_KEYS: &[&str] = &[
    "TN", "VER", "FN", "FNDA", "FNF", "FNH", "FNL", "FNA", "BRDA", "BRF", "BRH", "LF", "LH",
];

/// LCOV codec.
#[derive(Debug, Clone, Copy)]
pub struct Lcov {
    line_limit: usize,
    max_data_line: usize,
}

impl Default for Lcov {
    fn default() -> Self {
        Self::with_limits(LineCounts::MAX_LINE_INDEX, Self::MAX_DATA_LINE)
    }
}

impl Lcov {
    /// `DA` lines above this index are treated as corrupt and dropped.
    pub const MAX_DATA_LINE: usize = 1_000_000;

    /// `line_limit` is handed to every imported [`LineCounts`];
    /// `max_data_line` is the drop threshold for `DA` lines.
    pub fn with_limits(line_limit: usize, max_data_line: usize) -> Self {
        Self {
            line_limit,
            max_data_line,
        }
    }
}

/// The record currently being read: its file and the counts seen so far.
struct OpenRecord {
    file: String,
    counts: LineCounts,
}

struct ImportState {
    profiles: Profiles,
    open: Option<OpenRecord>,
    line_limit: usize,
}

impl ImportState {
    fn start_record(&mut self, file: &str) -> Result<()> {
        if let Some(previous) = self.open.take() {
            log::debug!(
                "SF:{} while record for {} is open; closing it",
                file,
                previous.file
            );
            self.flush(previous)?;
        }
        self.open = Some(OpenRecord {
            file: file.to_string(),
            counts: LineCounts::with_line_limit(self.line_limit),
        });
        Ok(())
    }

    fn end_record(&mut self, line_no: usize) -> Result<()> {
        let record = self
            .open
            .take()
            .ok_or(Error::EndOfRecordWithoutFile { line: line_no })?;
        self.flush(record)
    }

    /// Fold a finished record into the profiles. Records for a file seen
    /// before combine with it line by line, keeping the larger count.
    fn flush(&mut self, record: OpenRecord) -> Result<()> {
        let target = self.profiles.line_counts(&record.file);
        for (line, count) in record.counts.iter() {
            target.set(line, count)?;
        }
        Ok(())
    }
}

impl Importer for Lcov {
    fn import<R: BufRead>(&self, reader: R) -> Result<Profiles> {
        let mut state = ImportState {
            profiles: Profiles::with_line_limit(self.line_limit),
            open: None,
            line_limit: self.line_limit,
        };

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let text = line.trim_end_matches('\r');
            if text.is_empty() {
                continue;
            }
            if text == END_OF_RECORD {
                state.end_record(line_no)?;
                continue;
            }
            let Some((key, value)) = text.split_once(':') else {
                log::warn!("cannot parse line {}: {:?}", line_no, text);
                continue;
            };
            match key {
                "SF" => state.start_record(value)?,
                "DA" => {
                    let record = state
                        .open
                        .as_mut()
                        .ok_or(Error::LineDataWithoutFile { line: line_no })?;
                    let (data_line, count) = parse_line_data(line_no, value)?;
                    if data_line > self.max_data_line {
                        log::debug!(
                            "dropping DA line {} for {}: exceeds {}",
                            data_line,
                            record.file,
                            self.max_data_line
                        );
                        continue;
                    }
                    record.counts.set(data_line, count)?;
                }
                key if IGNORED_KEYS.contains(&key) => {
                    log::debug!("skipping {} directive on line {}", key, line_no);
                }
                _ => log::warn!("ignoring unknown LCOV directive on line {}: {:?}", line_no, text),
            }
        }

        if let Some(record) = state.open {
            return Err(Error::UnfinishedRecord { file: record.file });
        }
        Ok(state.profiles)
    }
}

/// Parse the value of a `DA` directive: `<line>,<count>[,<checksum>]`.
fn parse_line_data(line_no: usize, value: &str) -> Result<(usize, u64)> {
    let mut fields = value.split(',').map(str::trim);
    let line = fields
        .next()
        .unwrap_or_default()
        .parse::<usize>()
        .map_err(|e| Error::invalid_line_data(line_no, value, format!("bad line number: {e}")))?;
    let count = fields
        .next()
        .ok_or_else(|| Error::invalid_line_data(line_no, value, "missing hit count"))?
        .parse::<u64>()
        .map_err(|e| Error::invalid_line_data(line_no, value, format!("bad hit count: {e}")))?;
    Ok((line, count))
}

impl Exporter for Lcov {
    fn export<W: Write>(&self, profiles: &Profiles, writer: W) -> Result<()> {
        let mut w = BufWriter::new(writer);
        for (filename, line_counts) in profiles.iter() {
            writeln!(w, "SF:{filename}")?;
            for (line, count) in line_counts.iter() {
                writeln!(w, "DA:{line},{count}")?;
            }
            writeln!(w, "LH:{}", line_counts.covered())?;
            writeln!(w, "LF:{}", line_counts.len())?;
            writeln!(w, "{END_OF_RECORD}")?;
        }
        w.flush()?;
        Ok(())
    }
}
