//! Codecov custom coverage JSON export
//! (<https://docs.codecov.com/docs/codecov-custom-coverage-format>).
//!
//! Sample output:
//!
//! ```json
//! {
//!   "coverage": {
//!     "filename": {
//!       "1": 0,
//!       "2": 1,
//!       "7": 5
//!     }
//!   }
//! }
//! ```
//!
//! Line numbers become string keys. Files are written in sorted order and
//! lines in increasing numeric order. Files without any line data are left
//! out.

use super::Exporter;
use crate::coverage::{LineCounts, Profiles};
use crate::errors::Result;
use serde::{Serialize, Serializer};
use std::io::{BufWriter, Write};

/// Codecov JSON exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecovJson;

#[derive(Serialize)]
struct Report<'a> {
    coverage: FileCoverage<'a>,
}

struct FileCoverage<'a>(&'a Profiles);

impl Serialize for FileCoverage<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .filter(|(_, counts)| !counts.is_empty())
                .map(|(filename, counts)| (filename, LineCoverage(counts))),
        )
    }
}

struct LineCoverage<'a>(&'a LineCounts);

impl Serialize for LineCoverage<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(line, count)| (line.to_string(), count)))
    }
}

impl Exporter for CodecovJson {
    fn export<W: Write>(&self, profiles: &Profiles, writer: W) -> Result<()> {
        let mut w = BufWriter::new(writer);
        serde_json::to_writer_pretty(
            &mut w,
            &Report {
                coverage: FileCoverage(profiles),
            },
        )?;
        writeln!(w)?;
        w.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{Importer, Lcov};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn export(p: &Profiles) -> String {
        let mut out = Vec::new();
        CodecovJson.export(p, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_layout() {
        let mut p = Profiles::new();
        let lc = p.line_counts("pkg/file.go");
        lc.set(1, 0).unwrap();
        lc.set(2, 1).unwrap();
        lc.set(7, 5).unwrap();
        lc.set(10, 2).unwrap();
        p.line_counts("pkg/empty.go");
        assert_eq!(
            export(&p),
            r#"{
  "coverage": {
    "pkg/file.go": {
      "1": 0,
      "2": 1,
      "7": 5,
      "10": 2
    }
  }
}
"#
        );
    }

    #[test]
    fn test_files_without_data_are_skipped() {
        let p = Lcov::default()
            .import("SF:a.go\nend_of_record\nSF:b.go\nDA:1,1\nend_of_record\n".as_bytes())
            .unwrap();
        assert_eq!(p.files(), vec!["a.go", "b.go"]);
        let value: Value = serde_json::from_str(&export(&p)).unwrap();
        assert_eq!(value, json!({"coverage": {"b.go": {"1": 1}}}));

        let mut only_empty = Profiles::new();
        only_empty.line_counts("a.go");
        assert_eq!(export(&only_empty), "{\n  \"coverage\": {}\n}\n");
    }

    #[test]
    fn test_empty_profiles() {
        assert_eq!(export(&Profiles::new()), "{\n  \"coverage\": {}\n}\n");
    }

    #[test]
    fn test_parses_as_expected_value() {
        let mut p = Profiles::new();
        for line in 1..=3 {
            p.line_counts("a.go").set(line, 5).unwrap();
        }
        let value: Value = serde_json::from_str(&export(&p)).unwrap();
        assert_eq!(
            value,
            json!({"coverage": {"a.go": {"1": 5, "2": 5, "3": 5}}})
        );
    }

    #[test]
    fn test_filenames_are_escaped() {
        let mut p = Profiles::new();
        p.line_counts("dir\\with \"quotes\".go").set(1, 1).unwrap();
        let value: Value = serde_json::from_str(&export(&p)).unwrap();
        assert_eq!(value["coverage"]["dir\\with \"quotes\".go"]["1"], json!(1));
    }
}
