//! Coverage file formats and the dispatch between them.
//!
//! Each format is implemented by a codec type that provides one or both of
//! the [`Importer`] and [`Exporter`] capabilities:
//!
//! | Format                  | Extension | Import | Export |
//! |-------------------------|-----------|--------|--------|
//! | [`Format::GoCover`]     | `.gocov`  | yes    | no     |
//! | [`Format::Lcov`]        | `.lcov`   | yes    | yes    |
//! | [`Format::CodecovJson`] | `.json`   | no     | yes    |
//!
//! The free functions [`import`] and [`export`] pick the codec for a
//! [`Format`] and reject directions the format does not support before
//! touching the stream.

pub mod codecov_json;
pub mod gocover;
pub mod lcov;

pub use codecov_json::CodecovJson;
pub use gocover::GoCover;
pub use lcov::Lcov;

use crate::coverage::{LineCounts, Profiles};
use crate::errors::{Error, Result};
use std::fmt;
use std::io::{BufRead, Write};

/// A coverage file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// No format selected; rejected by every dispatch.
    #[default]
    Unset,
    /// Go cover profile (`go test -coverprofile`)
    GoCover,
    /// LCOV tracefile
    Lcov,
    /// Codecov custom coverage JSON
    CodecovJson,
}

impl Format {
    /// Every selectable format, in the order extensions are reported.
    pub const ALL: [Format; 3] = [Format::GoCover, Format::Lcov, Format::CodecovJson];

    /// Determine the format from the extension of `filename`. Matching is
    /// case-sensitive.
    pub fn from_filename(filename: &str) -> Result<Format> {
        Self::ALL
            .into_iter()
            .find(|format| {
                format
                    .extension()
                    .is_some_and(|ext| filename.ends_with(ext))
            })
            .ok_or_else(|| Error::UnknownExtension {
                filename: filename.to_string(),
            })
    }

    /// Extension (with leading dot) recognized for this format.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Format::Unset => None,
            Format::GoCover => Some(".gocov"),
            Format::Lcov => Some(".lcov"),
            Format::CodecovJson => Some(".json"),
        }
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        Self::ALL.iter().filter_map(|f| f.extension()).collect()
    }

    pub fn supports_import(self) -> bool {
        matches!(self, Format::GoCover | Format::Lcov)
    }

    pub fn supports_export(self) -> bool {
        matches!(self, Format::Lcov | Format::CodecovJson)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Unset => "unset",
            Format::GoCover => "Go cover",
            Format::Lcov => "LCOV",
            Format::CodecovJson => "Codecov JSON",
        };
        f.write_str(name)
    }
}

/// Reads a coverage stream into [`Profiles`].
pub trait Importer {
    fn import<R: BufRead>(&self, reader: R) -> Result<Profiles>;
}

/// Writes [`Profiles`] as one complete document.
pub trait Exporter {
    fn export<W: Write>(&self, profiles: &Profiles, writer: W) -> Result<()>;
}

/// Line-index ceilings applied while importing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Ceiling enforced by every imported [`LineCounts`]; exceeding it fails
    /// the import.
    pub max_line_index: usize,
    /// LCOV data lines above this index are dropped.
    pub lcov_max_line_index: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_line_index: LineCounts::MAX_LINE_INDEX,
            lcov_max_line_index: Lcov::MAX_DATA_LINE,
        }
    }
}

/// Import coverage data in the given format with default limits.
pub fn import<R: BufRead>(format: Format, reader: R) -> Result<Profiles> {
    import_with_options(format, reader, &ImportOptions::default())
}

/// Import coverage data in the given format.
pub fn import_with_options<R: BufRead>(
    format: Format,
    reader: R,
    options: &ImportOptions,
) -> Result<Profiles> {
    match format {
        Format::GoCover => GoCover::with_line_limit(options.max_line_index).import(reader),
        Format::Lcov => Lcov::with_limits(options.max_line_index, options.lcov_max_line_index)
            .import(reader),
        Format::CodecovJson => Err(Error::ImportNotSupported(format)),
        Format::Unset => Err(Error::InvalidFormat(format)),
    }
}

/// Export coverage data to the given format.
pub fn export<W: Write>(profiles: &Profiles, format: Format, writer: W) -> Result<()> {
    match format {
        Format::GoCover => Err(Error::ExportNotSupported(format)),
        Format::Lcov => Lcov::default().export(profiles, writer),
        Format::CodecovJson => CodecovJson.export(profiles, writer),
        Format::Unset => Err(Error::InvalidFormat(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(Format::from_filename("report.lcov").unwrap(), Format::Lcov);
        assert_eq!(
            Format::from_filename("report.gocov").unwrap(),
            Format::GoCover
        );
        assert_eq!(
            Format::from_filename("out/report.json").unwrap(),
            Format::CodecovJson
        );
    }

    #[test]
    fn test_unknown_extension() {
        let err = Format::from_filename("report.txt").unwrap_err();
        assert!(matches!(err, Error::UnknownExtension { .. }));
        assert_eq!(
            err.to_string(),
            "could not determine format for filename \"report.txt\"; \
             supported extensions are .gocov, .lcov, .json"
        );
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert!(Format::from_filename("REPORT.LCOV").is_err());
        assert!(Format::from_filename("lcov").is_err());
    }

    #[test]
    fn test_directions() {
        assert!(Format::GoCover.supports_import());
        assert!(!Format::GoCover.supports_export());
        assert!(Format::Lcov.supports_import());
        assert!(Format::Lcov.supports_export());
        assert!(!Format::CodecovJson.supports_import());
        assert!(Format::CodecovJson.supports_export());
        assert!(!Format::Unset.supports_import());
        assert!(!Format::Unset.supports_export());
        assert_eq!(Format::default(), Format::Unset);
    }

    #[test]
    fn test_import_unsupported() {
        let err = import(Format::CodecovJson, "{}".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "import from Codecov JSON not supported");
        assert!(matches!(
            import(Format::Unset, "".as_bytes()),
            Err(Error::InvalidFormat(Format::Unset))
        ));
    }

    #[test]
    fn test_export_unsupported_writes_nothing() {
        let mut p = Profiles::new();
        p.line_counts("a.go").set(1, 1).unwrap();
        let mut out = Vec::new();
        let err = export(&p, Format::GoCover, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "export to Go cover not supported");
        assert!(out.is_empty());
        assert!(export(&p, Format::Unset, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_dispatch_round_trip_through_lcov() {
        let input = "SF:a.go\nDA:1,1\nDA:2,0\nend_of_record\n";
        let p = import(Format::Lcov, input.as_bytes()).unwrap();
        let mut out = Vec::new();
        export(&p, Format::Lcov, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "SF:a.go\nDA:1,1\nDA:2,0\nLH:1\nLF:2\nend_of_record\n"
        );
    }

    #[test]
    fn test_import_options_limit() {
        let options = ImportOptions {
            max_line_index: 10,
            ..ImportOptions::default()
        };
        let input = "mode: set\na.go:1.1,20.2 1 1\n";
        let err = import_with_options(Format::GoCover, input.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, Error::LineOutOfBounds { index: 11, limit: 10 }));
    }
}
