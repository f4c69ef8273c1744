//! Merge one or more coverage files and export the result.
//!
//! Each input is read in the format implied by its extension and merged into
//! a single aggregate (counts for the same line are summed across inputs).
//! Filenames are optionally trimmed, then the aggregate is exported in the
//! format implied by the output extension.

use crate::coverage::Profiles;
use crate::formats::{self, Format, ImportOptions};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Settings for a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Prefix stripped from every filename before export
    pub trim_prefix: Option<String>,
    /// Line-index limits applied while importing
    pub import: ImportOptions,
}

fn format_of(path: &Path) -> Result<Format> {
    Ok(Format::from_filename(&path.to_string_lossy())?)
}

/// Convert `inputs` into `output`.
///
/// The output file is only created once every input has been read and the
/// export has been rendered, so a failed conversion never leaves a partial
/// file behind.
pub fn convert(inputs: &[PathBuf], output: &Path, options: &ConvertOptions) -> Result<()> {
    let output_format = format_of(output)?;
    if !output_format.supports_export() {
        anyhow::bail!("export to {} not supported", output_format);
    }

    let mut profiles = load_inputs(inputs, &options.import)?;
    if let Some(prefix) = options.trim_prefix.as_deref() {
        profiles
            .trim_prefix(prefix)
            .with_context(|| format!("Error trimming prefix {:?}", prefix))?;
    }

    let mut rendered = Vec::new();
    formats::export(&profiles, output_format, &mut rendered)
        .with_context(|| format!("Error exporting to {}", output.display()))?;
    std::fs::write(output, rendered)
        .with_context(|| format!("Error writing {}", output.display()))?;

    log::info!(
        "wrote {} files to {} ({})",
        profiles.len(),
        output.display(),
        output_format
    );
    Ok(())
}

/// Import every input and merge them into one aggregate.
pub fn load_inputs(inputs: &[PathBuf], options: &ImportOptions) -> Result<Profiles> {
    let mut profiles = Profiles::with_line_limit(options.max_line_index);
    for input in inputs {
        let imported = load_input(input, options)?;
        log::debug!("{}: {} files", input.display(), imported.len());
        profiles
            .merge_with(&imported)
            .with_context(|| format!("Error merging {}", input.display()))?;
    }
    Ok(profiles)
}

fn load_input(input: &Path, options: &ImportOptions) -> Result<Profiles> {
    let format = format_of(input)?;
    if !format.supports_import() {
        anyhow::bail!("import from {} not supported ({})", format, input.display());
    }
    let file =
        File::open(input).with_context(|| format!("Error opening {}", input.display()))?;
    formats::import_with_options(format, BufReader::new(file), options)
        .with_context(|| format!("Error converting {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_convert_merges_inputs() {
        let dir = TempDir::new().unwrap();
        let gocov = write(&dir, "1.gocov", "mode: set\nrepo/a.go:1.1,2.1 1 1\n");
        let lcov = write(&dir, "2.lcov", "SF:repo/a.go\nDA:2,3\nDA:5,0\nend_of_record\n");
        let output = dir.path().join("result.lcov");

        let options = ConvertOptions {
            trim_prefix: Some("repo/".to_string()),
            ..ConvertOptions::default()
        };
        convert(&[gocov, lcov], &output, &options).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "SF:a.go\nDA:1,1\nDA:2,4\nDA:5,0\nLH:2\nLF:3\nend_of_record\n"
        );
    }

    #[test]
    fn test_unsupported_output_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "1.lcov", "SF:a.go\nDA:1,1\nend_of_record\n");
        let output = dir.path().join("result.gocov");

        let err = convert(&[input], &output, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "export to Go cover not supported");
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_import_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "1.lcov", "SF:a.go\nDA:1,1\nend_of_record\n");
        let bad = write(&dir, "2.lcov", "SF:b.go\nDA:1,1\n");
        let output = dir.path().join("result.json");

        let err = convert(&[good, bad], &output, &ConvertOptions::default()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("Error converting"), "{chain}");
        assert!(chain.contains("unfinished record"), "{chain}");
        assert!(!output.exists());
    }

    #[test]
    fn test_json_input_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "1.json", "{}");
        let output = dir.path().join("result.lcov");

        let err = convert(&[input], &output, &ConvertOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("import from Codecov JSON not supported"));
    }

    #[test]
    fn test_unknown_input_extension() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "report.txt", "");
        let output = dir.path().join("result.lcov");

        let err = convert(&[input], &output, &ConvertOptions::default()).unwrap_err();
        assert!(err.to_string().contains("supported extensions are .gocov, .lcov, .json"));
    }
}
