//! Annotation manifest.
//!
//! A CSV file listing every model in an insertion run with its data source:
//!
//! ```text
//! Organ name,Source,File name,Transformed file name
//! whole-body,https://doi.org/10.26275/yibc-wyu2,whole_body.exf,whole_body.exf
//! heart,https://doi.org/10.26275/dqpf-gqdt,heart.exf,heart_transformed_fit1.exf
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{InsertError, InsertResult};

/// File name of the manifest in the output directory.
pub const MANIFEST_FILE_NAME: &str = "organinserter_annotations.csv";

/// Organ name used for the scaffold row.
pub const WHOLE_BODY: &str = "whole-body";

const HEADER: &str = "Organ name,Source,File name,Transformed file name";

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// Organ (group) name.
    pub organ: String,
    /// Data source, empty if unknown.
    pub source: String,
    /// Input file name.
    pub file_name: String,
    /// Output file name.
    pub transformed_file_name: String,
}

/// Rows of an annotation manifest, scaffold first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationManifest {
    rows: Vec<ManifestRow>,
    sources: Vec<String>,
}

impl AnnotationManifest {
    /// Start a manifest with the scaffold row.
    ///
    /// `sources[0]` describes the scaffold and `sources[i + 1]` the organ at
    /// input position `i`.
    #[must_use]
    pub fn new(scaffold: &Path, sources: &[String]) -> Self {
        let name = file_name(scaffold);
        Self {
            rows: vec![ManifestRow {
                organ: WHOLE_BODY.to_string(),
                source: sources.first().cloned().unwrap_or_default(),
                file_name: name.clone(),
                transformed_file_name: name,
            }],
            sources: sources.to_vec(),
        }
    }

    /// Append a row for the organ at input `position`.
    pub fn add_organ(&mut self, position: usize, organ: &str, input: &Path, output: &Path) {
        let source = self.sources.get(position + 1).cloned().unwrap_or_default();
        self.rows.push(ManifestRow {
            organ: organ.to_string(),
            source,
            file_name: file_name(input),
            transformed_file_name: file_name(output),
        });
    }

    /// All rows, scaffold first.
    #[must_use]
    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    /// Write the manifest as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Manifest`] if the file cannot be written.
    pub fn export_csv(&self, path: &Path) -> InsertResult<()> {
        let manifest_error = |source| InsertError::Manifest {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(manifest_error)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{HEADER}").map_err(manifest_error)?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{},{}",
                escape_csv(&row.organ),
                escape_csv(&row.source),
                escape_csv(&row.file_name),
                escape_csv(&row.transformed_file_name)
            )
            .map_err(manifest_error)?;
        }
        writer.flush().map_err(manifest_error)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::InsertParams;
    use tempfile::tempdir;

    #[test]
    fn test_rows_take_sources_by_position() {
        let sources = InsertParams::default().sources;
        let mut manifest = AnnotationManifest::new(Path::new("in/whole_body.exf"), &sources);
        manifest.add_organ(
            0,
            "heart",
            Path::new("in/heart.exf"),
            Path::new("out/heart_transformed_fit1.exf"),
        );

        let rows = manifest.rows();
        assert_eq!(rows[0].organ, "whole-body");
        assert_eq!(rows[0].transformed_file_name, "whole_body.exf");
        assert_eq!(rows[1].source, sources[1]);
        assert_eq!(rows[1].transformed_file_name, "heart_transformed_fit1.exf");
    }

    #[test]
    fn test_source_follows_input_position() {
        let sources = InsertParams::default().sources;
        let mut manifest = AnnotationManifest::new(Path::new("whole_body.exf"), &sources);
        manifest.add_organ(4, "bladder", Path::new("bladder.exf"), Path::new("b.exf"));
        assert_eq!(manifest.rows()[1].source, sources[5]);
    }

    #[test]
    fn test_missing_source_is_empty() {
        let mut manifest = AnnotationManifest::new(Path::new("body.exf"), &[]);
        manifest.add_organ(0, "lung", Path::new("lung.exf"), Path::new("lung_fit1.exf"));
        assert!(manifest.rows().iter().all(|r| r.source.is_empty()));
    }

    #[test]
    fn test_export_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        let mut manifest =
            AnnotationManifest::new(Path::new("whole_body.exf"), &["doi:a".to_string()]);
        manifest.add_organ(3, "left, lung", Path::new("lung.exf"), Path::new("lung.exf"));
        manifest.export_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "whole-body,doi:a,whole_body.exf,whole_body.exf");
        assert_eq!(lines[2], "\"left, lung\",,lung.exf,lung.exf");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
