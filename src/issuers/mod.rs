mod csv_source;

pub use csv_source::CsvIssuerSource;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Place-of-incorporation value that keeps a row. Exact match, like every
/// other name comparison in this crate.
pub const UK_PLACE_OF_INCORPORATION: &str = "United Kingdom";

/// Where and how to read one listed-issuer export. Row and column indices
/// are zero-based; exchanges bury the header several rows into the sheet,
/// hence `start_row`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuerSourceSpec {
    pub label: String,
    pub path: PathBuf,
    pub start_row: usize,
    pub name_column: usize,
    pub place_of_incorporation_column: usize,
}

/// Names ingested from one listed-issuer source, in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerList {
    pub label: String,
    pub names: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IssuerListError {
    #[error("could not read issuer export {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid issuer export {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("invalid issuer source descriptors {path}: {source}")]
    Descriptors {
        path: String,
        source: serde_json::Error,
    },
}

/// Boundary to a listed-issuer feed so the cross-reference can be fed from
/// any tabular export format.
pub trait IssuerSource: fmt::Debug {
    fn uk_issuers(&self, spec: &IssuerSourceSpec) -> Result<Vec<String>, IssuerListError>;
}

/// Reads source descriptors from a JSON file. A missing file only disables
/// cross-reference highlighting; a malformed one is an error.
pub fn load_source_specs(path: &Path) -> Result<Vec<IssuerSourceSpec>, IssuerListError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "no issuer source descriptors, cross-reference disabled"
            );
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(IssuerListError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|source| IssuerListError::Descriptors {
        path: path.display().to_string(),
        source,
    })
}

pub fn collect_issuer_lists(
    source: &dyn IssuerSource,
    specs: &[IssuerSourceSpec],
) -> Result<Vec<IssuerList>, IssuerListError> {
    specs
        .iter()
        .map(|spec| {
            info!(source = %spec.label, "reading issuer list");
            let names = source.uk_issuers(spec)?;
            info!(source = %spec.label, count = names.len(), "issuer names ingested");
            Ok(IssuerList {
                label: spec.label.clone(),
                names,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_file_decodes_into_specs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("issuer_sources.json");
        std::fs::write(
            &path,
            r#"[
                {
                    "label": "LSE companies",
                    "path": "lse_issuers.csv",
                    "start_row": 6,
                    "name_column": 2,
                    "place_of_incorporation_column": 5
                }
            ]"#,
        )
        .expect("write descriptors");

        let specs = load_source_specs(&path).expect("specs load");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].label, "LSE companies");
        assert_eq!(specs[0].start_row, 6);
        assert_eq!(specs[0].name_column, 2);
        assert_eq!(specs[0].place_of_incorporation_column, 5);
    }

    #[test]
    fn missing_descriptor_file_yields_no_sources() {
        let specs =
            load_source_specs(Path::new("./does-not-exist.json")).expect("missing file tolerated");
        assert!(specs.is_empty());
    }

    #[test]
    fn malformed_descriptor_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("issuer_sources.json");
        std::fs::write(&path, "{broken").expect("write descriptors");

        let error = load_source_specs(&path).expect_err("expected descriptor error");
        assert!(matches!(error, IssuerListError::Descriptors { .. }));
    }
}
