use std::fs::File;
use std::io::Read;

use super::{IssuerListError, IssuerSource, IssuerSourceSpec, UK_PLACE_OF_INCORPORATION};

/// Reads issuer exports that have been saved as CSV. Records are read raw
/// (no header row) because the interesting columns sit at fixed indices
/// below a decorative preamble.
#[derive(Debug, Default)]
pub struct CsvIssuerSource;

impl CsvIssuerSource {
    pub fn read_from<R: Read>(
        reader: R,
        spec: &IssuerSourceSpec,
    ) -> Result<Vec<String>, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut names = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            if row < spec.start_row {
                continue;
            }

            let name = cell(&record, spec.name_column);
            let place = cell(&record, spec.place_of_incorporation_column);

            // The first row with both cells blank marks the end of the data
            // block; anything after it is sheet footer noise.
            if name.is_empty() && place.is_empty() {
                break;
            }

            if place == UK_PLACE_OF_INCORPORATION {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }
}

fn cell<'r>(record: &'r csv::StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or("")
}

impl IssuerSource for CsvIssuerSource {
    fn uk_issuers(&self, spec: &IssuerSourceSpec) -> Result<Vec<String>, IssuerListError> {
        let path = spec.path.display().to_string();
        let file = File::open(&spec.path).map_err(|source| IssuerListError::Io {
            path: path.clone(),
            source,
        })?;
        Self::read_from(file, spec).map_err(|source| IssuerListError::Csv { path, source })
    }
}
