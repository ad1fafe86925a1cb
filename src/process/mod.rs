// src/process/mod.rs
pub mod dedup;
pub mod filter;
pub mod utils;
pub mod write;

use csv::ReaderBuilder;
use std::{fs::File, io::BufReader, path::Path};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

/// How many header names the loader previews in the log.
const PREVIEW_COLUMNS: usize = 30;
/// How many identifier values the loader previews in the log.
const PREVIEW_SIDS: usize = 10;

/// Columns the IBTrACS list export normally carries besides the key columns.
const EXPECTED_COLUMNS: [&str; 3] = ["NAME", "LAT", "LON"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names from the header row, in file order.
    pub headers: Vec<String>,
    /// Every data row, one String per field. Each row has `headers.len()` fields.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Positions of the storm id, observation number and timestamp columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub sid: usize,
    pub number: usize,
    pub time: usize,
}

impl KeyColumns {
    /// Look up the configured key columns, failing on the first one that is absent.
    pub fn resolve(table: &RawTable, cfg: &PipelineConfig, path: &Path) -> PipelineResult<Self> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| PipelineError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            sid: find(&cfg.sid_column)?,
            number: find(&cfg.number_column)?,
            time: find(&cfg.time_column)?,
        })
    }
}

/// A row annotated with the year derived from its storm id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub year: Option<i32>,
    pub fields: Vec<String>,
}

/// Read a comma-delimited table with a header row. Every field stays a String
/// so passthrough columns are written back exactly as read.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> PipelineResult<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| PipelineError::from_csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| PipelineError::from_csv(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    info!(columns = headers.len(), rows = rows.len(), "loaded table");
    Ok(RawTable { headers, rows })
}

/// Log the header preview and a sample of identifiers, and warn about
/// the usual IBTrACS columns that are missing.
pub fn log_preview(table: &RawTable, keys: &KeyColumns) {
    let preview: Vec<&str> = table
        .headers
        .iter()
        .take(PREVIEW_COLUMNS)
        .map(String::as_str)
        .collect();
    info!(?preview, "columns");

    let sample: Vec<&str> = table
        .rows
        .iter()
        .take(PREVIEW_SIDS)
        .map(|r| r[keys.sid].as_str())
        .collect();
    debug!(?sample, "sample SID values");

    for name in EXPECTED_COLUMNS {
        if table.column_index(name).is_none() {
            warn!(column = name, "expected column not present, continuing");
        }
    }
}

/// Attach the derived year to every row.
pub fn annotate_years(rows: Vec<Vec<String>>, sid: usize) -> Vec<Record> {
    rows.into_iter()
        .map(|fields| Record {
            year: utils::derive_year(&fields[sid]),
            fields,
        })
        .collect()
}

/// Materialise the year column. An existing column of the same name is
/// overwritten in place; otherwise the year is appended as the last column.
pub fn with_year_column(headers: &[String], records: Vec<Record>, year_column: &str) -> RawTable {
    let existing = headers.iter().position(|h| h == year_column);
    let mut headers = headers.to_vec();
    if existing.is_none() {
        headers.push(year_column.to_string());
    }

    let rows = records
        .into_iter()
        .map(|Record { year, mut fields }| {
            let value = year.map(|y| y.to_string()).unwrap_or_default();
            match existing {
                Some(i) => fields[i] = value,
                None => fields.push(value),
            }
            fields
        })
        .collect();

    RawTable { headers, rows }
}
