// Input CSV ingestion.
//
// Reads the export as UTF-8 (lossily, the files come from several systems),
// sniffs the delimiter from the header line, and hands back the string table
// together with the column map resolved against its headers. A missing or
// unreadable file is the one fatal error of the whole pipeline.
use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::columns::ColumnMap;
use crate::config::Settings;
use crate::error::PipelineError;
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub total_columns: usize,
    pub parse_errors: usize,
    pub delimiter: u8,
}

#[derive(Debug)]
pub struct LoadedData {
    pub table: Table,
    pub columns: ColumnMap,
    pub report: LoadReport,
}

/// Pick the delimiter by counting candidates on the header line, outside
/// quoted sections. Comma wins ties and is the fallback.
fn sniff_delimiter(header_line: &str) -> u8 {
    let mut counts = [(b';', 0usize), (b'\t', 0), (b',', 0)];
    let mut in_quotes = false;
    for b in header_line.bytes() {
        match b {
            b'"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            _ => {
                for (delim, count) in counts.iter_mut() {
                    if b == *delim {
                        *count += 1;
                    }
                }
            }
        }
    }
    counts
        .iter()
        .max_by_key(|(_, count)| *count)
        .filter(|(_, count)| *count > 0)
        .map(|(delim, _)| *delim)
        .unwrap_or(b',')
}

pub fn load(path: &Path, settings: &Settings) -> Result<LoadedData, PipelineError> {
    info!("loading data from {}", path.display());

    if !path.exists() {
        return Err(PipelineError::InputNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut content = String::from_utf8_lossy(&bytes).into_owned();
    if let Some(stripped) = content.strip_prefix('\u{feff}') {
        content = stripped.to_string();
    }

    let header_line = content.lines().next().unwrap_or("");
    if header_line.trim().is_empty() {
        return Err(PipelineError::EmptyInput(path.to_path_buf()));
    }
    let delimiter = sniff_delimiter(header_line);

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|source| PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(headers);
    let mut parse_errors = 0usize;
    for record in rdr.records() {
        match record {
            Ok(rec) => table.push_row(rec.iter().map(str::to_string).collect()),
            Err(_) => parse_errors += 1,
        }
    }

    let columns = ColumnMap::resolve(&table, &settings.columns);
    let report = LoadReport {
        total_rows: table.row_count(),
        total_columns: table.column_count(),
        parse_errors,
        delimiter,
    };
    info!(
        "loaded {} records with {} columns (delimiter {:?})",
        report.total_rows, report.total_columns, delimiter as char
    );

    Ok(LoadedData {
        table,
        columns,
        report,
    })
}
