// File and console output.
//
// This is the only place that turns the internal summary tag into the
// visible `MédiaTodosDias` / `GERAL` markers the downstream spreadsheet
// consumers expect.
use std::path::Path;

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::info;

use crate::aggregator::{
    AveragesRow, AveragesTable, DATE_COLUMN, MEAN_COLUMN_PREFIX, ORDER_COUNT_COLUMN,
    RETURN_TO_BASE_COLUMN, SUMMARY_DATE_SENTINEL, SUMMARY_TEAM_PREFIX,
};
use crate::error::PipelineError;
use crate::table::Table;
use crate::temporal::fmt2;

fn csv_error(path: &Path, source: csv::Error) -> PipelineError {
    PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the calculated table as UTF-8 comma-separated CSV.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    wtr.write_record(table.headers())
        .map_err(|e| csv_error(path, e))?;
    for i in 0..table.row_count() {
        wtr.write_record(table.row(i))
            .map_err(|e| csv_error(path, e))?;
    }
    wtr.flush().map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved {} rows to {}", table.row_count(), path.display());
    Ok(())
}

fn averages_headers(averages: &AveragesTable) -> Vec<String> {
    let mut headers = vec![averages.team_header.clone(), DATE_COLUMN.to_string()];
    for col in &averages.metric_columns {
        headers.push(format!("{MEAN_COLUMN_PREFIX}{col}"));
    }
    headers.push(ORDER_COUNT_COLUMN.to_string());
    if averages.has_return_to_base {
        headers.push(RETURN_TO_BASE_COLUMN.to_string());
    }
    headers
}

fn averages_record(averages: &AveragesTable, row: &AveragesRow) -> Vec<String> {
    let team = if row.is_summary {
        format!("{SUMMARY_TEAM_PREFIX}{}", row.team)
    } else {
        row.team.clone()
    };
    let date = match row.date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => SUMMARY_DATE_SENTINEL.to_string(),
    };
    let mut record = vec![team, date];
    for mean in &row.means {
        record.push(mean.map(fmt2).unwrap_or_default());
    }
    record.push(row.order_count.to_string());
    if averages.has_return_to_base {
        record.push(row.return_to_base.clone().unwrap_or_default());
    }
    record
}

/// Write an averages table; summary rows get the marker-prefixed team id and
/// the sentinel date here, at the boundary.
pub fn write_averages_csv(path: &Path, averages: &AveragesTable) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    wtr.write_record(averages_headers(averages))
        .map_err(|e| csv_error(path, e))?;
    for row in &averages.rows {
        wtr.write_record(averages_record(averages, row))
            .map_err(|e| csv_error(path, e))?;
    }
    wtr.flush().map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved {} rows to {}", averages.rows.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let s = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(path, s).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Markdown rendering of the first `max_rows` averages rows, for the console.
pub fn render_averages_preview(averages: &AveragesTable, max_rows: usize) -> String {
    if averages.rows.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(averages_headers(averages));
    for row in averages.rows.iter().take(max_rows) {
        builder.push_record(averages_record(averages, row));
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn preview_averages(averages: &AveragesTable, max_rows: usize) {
    println!("{}\n", render_averages_preview(averages, max_rows));
}
