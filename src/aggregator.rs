// Team/day aggregation.
//
// Rolls a calculated table into per-(team, day) averages plus one synthetic
// summary row per team. Summary rows are tagged with `is_summary`; the
// `MédiaTodosDias` / `GERAL` markers the export files carry are rendered at
// the output boundary, never stored here.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::columns::{ColumnKey, ColumnMap};
use crate::config::Settings;
use crate::table::Table;
use crate::temporal::{parse_datetime, parse_minutes, round2};

/// Prefix the export layer puts in front of the team id on summary rows.
pub const SUMMARY_TEAM_PREFIX: &str = "MédiaTodosDias";
/// Date cell rendered for summary rows.
pub const SUMMARY_DATE_SENTINEL: &str = "GERAL";
/// Prefix for averaged metric column headers.
pub const MEAN_COLUMN_PREFIX: &str = "Media_";
/// Order-count column header.
pub const ORDER_COUNT_COLUMN: &str = "qtd_ordem";
/// Return-to-base column header in the averages export.
pub const RETURN_TO_BASE_COLUMN: &str = "Retorno a base";
/// Date column header in the averages export.
pub const DATE_COLUMN: &str = "Data";

/// One averages row: daily when `is_summary` is false, the team's overall
/// mean-of-means otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragesRow {
    pub team: String,
    /// Calendar day for daily rows; `None` on summary rows.
    pub date: Option<NaiveDate>,
    pub is_summary: bool,
    /// Parallel to [`AveragesTable::metric_columns`].
    pub means: Vec<Option<f64>>,
    pub order_count: u64,
    pub return_to_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AveragesTable {
    /// Resolved team column header, reused verbatim in the export.
    pub team_header: String,
    /// Calculated column names that were present, in canonical order.
    pub metric_columns: Vec<String>,
    pub has_return_to_base: bool,
    pub rows: Vec<AveragesRow>,
}

#[derive(Default)]
struct DayAcc {
    sums: Vec<f64>,
    counts: Vec<u64>,
    orders: u64,
    return_to_base: Option<String>,
}

pub struct Aggregator<'a> {
    settings: &'a Settings,
}

impl<'a> Aggregator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Aggregate a calculated table; `record_type` only labels the logs.
    ///
    /// Returns `None` when the team or dispatch column cannot be resolved or
    /// no calculated column is present — the caller skips that output file.
    pub fn aggregate(
        &self,
        table: &Table,
        columns: &ColumnMap,
        record_type: &str,
    ) -> Option<AveragesTable> {
        info!("starting aggregation for {record_type} records");

        if table.is_empty() {
            warn!("no {record_type} records to aggregate");
            return None;
        }
        let Some(team_col) = columns.get(ColumnKey::Equipe).filter(|h| table.has_column(h))
        else {
            warn!("team column not found, skipping {record_type} aggregation");
            return None;
        };
        let Some(dispatch_col) = columns
            .get(ColumnKey::Despachada)
            .filter(|h| table.has_column(h))
        else {
            warn!("date column not found, skipping {record_type} aggregation");
            return None;
        };

        let metric_columns: Vec<String> = self
            .settings
            .calculated
            .all()
            .iter()
            .filter(|c| table.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if metric_columns.is_empty() {
            warn!("no calculated columns found, skipping {record_type} aggregation");
            return None;
        }

        let return_col = columns
            .get(ColumnKey::RetornoBase)
            .filter(|h| table.has_column(h));

        // BTreeMap keeps (team, day) iteration deterministic and pre-sorted.
        let mut groups: BTreeMap<(String, NaiveDate), DayAcc> = BTreeMap::new();
        for i in 0..table.row_count() {
            let Some(team) = table.cell(i, team_col) else {
                continue;
            };
            // Calendar day comes from the dispatch timestamp; rows whose
            // dispatch does not parse carry no date and are left out.
            let Some(date) = parse_datetime(table.cell(i, dispatch_col)).map(|dt| dt.date())
            else {
                continue;
            };

            let acc = groups
                .entry((team.to_string(), date))
                .or_insert_with(|| DayAcc {
                    sums: vec![0.0; metric_columns.len()],
                    counts: vec![0; metric_columns.len()],
                    ..DayAcc::default()
                });
            for (m, col) in metric_columns.iter().enumerate() {
                if let Some(v) = parse_minutes(table.cell(i, col)) {
                    acc.sums[m] += v;
                    acc.counts[m] += 1;
                }
            }
            acc.orders += 1;
            if acc.return_to_base.is_none() {
                if let Some(col) = return_col {
                    acc.return_to_base = table.cell(i, col).map(str::to_string);
                }
            }
        }

        // Daily rows grouped per team, each block followed by its summary row.
        let mut rows: Vec<AveragesRow> = Vec::new();
        let mut team_block: Vec<AveragesRow> = Vec::new();
        let mut current_team: Option<String> = None;
        for ((team, date), acc) in groups {
            if current_team.as_deref() != Some(team.as_str()) {
                flush_team(&mut rows, &mut team_block);
                current_team = Some(team.clone());
            }
            let means = acc
                .sums
                .iter()
                .zip(&acc.counts)
                .map(|(sum, count)| (*count > 0).then(|| round2(sum / *count as f64)))
                .collect();
            team_block.push(AveragesRow {
                team,
                date: Some(date),
                is_summary: false,
                means,
                order_count: acc.orders,
                return_to_base: acc.return_to_base,
            });
        }
        flush_team(&mut rows, &mut team_block);

        let team_count = rows.iter().filter(|r| r.is_summary).count();
        info!(
            "{record_type}: {} teams, {} daily rows, {} total rows",
            team_count,
            rows.len() - team_count,
            rows.len()
        );

        Some(AveragesTable {
            team_header: team_col.to_string(),
            metric_columns,
            has_return_to_base: return_col.is_some(),
            rows,
        })
    }
}

/// Close out one team's block: append its daily rows plus the synthesized
/// summary row (mean of the daily means, dropping missing; summed counts).
fn flush_team(rows: &mut Vec<AveragesRow>, block: &mut Vec<AveragesRow>) {
    if block.is_empty() {
        return;
    }
    let team = block[0].team.clone();
    let metric_count = block[0].means.len();

    let mut means = Vec::with_capacity(metric_count);
    for m in 0..metric_count {
        let daily: Vec<f64> = block.iter().filter_map(|r| r.means[m]).collect();
        means.push(if daily.is_empty() {
            None
        } else {
            Some(round2(daily.iter().sum::<f64>() / daily.len() as f64))
        });
    }
    let order_count = block.iter().map(|r| r.order_count).sum();

    // Overall return-to-base is the mean of the numeric daily values.
    let returns: Vec<f64> = block
        .iter()
        .filter_map(|r| parse_minutes(r.return_to_base.as_deref()))
        .collect();
    let return_to_base = if returns.is_empty() {
        None
    } else {
        Some(crate::temporal::fmt2(round2(
            returns.iter().sum::<f64>() / returns.len() as f64,
        )))
    };

    debug!("team {team}: {} days processed", block.len());

    rows.append(block);
    rows.push(AveragesRow {
        team,
        date: None,
        is_summary: true,
        means,
        order_count,
        return_to_base,
    });
}
