// Pipeline orchestration.
//
// Load → calculate → save → split by status → aggregate each subset → save.
// Per-row and per-group problems degrade into missing cells inside the
// stages; a failed save is recorded and the run continues. Only the input
// file itself aborts a run.
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use crate::aggregator::{Aggregator, AveragesTable};
use crate::calculator::Calculator;
use crate::classifier::split_by_status;
use crate::columns::ColumnKey;
use crate::config::Settings;
use crate::error::PipelineError;
use crate::loader;
use crate::output;
use crate::table::Table;

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct ProcessingResult {
    pub calculated: Option<Table>,
    pub productive_averages: Option<AveragesTable>,
    pub unproductive_averages: Option<AveragesTable>,
    pub total_records: usize,
    pub productive_records: usize,
    pub unproductive_records: usize,
    pub total_teams: usize,
    pub processing_errors: Vec<String>,
    pub success: bool,
    pub message: String,
}

impl ProcessingResult {
    pub fn has_productive_data(&self) -> bool {
        self.productive_averages
            .as_ref()
            .map(|a| !a.rows.is_empty())
            .unwrap_or(false)
    }

    pub fn has_unproductive_data(&self) -> bool {
        self.unproductive_averages
            .as_ref()
            .map(|a| !a.rows.is_empty())
            .unwrap_or(false)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_records: self.total_records,
            productive_records: self.productive_records,
            unproductive_records: self.unproductive_records,
            total_teams: self.total_teams,
            success: self.success,
            message: self.message.clone(),
            errors: self.processing_errors.clone(),
        }
    }
}

/// Serializable run summary written next to the CSV outputs.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub productive_records: usize,
    pub unproductive_records: usize,
    pub total_teams: usize,
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
}

pub struct Pipeline<'a> {
    settings: &'a Settings,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn run(&self, input: &Path) -> Result<ProcessingResult, PipelineError> {
        let mut result = ProcessingResult::default();

        fs::create_dir_all(&self.settings.paths.output_dir).map_err(|source| {
            PipelineError::Write {
                path: self.settings.paths.output_dir.clone(),
                source,
            }
        })?;

        info!("STEP 1: loading data");
        let loaded = loader::load(input, self.settings)?;
        result.total_records = loaded.report.total_rows;
        if loaded.report.parse_errors > 0 {
            result
                .processing_errors
                .push(format!("{} rows skipped on parse", loaded.report.parse_errors));
        }

        info!("STEP 2: calculating metrics");
        let calculated = Calculator::new(self.settings).process(&loaded.table, &loaded.columns);
        self.save_table(
            &calculated,
            &self.settings.files.calculated,
            "calculated data",
            &mut result.processing_errors,
        );

        info!("STEP 3: splitting by status");
        let (productive, unproductive) = split_by_status(&calculated, &loaded.columns);
        result.productive_records = productive.row_count();
        result.unproductive_records = unproductive.row_count();

        let aggregator = Aggregator::new(self.settings);

        info!("STEP 4: aggregating productive records");
        if !productive.is_empty() {
            if let Some(averages) = aggregator.aggregate(&productive, &loaded.columns, "produtivas")
            {
                self.save_averages(
                    &averages,
                    &self.settings.files.productive_averages,
                    "productive averages",
                    &mut result.processing_errors,
                );
                result.productive_averages = Some(averages);
            }
        }

        info!("STEP 5: aggregating unproductive records");
        if !unproductive.is_empty() {
            if let Some(averages) =
                aggregator.aggregate(&unproductive, &loaded.columns, "improdutivas")
            {
                self.save_averages(
                    &averages,
                    &self.settings.files.unproductive_averages,
                    "unproductive averages",
                    &mut result.processing_errors,
                );
                result.unproductive_averages = Some(averages);
            }
        }

        result.total_teams = count_teams(&calculated, &loaded.columns);
        result.calculated = Some(calculated);
        result.success = true;
        result.message = "processing completed successfully".to_string();
        Ok(result)
    }

    fn save_table(
        &self,
        table: &Table,
        file_name: &str,
        description: &str,
        errors: &mut Vec<String>,
    ) {
        let path = self.settings.output_path(file_name);
        match output::write_table_csv(&path, table) {
            Ok(()) => info!("{description} saved to {}", path.display()),
            Err(e) => {
                error!("failed to save {description}: {e}");
                errors.push(e.to_string());
            }
        }
    }

    fn save_averages(
        &self,
        averages: &AveragesTable,
        file_name: &str,
        description: &str,
        errors: &mut Vec<String>,
    ) {
        let path = self.settings.output_path(file_name);
        match output::write_averages_csv(&path, averages) {
            Ok(()) => info!("{description} saved to {}", path.display()),
            Err(e) => {
                error!("failed to save {description}: {e}");
                errors.push(e.to_string());
            }
        }
    }
}

fn count_teams(table: &Table, columns: &crate::columns::ColumnMap) -> usize {
    let Some(team_col) = columns.get(ColumnKey::Equipe) else {
        return 0;
    };
    let teams: HashSet<&str> = (0..table.row_count())
        .filter_map(|i| table.cell(i, team_col))
        .collect();
    teams.len()
}
