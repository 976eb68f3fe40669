// Entry point and CLI flow.
//
// Runs the whole pipeline once: load the dispatch export, derive the
// per-order metrics, split by status, aggregate per team/day, write the
// CSV outputs, then the markdown report and the run-summary JSON.
mod aggregator;
mod calculator;
mod classifier;
mod columns;
mod config;
mod error;
mod loader;
mod output;
mod pipeline;
mod report;
mod table;
mod temporal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use num_format::{Locale, ToFormattedString};
use tracing::error;
use tracing_subscriber::EnvFilter;

use config::Settings;
use pipeline::{Pipeline, ProcessingResult};
use report::ReportGenerator;

#[derive(Parser, Debug)]
#[command(
    name = "desloc_report",
    about = "Field-team dispatch metrics: per-order calculation, per-team/day averages and analysis report"
)]
struct Cli {
    /// Input CSV file (defaults to deslocamento.csv in the current directory)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for generated files
    #[arg(short, long, default_value = "result")]
    output_dir: PathBuf,

    /// Skip the markdown analysis report
    #[arg(long)]
    no_report: bool,
}

fn format_count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}

fn print_summary(result: &ProcessingResult) {
    println!("==================================================");
    println!("PROCESSING SUMMARY");
    println!("==================================================");
    println!("Total records:        {}", format_count(result.total_records));
    println!(
        "Productive records:   {}",
        format_count(result.productive_records)
    );
    println!(
        "Unproductive records: {}",
        format_count(result.unproductive_records)
    );
    println!("Teams analysed:       {}", format_count(result.total_teams));
    if !result.processing_errors.is_empty() {
        println!("Warnings:");
        for e in &result.processing_errors {
            println!("  - {e}");
        }
    }
    println!("==================================================\n");
}

fn run(cli: Cli) -> Result<(), error::PipelineError> {
    let settings = Settings::default().with_output_dir(&cli.output_dir);
    let input = cli
        .input
        .unwrap_or_else(|| PathBuf::from(&settings.files.input));

    let result = Pipeline::new(&settings).run(&input)?;

    if let Some(averages) = result.productive_averages.as_ref() {
        println!("Productive averages (per team/day):");
        output::preview_averages(averages, 10);
    }
    if let Some(averages) = result.unproductive_averages.as_ref() {
        println!("Unproductive averages (per team/day):");
        output::preview_averages(averages, 10);
    }

    if !cli.no_report {
        ReportGenerator::new(&settings).generate(&result)?;
    }
    output::write_json(
        &settings.output_path(&settings.files.summary),
        &result.summary(),
    )?;

    print_summary(&result);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("==================================================");
    println!("DISPATCH DATA PROCESSING");
    println!("==================================================\n");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
