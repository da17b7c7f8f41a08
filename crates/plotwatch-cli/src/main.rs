use std::path::PathBuf;

use clap::{Parser, Subcommand};

use plotwatch_core::{CalculatorConfig, PlotReport, RiskWeights, ToleranceTable};
use plotwatch_engine::{BatchEvaluator, ComplianceCalculator, RiskScorer};
use plotwatch_store::JsonStore;

mod display;

#[derive(Parser)]
#[command(name = "plotwatch", version, about = "Boundary compliance and encroachment detection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every plot of a region file and print the results.
    Evaluate {
        /// Region data file (JSON).
        #[arg(long)]
        input: PathBuf,
        /// Region identifier inside the file.
        #[arg(long)]
        region: String,
        /// Override the observation source named in the file.
        #[arg(long)]
        source: Option<String>,
        /// Evaluate plots across worker threads.
        #[arg(long)]
        parallel: bool,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// List the configured tolerance table.
    Sources,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("plotwatch v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Evaluate {
            input,
            region,
            source,
            parallel,
            json,
        } => evaluate(input, &region, source.as_deref(), parallel, json),
        Command::Sources => {
            display::print_tolerances(&ToleranceTable::default());
            Ok(())
        }
    }
}

fn evaluate(
    input: PathBuf,
    region: &str,
    source: Option<&str>,
    parallel: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = JsonStore::load(&input)?;
    if let Some(source) = source {
        store.override_source(source);
    }

    let evaluator = BatchEvaluator::new(
        ComplianceCalculator::new(CalculatorConfig::default())?,
        RiskScorer::new(RiskWeights::default())?,
        ToleranceTable::default(),
    );

    let reports: Vec<PlotReport> = if parallel {
        evaluator.evaluate_region_parallel(&store, region)?
    } else {
        evaluator.evaluate_region(&store, region)?.collect()
    };
    let summary = evaluator.summarize(region, &reports);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "reports": reports,
                "summary": summary,
            }))?
        );
    } else {
        for report in &reports {
            display::print_report_line(report);
        }
        display::print_summary(&summary);
    }
    Ok(())
}
