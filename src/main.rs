//! @ai:module:intent CLI for aggregating and charting per-operator benchmark metrics
//! @ai:module:layer presentation
//! @ai:module:depends_on pipeline, report, config

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use opbench::{
    config::AnalysisConfig,
    metrics::{Comparison, RankedRow},
    pipeline::{AnalysisPipeline, FineReport, SingleRunReport},
    report::{ChartData, ChartJob, ReportGenerator},
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "opbench")]
#[command(about = "Aggregate per-operator perf CSVs and chart them within and across runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chart the total metric of each operator type in one run
    Totals {
        /// Path to the timings directory
        #[arg(long, default_value = "output/timings")]
        timings_dir: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Chart the average metric of each operator, one chart per operator type
    Operators {
        /// Path to the timings directory
        #[arg(long, default_value = "output/timings")]
        timings_dir: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compare summed operator-type totals between two benchmark outputs
    CompareTypes {
        #[command(flatten)]
        datasets: DatasetArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compare individual operators within each operator type between two benchmark outputs
    CompareOperators {
        #[command(flatten)]
        datasets: DatasetArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "opbench.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metric column to analyze (e.g. 'task-clock', 'cycles', 'instructions')
    #[arg(long)]
    metric: Option<String>,

    /// Folder to save generated graphs
    #[arg(long)]
    graphs_dir: Option<PathBuf>,

    /// Skip the JSON file written next to each chart
    #[arg(long)]
    no_json: bool,
}

#[derive(Args)]
struct DatasetArgs {
    /// First benchmark output directory (contains 'timings')
    #[arg(long = "output-dir1")]
    first: PathBuf,

    /// Second benchmark output directory (contains 'timings')
    #[arg(long = "output-dir2")]
    second: PathBuf,

    /// Labels for the two datasets
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    labels: Option<Vec<String>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    }
}

/// @ai:intent Install the tracing subscriber
/// @ai:effects io
fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opbench=info".parse()?),
        )
        .init();
    Ok(())
}

/// @ai:intent Dispatch a parsed command
/// @ai:effects fs:read, fs:write
fn run(cli: Cli) -> Result<ExitCode> {
    init_tracing()?;

    match cli.command {
        Commands::Totals {
            timings_dir,
            common,
        } => {
            let config = resolve_config(&common, None)?;
            let report = AnalysisPipeline::new(&config).operator_type_totals(&timings_dir)?;
            finish_single_run(&config, &timings_dir, &report)
        }
        Commands::Operators {
            timings_dir,
            common,
        } => {
            let config = resolve_config(&common, None)?;
            let report = AnalysisPipeline::new(&config).operators_by_type(&timings_dir)?;
            finish_single_run(&config, &timings_dir, &report)
        }
        Commands::CompareTypes { datasets, common } => {
            let config = resolve_config(&common, datasets.labels.as_deref())?;
            let job = AnalysisPipeline::new(&config)
                .compare_operator_types(&datasets.first, &datasets.second)?;

            if let ChartData::Comparison(ref comparison) = job.data {
                print_comparison(&config, comparison);
            }

            ReportGenerator::new(config.output.write_json).generate(&job)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CompareOperators { datasets, common } => {
            let config = resolve_config(&common, datasets.labels.as_deref())?;
            let report = AnalysisPipeline::new(&config)
                .compare_operators(&datasets.first, &datasets.second)?;
            finish_fine(&config, &report)
        }
        Commands::Init { output } => {
            AnalysisConfig::default().save(&output)?;
            println!("Configuration saved to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// @ai:intent Load configuration and apply command-line overrides
/// @ai:effects fs:read
fn resolve_config(common: &CommonArgs, labels: Option<&[String]>) -> Result<AnalysisConfig> {
    let mut config = load_or_default_config(common.config.clone())?;

    if let Some(metric) = &common.metric {
        config.analysis.metric = metric.clone();
    }

    if let Some(graphs_dir) = &common.graphs_dir {
        config.output.graphs_dir = graphs_dir.clone();
    }

    if common.no_json {
        config.output.write_json = false;
    }

    if let Some([first, second]) = labels {
        config.labels.first = first.clone();
        config.labels.second = second.clone();
    }

    config.validate()?;
    Ok(config)
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => Ok(AnalysisConfig::load(&p)?),
        None => {
            let default_path = PathBuf::from("opbench.toml");

            if default_path.exists() {
                Ok(AnalysisConfig::load(&default_path)?)
            } else {
                Ok(AnalysisConfig::default())
            }
        }
    }
}

/// @ai:intent Print and render a single-run report
/// @ai:effects io, fs:write
fn finish_single_run(
    config: &AnalysisConfig,
    timings_dir: &std::path::Path,
    report: &SingleRunReport,
) -> Result<ExitCode> {
    println!(
        "Loaded {} CSV files from {}",
        report.files_loaded,
        timings_dir.display()
    );

    for job in &report.jobs {
        if let ChartData::Ranking(ref rows) = job.data {
            print_ranking(job, rows);
        }
    }

    ReportGenerator::new(config.output.write_json).generate_all(&report.jobs)?;
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Print, render and summarize the per-operator-type comparison
/// @ai:effects io, fs:write
fn finish_fine(config: &AnalysisConfig, report: &FineReport) -> Result<ExitCode> {
    let reporter = ReportGenerator::new(config.output.write_json);

    for job in &report.jobs {
        if let ChartData::Comparison(ref comparison) = job.data {
            print_comparison(config, comparison);
        }
        reporter.generate(job)?;
    }

    for (op_type, reason) in &report.skipped {
        println!("Skipped {}: {}", op_type, reason);
    }

    println!();
    println!(
        "{} operator types charted, {} skipped",
        report.jobs.len(),
        report.skipped.len()
    );

    if report.jobs.is_empty() {
        eprintln!("Error: no operator type had common operators to compare");
        return Ok(ExitCode::from(4));
    }

    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Print the ordered rows of a comparison
/// @ai:effects io
fn print_comparison(config: &AnalysisConfig, comparison: &Comparison) {
    let (first, second) = config.label_pair();

    println!();
    println!(
        "{} ({})",
        comparison.scope_name(),
        config.analysis.metric
    );
    println!("{}", "=".repeat(64));
    println!("{:<30} {:>16} {:>16}", "Key", first, second);
    println!("{}", "-".repeat(64));

    for row in &comparison.rows {
        println!("{:<30} {:>16.2} {:>16.2}", row.key, row.value_a, row.value_b);
    }

    if comparison.discarded_count() > 0 {
        println!();
        println!(
            "Discarded {} keys: {} only in {}, {} only in {}",
            comparison.discarded_count(),
            comparison.only_in_first.len(),
            first,
            comparison.only_in_second.len(),
            second
        );
    }
}

/// @ai:intent Print the ordered rows of a single-series chart
/// @ai:effects io
fn print_ranking(job: &ChartJob, rows: &[RankedRow]) {
    println!();
    println!("=== {} ===", job.spec.title);

    for row in rows {
        println!("  {:<30} {:>16.2}", row.key, row.value);
    }
}

/// @ai:intent Map failures to distinct process exit codes
/// @ai:effects pure
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<opbench::Error>() {
        Some(opbench::Error::NotFound { .. }) | Some(opbench::Error::MissingLayout { .. }) => {
            ExitCode::from(2)
        }
        Some(opbench::Error::EmptyDataset { .. }) => ExitCode::from(3),
        Some(opbench::Error::NoCommonKeys { .. }) => ExitCode::from(4),
        _ => ExitCode::FAILURE,
    }
}
