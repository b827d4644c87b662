use std::fs;
use std::path::PathBuf;

use clap::Parser;
use gradebook_tools::config::{DEFAULT_OUTPUT, SummaryConfig};
use gradebook_tools::summarize;
use gradebook_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&cli.log_level)?;

    let config = SummaryConfig {
        output: cli.output.clone(),
        ..SummaryConfig::for_directory(cli.dir.clone())
    };

    println!("=== 学生成绩汇总工具 ===");
    let outcome = summarize::run(&config)?;
    print!("{}", outcome.report);

    if let (Some(path), Some(stats)) = (&cli.stats_json, &outcome.stats) {
        fs::write(path, serde_json::to_string_pretty(stats)?)?;
    }

    println!("=== 处理完成 ===");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).map_err(|err| ToolError::Logging(err.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge roster and score spreadsheets into one gradebook summary."
)]
struct Cli {
    /// Directory holding the roster and score files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Path of the merged workbook.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Optional path for the statistics as JSON.
    #[arg(long)]
    stats_json: Option<PathBuf>,

    /// Log filter, e.g. `info` or `gradebook_tools=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}
