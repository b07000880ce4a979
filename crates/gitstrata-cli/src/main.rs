#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::{Path, PathBuf};

use clap::Parser;
use gitstrata_core::{
    CheckpointGrid, DatasetManager, Date, Error, Metric, MiningConfig, Result,
};

#[derive(Parser)]
#[command(name = "gitstrata", version, about = "Longitudinal source-code mining")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sweep the checkpoint grid and write the CSV report
    Sweep(SweepArgs),
    /// Dump one repository's full commit trace, newest first
    Log(LogArgs),
    /// Evaluate the metric at every commit inside a date window
    Trace(TraceArgs),
}

#[derive(clap::Args)]
struct GridArgs {
    /// YAML run configuration; overrides the individual grid flags
    #[arg(long, env = "GITSTRATA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing one checkout per roster entry
    #[arg(long, env = "GITSTRATA_REPOS_ROOT", default_value = "repos")]
    repos_root: PathBuf,

    /// Repository roster (comma-separated directory names)
    #[arg(long, env = "GITSTRATA_REPOS", value_delimiter = ',')]
    repos: Option<Vec<String>>,

    /// First checkpoint year
    #[arg(long, env = "GITSTRATA_ANCHOR_YEAR", default_value_t = 2020)]
    anchor_year: i32,

    /// First checkpoint month (1-12)
    #[arg(long, env = "GITSTRATA_ANCHOR_MONTH", default_value_t = 4)]
    anchor_month: u32,

    /// Number of monthly checkpoints
    #[arg(long, env = "GITSTRATA_CHECKPOINTS", default_value_t = 31)]
    checkpoints: usize,

    /// Oldest date the history walk reaches (YYYY-MM-DD)
    #[arg(long, env = "GITSTRATA_HORIZON", default_value = "2020-01-01")]
    horizon: String,
}

#[derive(clap::Args)]
struct SweepArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// External counter program; invoked with the working directory as
    /// its single argument, must print an integer on stdout
    #[arg(long, env = "GITSTRATA_METRIC_CMD")]
    metric_cmd: String,

    /// Path of the CSV report artifact
    #[arg(long, env = "GITSTRATA_OUTPUT", default_value = "report.csv")]
    output: PathBuf,
}

#[derive(clap::Args)]
struct LogArgs {
    /// Path to the repository working directory
    #[arg(long)]
    repo: PathBuf,

    /// Oldest date the history walk reaches (YYYY-MM-DD)
    #[arg(long, env = "GITSTRATA_HORIZON", default_value = "2020-01-01")]
    horizon: String,
}

#[derive(clap::Args)]
struct TraceArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// Roster entry to trace
    #[arg(long)]
    repo: String,

    /// Window start, inclusive (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    since: String,

    /// Window end, exclusive
    #[arg(long)]
    until: String,

    /// External counter program, as for sweep
    #[arg(long, env = "GITSTRATA_METRIC_CMD")]
    metric_cmd: String,
}

/// Metric backed by an external counter process: the structural parser
/// lives outside this tool, behind a "directory in, integer out"
/// contract.
struct CommandMetric {
    command: String,
}

impl Metric for CommandMetric {
    fn measure(&self, workdir: &Path) -> Result<u64> {
        let output = std::process::Command::new(&self.command)
            .arg(workdir)
            .output()
            .map_err(|e| Error::Metric(format!("failed to run {}: {}", self.command, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Metric(format!(
                "{} failed on {}: {}",
                self.command,
                workdir.display(),
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.trim().parse().map_err(|_| {
            Error::Metric(format!(
                "{} printed '{}', expected an integer",
                self.command,
                stdout.trim()
            ))
        })
    }
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Sweep(args) => run_sweep(args),
        Commands::Log(args) => run_log(args),
        Commands::Trace(args) => run_trace(args),
    };
    std::process::exit(code);
}

/// Build a run configuration from a YAML file when given, falling back
/// to the individual flags. Empty roster entries from env vars are
/// dropped either way.
fn build_config(args: &GridArgs) -> Result<MiningConfig> {
    if let Some(path) = &args.config {
        let content = std::fs::read_to_string(path)?;
        return MiningConfig::from_yaml(&content);
    }
    let roster: Vec<String> = args
        .repos
        .clone()
        .unwrap_or_default()
        .into_iter()
        .filter(|r| !r.trim().is_empty())
        .collect();
    if roster.is_empty() {
        return Err(Error::Config(
            "no repositories given: pass --repos or --config".to_string(),
        ));
    }
    Ok(MiningConfig {
        repos_root: args.repos_root.clone(),
        roster,
        grid: CheckpointGrid::monthly(args.anchor_year, args.anchor_month, args.checkpoints),
        horizon: Date::parse(&args.horizon)?,
    })
}

fn run_sweep(args: SweepArgs) -> i32 {
    let result = (|| -> Result<()> {
        let config = build_config(&args.grid)?;
        let checkpoints = config.grid.len();
        let repositories = config.roster.len();
        let dataset = DatasetManager::new(config)?;
        let metric = CommandMetric {
            command: args.metric_cmd,
        };
        let matrix = dataset.sweep(&metric);
        matrix.write_csv(&args.output)?;
        println!(
            "Wrote {} ({} repositories x {} checkpoints)",
            args.output.display(),
            repositories,
            checkpoints
        );
        Ok(())
    })();
    exit_code(result)
}

fn run_log(args: LogArgs) -> i32 {
    let result = (|| -> Result<()> {
        let horizon = Date::parse(&args.horizon)?;
        let trace = DatasetManager::commit_log(&args.repo, horizon)?;
        for commit in &trace {
            println!("{}", commit);
        }
        Ok(())
    })();
    exit_code(result)
}

fn run_trace(args: TraceArgs) -> i32 {
    let result = (|| -> Result<()> {
        let config = build_config(&args.grid)?;
        let dataset = DatasetManager::new(config)?;
        let metric = CommandMetric {
            command: args.metric_cmd,
        };
        let since = Date::parse(&args.since)?;
        let until = Date::parse(&args.until)?;
        let samples = dataset.trace_window(&args.repo, since, until, &metric)?;
        for sample in &samples {
            println!("{}", sample);
        }
        Ok(())
    })();
    exit_code(result)
}

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
