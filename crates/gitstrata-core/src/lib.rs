//! # gitstrata-core
//!
//! Longitudinal source-code mining over git history.
//!
//! For a fixed roster of repositories and a fixed grid of calendar
//! checkpoints, the engine reconstructs each repository's state as of
//! each checkpoint, evaluates a structural metric over the checked-out
//! tree, and aggregates the results into a repository × checkpoint
//! matrix exported as CSV. Two finer-grained modes exist alongside the
//! grid sweep: dumping one repository's full commit trace, and
//! evaluating the metric at every commit inside a date window.
//!
//! Git history is consumed through the `git` subprocess; its weakly
//! structured textual output is parsed defensively. Any individual
//! checkout may fail, and the sweep keeps producing a complete matrix
//! (carry-forward on failure) instead of aborting.
//!
//! ## Example
//!
//! ```no_run
//! use gitstrata_core::{DatasetManager, MiningConfig};
//!
//! # fn example() -> gitstrata_core::Result<()> {
//! let config = MiningConfig {
//!     roster: vec!["alpha".to_string(), "beta".to_string()],
//!     ..Default::default()
//! };
//! let dataset = DatasetManager::new(config)?;
//! let files = |dir: &std::path::Path| -> gitstrata_core::Result<u64> {
//!     Ok(std::fs::read_dir(dir)?.count() as u64)
//! };
//! let matrix = dataset.sweep(&files);
//! matrix.write_csv(std::path::Path::new("report.csv"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod commit;
pub mod config;
pub mod dataset;
pub mod date;
pub mod error;
pub mod git;
pub mod grid;
pub mod matrix;
pub mod metric;

pub use commit::CommitInfo;
pub use config::MiningConfig;
pub use dataset::{CommitSample, DatasetManager, SampleOutcome};
pub use date::Date;
pub use error::{Error, ErrorKind, Result};
pub use git::{CheckoutOutcome, RepoManager};
pub use grid::CheckpointGrid;
pub use matrix::MetricsMatrix;
pub use metric::{count_matching, DeclCountMetric, DeclKind, Declaration, Metric, ProjectParser};

#[cfg(test)]
mod tests {
    #[test]
    fn test_library_version() {
        // Smoke test to ensure library compiles
        let _ = env!("CARGO_PKG_VERSION");
    }
}
