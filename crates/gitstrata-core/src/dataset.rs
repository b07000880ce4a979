//! Checkpoint-grid orchestration and fault-tolerant aggregation

use rayon::prelude::*;

use crate::commit::CommitInfo;
use crate::config::MiningConfig;
use crate::date::Date;
use crate::error::{Error, Result};
use crate::git::{CheckoutOutcome, RepoManager};
use crate::matrix::MetricsMatrix;
use crate::metric::Metric;

/// One entry of a date-window trace: a commit that was individually
/// checked out and measured, with no carry-forward between entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSample {
    /// Commit date
    pub date: Date,
    /// Commit id, lowercase hex
    pub id: String,
    /// What happened when this commit was evaluated
    pub outcome: SampleOutcome,
}

/// Per-commit evaluation outcome in a date-window trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The metric was evaluated on the checked-out tree
    Measured(u64),
    /// The checkout itself failed
    CheckoutFailed(String),
    /// The checkout landed but the collaborator failed
    MetricFailed(String),
}

impl std::fmt::Display for CommitSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            SampleOutcome::Measured(v) => write!(f, "{} {} {}", self.date, self.id, v),
            SampleOutcome::CheckoutFailed(_) => {
                write!(f, "{} {} checkout failed", self.date, self.id)
            }
            SampleOutcome::MetricFailed(detail) => {
                write!(f, "{} {} metric failed: {}", self.date, self.id, detail)
            }
        }
    }
}

/// Orchestrator that owns one [`RepoManager`] per roster entry and
/// sweeps the checkpoint grid over all of them.
#[derive(Debug)]
pub struct DatasetManager {
    config: MiningConfig,
    managers: Vec<RepoManager>,
}

impl DatasetManager {
    /// Bind one manager per roster entry, walking each repository's
    /// history eagerly. A roster member that cannot even be inspected is
    /// a setup error; the returned error names every such repository
    /// rather than the first one found.
    pub fn new(config: MiningConfig) -> Result<Self> {
        let mut managers = Vec::with_capacity(config.roster.len());
        let mut failed = Vec::new();

        for name in &config.roster {
            let workdir = config.repos_root.join(name);
            match RepoManager::new(&workdir, config.horizon) {
                Ok(manager) => managers.push(manager),
                Err(e) => failed.push(format!("{} ({})", name, e)),
            }
        }

        if !failed.is_empty() {
            return Err(Error::Setup(failed));
        }

        Ok(Self { config, managers })
    }

    /// The bound managers, in roster order.
    pub fn managers(&self) -> &[RepoManager] {
        &self.managers
    }

    /// The configuration this run was constructed with.
    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Sweep the checkpoint grid: for every (checkpoint, repository)
    /// cell, resolve the most recent commit not after the checkpoint,
    /// check it out, and evaluate `metric` over the working tree.
    ///
    /// A cell failure (no eligible commit, failed checkout, collaborator
    /// error) never aborts the sweep; it is resolved by the matrix's
    /// carry-forward rule. Rows run in calendar order so carry-forward
    /// reads a completed previous row; within a row, repository cells are
    /// independent working directories and are fanned out across workers.
    /// Checkout and parse for one repository stay ordered because both
    /// happen inside that repository's cell task.
    pub fn sweep<M: Metric>(&self, metric: &M) -> MetricsMatrix {
        let mut matrix = MetricsMatrix::new(self.config.roster.clone(), self.config.grid.len());

        for (i, &checkpoint) in self.config.grid.checkpoints().iter().enumerate() {
            let row: Vec<Option<u64>> = self
                .managers
                .par_iter()
                .map(|manager| Self::eval_cell(manager, checkpoint, metric))
                .collect();
            for (j, value) in row.into_iter().enumerate() {
                matrix.record(i, j, value);
            }
        }

        matrix
    }

    fn eval_cell<M: Metric>(
        manager: &RepoManager,
        checkpoint: Date,
        metric: &M,
    ) -> Option<u64> {
        let commit = match manager.nearest_commit(checkpoint) {
            Some(commit) => commit,
            None => {
                eprintln!(
                    "{}: no commit at or before {}, carrying forward",
                    manager.identity(),
                    checkpoint
                );
                return None;
            }
        };
        match manager.checkout(commit.id()) {
            CheckoutOutcome::Success => {}
            CheckoutOutcome::Failed { .. } => return None,
        }
        match metric.measure(manager.workdir()) {
            Ok(value) => Some(value),
            Err(e) => {
                eprintln!(
                    "{}: metric failed at {} ({}): {}",
                    manager.identity(),
                    checkpoint,
                    commit.id(),
                    e
                );
                None
            }
        }
    }

    /// Full commit trace of a single repository, newest first, without
    /// any checkpoint resolution. Builds an ad-hoc manager so callers do
    /// not need a roster.
    pub fn commit_log<P: AsRef<std::path::Path>>(
        workdir: P,
        horizon: Date,
    ) -> Result<Vec<CommitInfo>> {
        let manager = RepoManager::new(workdir, horizon)?;
        Ok(manager.commit_trace().to_vec())
    }

    /// Evaluate `metric` at every commit of `repository` whose date
    /// falls within `[since, until)`, newest first.
    ///
    /// This bypasses the grid's monthly granularity and carry-forward
    /// entirely: every eligible commit is checked out and measured
    /// independently, and failures are reported per commit.
    pub fn trace_window<M: Metric>(
        &self,
        repository: &str,
        since: Date,
        until: Date,
        metric: &M,
    ) -> Result<Vec<CommitSample>> {
        let manager = self
            .managers
            .iter()
            .find(|m| m.identity() == repository)
            .ok_or_else(|| {
                Error::Config(format!("repository '{}' is not in the roster", repository))
            })?;

        let mut samples = Vec::new();
        for commit in manager.commit_trace() {
            let date = commit.date();
            if date < since || date >= until {
                continue;
            }
            let outcome = match manager.checkout(commit.id()) {
                CheckoutOutcome::Failed { detail } => SampleOutcome::CheckoutFailed(detail),
                CheckoutOutcome::Success => match metric.measure(manager.workdir()) {
                    Ok(value) => SampleOutcome::Measured(value),
                    Err(e) => SampleOutcome::MetricFailed(e.to_string()),
                },
            };
            samples.push(CommitSample {
                date,
                id: commit.id().to_string(),
                outcome,
            });
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_display_measured() {
        let sample = CommitSample {
            date: Date::new(2020, 4, 9, 18, 1, 14),
            id: "abc123".to_string(),
            outcome: SampleOutcome::Measured(7),
        };
        assert_eq!(format!("{}", sample), "2020-04-09 18:01:14 abc123 7");
    }

    #[test]
    fn test_sample_display_checkout_failed() {
        let sample = CommitSample {
            date: Date::at_midnight(2020, 4, 9),
            id: "abc123".to_string(),
            outcome: SampleOutcome::CheckoutFailed("bad ref".to_string()),
        };
        assert!(format!("{}", sample).ends_with("checkout failed"));
    }
}
