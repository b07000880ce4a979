//! Per-repository history walker and checkout orchestration

use std::path::{Path, PathBuf};

use crate::commit::CommitInfo;
use crate::date::Date;
use crate::error::{Error, Result};
use crate::git::log::parse_commit_record;
use crate::git::process::{run_git, run_git_checked};

/// Outcome of a checkout attempt.
///
/// Checkout failure is an expected, recoverable condition at this layer,
/// so it is data rather than an error: the structured reason travels with
/// the outcome instead of living only in a log side channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The working directory now reflects the requested ref.
    Success,
    /// The underlying tool exited non-zero; `detail` is its drained stderr.
    Failed {
        /// Diagnostics drained from the git subprocess
        detail: String,
    },
}

impl CheckoutOutcome {
    /// Whether the checkout landed.
    pub fn is_success(&self) -> bool {
        matches!(self, CheckoutOutcome::Success)
    }
}

/// History walker bound to one working directory.
///
/// Construction eagerly discovers the repository's default branch,
/// force-checks it out, and walks the commit history backward from HEAD
/// until the horizon. The resulting trace is cached for the manager's
/// lifetime; it is not refreshed if the underlying repository advances.
#[derive(Debug)]
pub struct RepoManager {
    workdir: PathBuf,
    identity: String,
    trace: Vec<CommitInfo>,
}

impl RepoManager {
    /// Open the repository at `workdir` and walk its history back to
    /// `horizon`. Fails if the directory is not a git checkout, the
    /// default branch cannot be discovered, or any commit record cannot
    /// be decoded.
    pub fn new<P: AsRef<Path>>(workdir: P, horizon: Date) -> Result<Self> {
        let workdir = workdir.as_ref().to_path_buf();
        // Verify the directory is a repository before shelling out
        let _repo = git2::Repository::open(&workdir)?;

        let identity = workdir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Config(format!(
                    "repository path has no directory name: {}",
                    workdir.display()
                ))
            })?;

        let branch = discover_default_branch(&workdir)?;
        let output = run_git(&workdir, &["checkout", "-f", &branch])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "cannot check out default branch '{}' of {}: {}",
                branch,
                identity,
                stderr.trim()
            )));
        }

        let trace = walk_history(&workdir, horizon)?;

        Ok(Self {
            workdir,
            identity,
            trace,
        })
    }

    /// The repository's identity: its directory name under the
    /// repositories root.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The working directory this manager owns.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// The cached commit trace, newest first, bounded by the horizon.
    pub fn commit_trace(&self) -> &[CommitInfo] {
        &self.trace
    }

    /// The most recent commit whose date is not after `checkpoint`, or
    /// `None` when the checkpoint predates the entire observed history.
    pub fn nearest_commit(&self, checkpoint: Date) -> Option<&CommitInfo> {
        // Trace is newest-first, so the first hit is the most recent
        self.trace.iter().find(|c| c.date() <= checkpoint)
    }

    /// Force-checkout the given commit id. Never an error: a non-zero
    /// exit is drained into the outcome and surfaced on stderr.
    pub fn checkout(&self, id: &str) -> CheckoutOutcome {
        let output = match run_git(&self.workdir, &["checkout", "-f", id]) {
            Ok(output) => output,
            Err(e) => {
                eprintln!("checkout of {} in {} failed: {}", id, self.identity, e);
                return CheckoutOutcome::Failed {
                    detail: e.to_string(),
                };
            }
        };
        if output.status.success() {
            CheckoutOutcome::Success
        } else {
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            eprintln!("checkout of {} in {} failed: {}", id, self.identity, detail);
            CheckoutOutcome::Failed { detail }
        }
    }

    /// Best-effort remote update. Failure is logged, never fatal.
    pub fn fetch(&self) {
        match run_git(&self.workdir, &["fetch"]) {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                eprintln!("git fetch failed in {}: {}", self.identity, stderr.trim());
            }
            Err(e) => eprintln!("git fetch failed in {}: {}", self.identity, e),
        }
    }

    /// Paths that differ between the checked-out commit and its parent.
    pub fn changed_files(&self) -> Result<Vec<String>> {
        let stdout = run_git_checked(&self.workdir, &["diff", "--name-only", "HEAD~"])?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Ask the remote for the default branch: the first line of
/// `git remote show origin` that begins `HEAD branch:`.
fn discover_default_branch(workdir: &Path) -> Result<String> {
    let stdout = run_git_checked(workdir, &["remote", "show", "origin"])?;
    stdout
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("HEAD branch:"))
        .map(|branch| branch.trim().to_string())
        .filter(|branch| !branch.is_empty())
        .ok_or_else(|| {
            Error::Git(format!(
                "no 'HEAD branch:' line in remote show output for {}",
                workdir.display()
            ))
        })
}

/// Walk backward from HEAD one ancestor at a time, decoding each commit
/// record, until a commit predates the horizon or no further ancestor
/// exists. The walk is strictly sequential: each step's refspec depends
/// on how many commits have already been consumed.
fn walk_history(workdir: &Path, horizon: Date) -> Result<Vec<CommitInfo>> {
    let mut trace = Vec::new();
    for offset in 0.. {
        let refspec = if offset == 0 {
            "HEAD".to_string()
        } else {
            format!("HEAD~{}", offset)
        };
        let output = run_git(workdir, &["show", "--no-patch", &refspec])?;
        if !output.status.success() {
            if offset == 0 {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(Error::Git(format!(
                    "cannot show HEAD in {}: {}",
                    workdir.display(),
                    stderr.trim()
                )));
            }
            // No further ancestor — the true first commit was reached
            break;
        }
        let record = String::from_utf8_lossy(&output.stdout);
        let info = parse_commit_record(&record)?;
        if info.date() < horizon {
            break;
        }
        trace.push(info);
    }
    Ok(trace)
}
