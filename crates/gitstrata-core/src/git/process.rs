//! Shared git subprocess invocation

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Run `git <args>` with the given working directory, capturing both
/// output streams. Spawn failure (git missing, directory gone) is an
/// error; a non-zero exit status is not — callers decide what a failed
/// invocation means for them.
pub fn run_git(workdir: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .map_err(|e| {
            Error::Git(format!(
                "failed to run git {} in {}: {}",
                args.join(" "),
                workdir.display(),
                e
            ))
        })
}

/// Run `git <args>` and require a zero exit status, returning stdout as
/// a lossily-decoded string. Used for invocations whose failure is not
/// an expected outcome (anything other than checkout and fetch).
pub fn run_git_checked(workdir: &Path, args: &[&str]) -> Result<String> {
    let output = run_git(workdir, args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git(format!(
            "git {} failed in {}: {}",
            args.join(" "),
            workdir.display(),
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
