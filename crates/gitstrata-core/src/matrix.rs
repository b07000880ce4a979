//! Repository × checkpoint metrics matrix and its CSV artifact

use std::path::Path;

use crate::error::{Error, Result};

/// 2-D array of nullable counts indexed `[checkpoint][repository]`.
///
/// A `None` cell can only occur in row 0; for later rows a failed cell
/// inherits the previous row's value (carry-forward), so the matrix is
/// fully populated when a sweep completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsMatrix {
    cells: Vec<Vec<Option<u64>>>,
    repositories: Vec<String>,
}

impl MetricsMatrix {
    /// An all-`None` matrix for the given roster and checkpoint count.
    pub fn new(repositories: Vec<String>, checkpoints: usize) -> Self {
        let cells = vec![vec![None; repositories.len()]; checkpoints];
        Self {
            cells,
            repositories,
        }
    }

    /// Record a freshly computed value, or apply the carry-forward rule
    /// when the cell's checkout failed (`value` is `None`): row 0 stays
    /// empty, later rows inherit the previous row's value.
    ///
    /// # Panics
    ///
    /// Panics if `checkpoint` or `repository` is outside the dimensions
    /// the matrix was constructed with.
    pub fn record(&mut self, checkpoint: usize, repository: usize, value: Option<u64>) {
        self.cells[checkpoint][repository] = match value {
            Some(v) => Some(v),
            None if checkpoint == 0 => None,
            None => self.cells[checkpoint - 1][repository],
        };
    }

    /// Cell accessor.
    ///
    /// # Panics
    ///
    /// Panics if `checkpoint` or `repository` is outside the dimensions
    /// the matrix was constructed with.
    pub fn get(&self, checkpoint: usize, repository: usize) -> Option<u64> {
        self.cells[checkpoint][repository]
    }

    /// Row order of the report: the roster.
    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Number of checkpoint rows.
    pub fn checkpoints(&self) -> usize {
        self.cells.len()
    }

    /// Serialize as CSV: one line per repository, identity first, then
    /// one field per checkpoint in calendar order, blank for `None`.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (j, repo) in self.repositories.iter().enumerate() {
            out.push_str(repo);
            for row in &self.cells {
                out.push(',');
                if let Some(v) = row[j] {
                    out.push_str(&v.to_string());
                }
            }
            out.push('\n');
        }
        out
    }

    /// Write the CSV artifact to `path`.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv())
            .map_err(|e| Error::Report(format!("cannot write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_carry_forward_on_later_failure() {
        let mut m = MetricsMatrix::new(roster(&["repo"]), 2);
        m.record(0, 0, Some(5));
        m.record(1, 0, None);
        assert_eq!(m.get(0, 0), Some(5));
        assert_eq!(m.get(1, 0), Some(5));
    }

    #[test]
    fn test_first_row_failure_stays_null() {
        let mut m = MetricsMatrix::new(roster(&["repo"]), 2);
        m.record(0, 0, None);
        m.record(1, 0, None);
        assert_eq!(m.get(0, 0), None);
        assert_eq!(m.get(1, 0), None);
    }

    #[test]
    fn test_fresh_value_overrides_carry() {
        let mut m = MetricsMatrix::new(roster(&["repo"]), 3);
        m.record(0, 0, Some(2));
        m.record(1, 0, None);
        m.record(2, 0, Some(7));
        assert_eq!(m.get(1, 0), Some(2));
        assert_eq!(m.get(2, 0), Some(7));
    }

    #[test]
    fn test_failure_is_isolated_to_one_column() {
        let mut m = MetricsMatrix::new(roster(&["a", "b"]), 2);
        m.record(0, 0, Some(1));
        m.record(0, 1, Some(10));
        m.record(1, 0, None);
        m.record(1, 1, Some(11));
        assert_eq!(m.get(1, 0), Some(1));
        assert_eq!(m.get(1, 1), Some(11));
    }

    #[test]
    #[should_panic]
    fn test_get_panics_out_of_range() {
        let m = MetricsMatrix::new(roster(&["repo"]), 2);
        let _ = m.get(2, 0);
    }

    #[test]
    #[should_panic]
    fn test_record_panics_out_of_range() {
        let mut m = MetricsMatrix::new(roster(&["repo"]), 2);
        m.record(0, 1, Some(1));
    }

    #[test]
    fn test_csv_shape() {
        let mut m = MetricsMatrix::new(roster(&["alpha", "beta"]), 3);
        for i in 0..3 {
            m.record(i, 0, Some(i as u64));
            m.record(i, 1, Some(10 + i as u64));
        }
        let csv = m.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.split(',').count(), 4); // identity + 3 checkpoints
        }
        assert_eq!(lines[0], "alpha,0,1,2");
        assert_eq!(lines[1], "beta,10,11,12");
    }

    #[test]
    fn test_csv_blank_for_null_cells() {
        let mut m = MetricsMatrix::new(roster(&["repo"]), 2);
        m.record(0, 0, None);
        m.record(1, 0, Some(3));
        assert_eq!(m.to_csv(), "repo,,3\n");
    }

    #[test]
    fn test_write_csv_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        let mut m = MetricsMatrix::new(roster(&["repo"]), 1);
        m.record(0, 0, Some(9));
        m.write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "repo,9\n");
    }
}
