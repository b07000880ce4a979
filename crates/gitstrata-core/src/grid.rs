//! Checkpoint calendar for the mining grid

use crate::date::Date;

/// An immutable array of checkpoint dates on a monthly cadence.
///
/// Built once from an anchor (year, month) and a count, then passed into
/// the orchestrator as explicit configuration. The run's time window is
/// an input, never ambient process state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointGrid {
    checkpoints: Vec<Date>,
}

impl CheckpointGrid {
    /// One checkpoint per month starting at the first day of
    /// `anchor_month`/`anchor_year`, rolling over year boundaries.
    pub fn monthly(anchor_year: i32, anchor_month: u32, count: usize) -> Self {
        let mut checkpoints = Vec::with_capacity(count);
        let mut year = anchor_year;
        let mut month = anchor_month;
        for _ in 0..count {
            checkpoints.push(Date::at_midnight(year, month, 1));
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        Self { checkpoints }
    }

    /// The checkpoints in calendar order.
    pub fn checkpoints(&self) -> &[Date] {
        &self.checkpoints
    }

    /// Number of checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_cadence() {
        let grid = CheckpointGrid::monthly(2020, 4, 3);
        assert_eq!(
            grid.checkpoints(),
            &[
                Date::at_midnight(2020, 4, 1),
                Date::at_midnight(2020, 5, 1),
                Date::at_midnight(2020, 6, 1),
            ]
        );
    }

    #[test]
    fn test_year_rollover() {
        let grid = CheckpointGrid::monthly(2020, 11, 4);
        assert_eq!(
            grid.checkpoints(),
            &[
                Date::at_midnight(2020, 11, 1),
                Date::at_midnight(2020, 12, 1),
                Date::at_midnight(2021, 1, 1),
                Date::at_midnight(2021, 2, 1),
            ]
        );
    }

    #[test]
    fn test_checkpoints_are_strictly_increasing() {
        let grid = CheckpointGrid::monthly(2020, 4, 31);
        assert_eq!(grid.len(), 31);
        for pair in grid.checkpoints().windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
