use serde::{Deserialize, Serialize};

/// Championship points by finishing rank; index 0 is P1.
///
/// Ranks past the end of the table score nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(Vec<u32>);

impl PointsTable {
    pub fn new(points: Vec<u32>) -> Self {
        Self(points)
    }

    /// 50-47-44-41-38 for the podium and top five, then 35 down to 16 for P6-P25.
    pub fn standard() -> Self {
        let mut points = vec![50, 47, 44, 41, 38];
        points.extend((16..=35).rev());
        Self(points)
    }

    /// Points for a 1-based rank.
    pub fn points_for(&self, rank: usize) -> u32 {
        rank.checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Success ballast deltas (kg) by finishing rank, with a catch-all default.
///
/// `positions[0]` is the delta for P1. Ranks past the listed positions, and
/// any result that did not finish, take `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BallastTable {
    pub positions: Vec<i64>,
    pub default: i64,
}

impl BallastTable {
    /// +15/+10/+5/0/-5/-10 for P1-P6, -15 otherwise.
    pub fn standard() -> Self {
        Self {
            positions: vec![15, 10, 5, 0, -5, -10],
            default: -15,
        }
    }

    /// +45 down to 0 in 5 kg steps for P1-P10, -5 otherwise.
    pub fn heavy() -> Self {
        Self {
            positions: (0..=9).rev().map(|step| step * 5).collect(),
            default: -5,
        }
    }

    /// Delta for a 1-based rank. Non-finishers always take the default.
    pub fn delta_for(&self, rank: usize, finished: bool) -> i64 {
        if !finished {
            return self.default;
        }
        rank.checked_sub(1)
            .and_then(|i| self.positions.get(i))
            .copied()
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_points_table() {
        let table = PointsTable::standard();
        assert_eq!(table.len(), 25);
        assert_eq!(table.points_for(1), 50);
        assert_eq!(table.points_for(2), 47);
        assert_eq!(table.points_for(3), 44);
        assert_eq!(table.points_for(5), 38);
        assert_eq!(table.points_for(6), 35);
        assert_eq!(table.points_for(7), 34);
        assert_eq!(table.points_for(25), 16);
    }

    #[test]
    fn test_points_outside_table() {
        let table = PointsTable::standard();
        assert_eq!(table.points_for(0), 0);
        assert_eq!(table.points_for(26), 0);
        assert_eq!(table.points_for(400), 0);
    }

    #[test]
    fn test_standard_ballast_by_rank() {
        let table = BallastTable::standard();
        assert_eq!(table.delta_for(1, true), 15);
        assert_eq!(table.delta_for(4, true), 0);
        assert_eq!(table.delta_for(6, true), -10);
        assert_eq!(table.delta_for(7, true), -15);
    }

    #[test]
    fn test_ballast_non_finisher_takes_default() {
        let table = BallastTable::standard();
        assert_eq!(table.delta_for(1, false), -15);
    }

    #[test]
    fn test_heavy_ballast_table() {
        let table = BallastTable::heavy();
        assert_eq!(table.positions.len(), 10);
        assert_eq!(table.delta_for(1, true), 45);
        assert_eq!(table.delta_for(2, true), 40);
        assert_eq!(table.delta_for(10, true), 0);
        assert_eq!(table.delta_for(11, true), -5);
    }
}
