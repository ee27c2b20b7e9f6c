use crate::rules::RuleSet;
use crate::season::RaceResult;

/// Championship points for a classified result. Zero-lap entries never score.
pub fn points_for(rank: usize, laps: i64, rules: &RuleSet) -> u32 {
    if laps <= 0 {
        return 0;
    }
    rules.points.points_for(rank)
}

/// Ballast delta for a classified result.
///
/// Only results with a finished status earn the rank's table entry.
pub fn ballast_for(rank: usize, status: Option<&str>, rules: &RuleSet) -> i64 {
    rules.ballast.delta_for(rank, rules.is_finished(status))
}

/// Set `points` and `ballastChange` on a result classified at `rank` (1-based).
pub fn assign(result: &mut RaceResult, rank: usize, rules: &RuleSet) {
    result.points = points_for(rank, result.laps, rules);
    result.ballast_change = ballast_for(rank, result.status.as_deref(), rules);
}
