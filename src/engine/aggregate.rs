use std::collections::BTreeSet;
use tracing::debug;

use crate::rules::RuleSet;
use crate::season::{Driver, RaceResult};

/// Upper bound of carried success ballast, in kg.
pub const MAX_BALLAST_KG: i64 = 45;

/// First-race value used when a driver has no result in their current class.
const NO_CURRENT_CLASS_RACE: u32 = 999;

/// Season points, applying the class-swap rule.
///
/// A driver who changed class keeps every point only if their first race in
/// the current class was at or before `grace_round`; a later change counts
/// only current-class results.
pub fn total_points(driver: &Driver, grace_round: u32) -> u32 {
    let current = driver.current_class.as_str();
    let classes: BTreeSet<&str> = driver
        .race_results
        .iter()
        .map(|r| r.class_or(current))
        .collect();

    let in_current = |r: &&RaceResult| r.class_or(current) == current;

    if classes.len() > 1 {
        let first_race = driver
            .race_results
            .iter()
            .filter(in_current)
            .filter_map(|r| r.race_id)
            .min()
            .unwrap_or(NO_CURRENT_CLASS_RACE);

        if first_race > grace_round {
            debug!(
                driver = %driver.name,
                class = current,
                first_race,
                "late class swap, counting current-class points only"
            );
            return sum_points(driver.race_results.iter().filter(in_current));
        }
        debug!(driver = %driver.name, first_race, "early class swap, keeping all points");
    }

    sum_points(driver.race_results.iter())
}

/// Stored points can be arbitrarily large on unclassified results; cap instead of overflowing.
fn sum_points<'a, I>(results: I) -> u32
where
    I: Iterator<Item = &'a RaceResult>,
{
    results.fold(0u32, |total, r| total.saturating_add(r.points))
}

/// Running ballast from 0, clamped to [0, MAX_BALLAST_KG] after every step.
pub fn running_ballast<I>(deltas: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    deltas
        .into_iter()
        .fold(0, |ballast, delta| {
            ballast.saturating_add(delta).clamp(0, MAX_BALLAST_KG)
        })
}

/// Ballast carried into the next race, walking results in race order.
pub fn current_ballast(results: &[RaceResult]) -> u32 {
    let mut ordered: Vec<&RaceResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.race_id);
    let ballast = running_ballast(ordered.iter().map(|r| r.ballast_change));
    // clamped to [0, 45] above
    ballast as u32
}

/// Fill in a driver's `totalPoints` and `currentBallast`.
pub fn aggregate_driver(driver: &mut Driver, rules: &RuleSet) {
    driver.total_points = total_points(driver, rules.swap_grace_round);
    driver.current_ballast = current_ballast(&driver.race_results);
}
