use serde_json::Value;
use tracing::{debug, warn};

use super::{aggregate, award, classify};
use crate::overrides::{ManualPositions, OverrideTables, PenaltyTable};
use crate::rules::RuleSet;
use crate::season::{CalculationSource, Season};

/// Compute a season's standings.
///
/// Takes ownership of the working copy; clone first to keep the raw season.
/// Every completed race (`id <= currentRound`) is classified once per
/// configured class, points and ballast are assigned per result, and each
/// driver's totals are rebuilt from their full result history. The same
/// inputs always produce the same snapshot.
pub fn calculate_championship(
    mut season: Season,
    tables: &OverrideTables,
    rules: &RuleSet,
    source: CalculationSource,
) -> Season {
    if !rules.excluded_drivers.is_empty() {
        season.drivers.retain(|d| !rules.is_excluded(d.id));
    }

    let completed = season.completed_race_ids();
    debug!(
        completed = completed.len(),
        drivers = season.drivers.len(),
        rules = %rules.name,
        "calculating championship"
    );

    for race_id in completed {
        for class in &rules.classes {
            let placements = classify::classify_race(&mut season, race_id, class, tables);
            for (i, placement) in placements.iter().enumerate() {
                let p = &placement.participant;
                let result = &mut season.drivers[p.driver_idx].race_results[p.result_idx];
                award::assign(result, i + 1, rules);
            }
        }
    }

    for driver in &mut season.drivers {
        aggregate::aggregate_driver(driver, rules);
    }

    season.calculation_source = Some(source);
    season.error = None;
    season
}

/// Compute standings straight from a raw season document.
///
/// Explicit tables replace the ones embedded in the document. A
/// structurally broken document yields the tagged placeholder from
/// [`Season::error_placeholder`], never partial data.
pub fn recalculate(
    raw: Value,
    penalties: Option<PenaltyTable>,
    manual_positions: Option<ManualPositions>,
    rules: &RuleSet,
    source: CalculationSource,
) -> Season {
    match Season::from_value(raw) {
        Ok(season) => {
            let tables = OverrideTables::resolve(&season, penalties, manual_positions);
            calculate_championship(season, &tables, rules, source)
        }
        Err(e) => {
            warn!("cannot calculate championship: {}", e);
            let mut placeholder = Season::error_placeholder(e.to_string());
            placeholder.calculation_source = Some(source);
            placeholder
        }
    }
}
