//! Per-race, per-class classification.
//!
//! Ranking happens in two passes. The natural pass orders cars by laps,
//! then by the simulator's own order or by penalised time. The override
//! pass then moves cars an administrator has pinned to a position.

use std::cmp::Ordering;
use tracing::debug;

use super::timing;
use crate::overrides::OverrideTables;
use crate::season::Season;

/// One driver's enriched result, as seen by the sort.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// Index into `season.drivers`
    pub driver_idx: usize,
    /// Index into that driver's `race_results`
    pub result_idx: usize,
    pub driver_id: u32,
    pub laps: i64,
    pub original_time: f64,
    pub total_penalty: f64,
    pub final_time: f64,
    pub source_rank: i64,
}

impl Participant {
    pub fn is_non_finish(&self) -> bool {
        timing::is_non_finish(self.original_time)
    }

    pub fn has_penalty(&self) -> bool {
        self.total_penalty != 0.0
    }
}

/// A participant's place after overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub participant: Participant,
    /// 0-based position in the natural order
    pub natural_index: usize,
    pub manual_position: Option<u32>,
}

impl Placement {
    /// The position this entry asks for: its override, or its natural slot.
    pub fn effective_position(&self) -> usize {
        self.manual_position
            .map(|p| p as usize)
            .unwrap_or(self.natural_index + 1)
    }

    /// Requested position, then overrides before natural slots, then natural index.
    fn sort_key(&self) -> (usize, bool, usize) {
        (
            self.effective_position(),
            self.manual_position.is_none(),
            self.natural_index,
        )
    }
}

/// (driver index, result index) of everyone who raced `class` in `race_id`.
///
/// Only a driver's first result for the race counts; drivers without one are skipped.
pub fn participants(season: &Season, race_id: u32, class: &str) -> Vec<(usize, usize)> {
    season
        .drivers
        .iter()
        .enumerate()
        .filter_map(|(driver_idx, driver)| {
            let result_idx = driver.result_index(race_id)?;
            let result = &driver.race_results[result_idx];
            (result.class_or(&driver.current_class) == class).then_some((driver_idx, result_idx))
        })
        .collect()
}

/// Merge penalties into each slot's result and snapshot the sort keys.
///
/// Writes `originalTime`, `totalPenalty` and `finalTime`; laps are already
/// integers once decoded.
pub fn enrich(
    season: &mut Season,
    race_id: u32,
    slots: &[(usize, usize)],
    tables: &OverrideTables,
) -> Vec<Participant> {
    slots
        .iter()
        .map(|&(driver_idx, result_idx)| {
            let driver = &mut season.drivers[driver_idx];
            let driver_id = driver.id;
            let result = &mut driver.race_results[result_idx];

            let penalty = tables.penalty_seconds(race_id, driver_id);
            let original_time = timing::original_time(result.finish_time.as_ref());
            let final_time = original_time + penalty;

            result.original_time = Some(original_time);
            result.total_penalty = Some(penalty);
            result.final_time = Some(final_time);

            Participant {
                driver_idx,
                result_idx,
                driver_id,
                laps: result.laps,
                original_time,
                total_penalty: penalty,
                final_time,
                source_rank: result.source_rank(),
            }
        })
        .collect()
}

/// Natural ordering between two participants.
///
/// Two non-finishers keep the simulator's order, whatever their penalties.
/// Without penalties on either side the simulator's order also wins, so
/// its countback rules survive. Otherwise penalised time decides.
pub fn compare_natural(a: &Participant, b: &Participant) -> Ordering {
    if a.laps != b.laps {
        return b.laps.cmp(&a.laps);
    }

    if a.is_non_finish() && b.is_non_finish() {
        return a.source_rank.cmp(&b.source_rank);
    }

    if !a.has_penalty() && !b.has_penalty() && a.source_rank != 0 && b.source_rank != 0 {
        return a.source_rank.cmp(&b.source_rank);
    }

    a.final_time.total_cmp(&b.final_time)
}

/// Stable insertion sort.
///
/// `compare_natural` is not a total order once penalised and clean entries
/// mix, and std's sorts may panic on such comparators. Grids are small.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

pub fn natural_order(mut participants: Vec<Participant>) -> Vec<Participant> {
    insertion_sort_by(&mut participants, compare_natural);
    participants
}

/// Re-rank the natural order with manual positions.
///
/// A driver pinned to a slot takes it from whoever holds it naturally.
/// Two overrides to the same slot go to the lower natural index.
pub fn apply_overrides(
    natural: Vec<Participant>,
    race_id: u32,
    tables: &OverrideTables,
) -> Vec<Placement> {
    let mut placements: Vec<Placement> = natural
        .into_iter()
        .enumerate()
        .map(|(natural_index, participant)| {
            let manual_position = tables.manual_position(race_id, participant.driver_id);
            Placement {
                participant,
                natural_index,
                manual_position,
            }
        })
        .collect();

    placements.sort_by_key(Placement::sort_key);
    placements
}

/// Classify one race for one class and write the final positions back.
///
/// Returns placements in final order; rank is index + 1.
pub fn classify_race(
    season: &mut Season,
    race_id: u32,
    class: &str,
    tables: &OverrideTables,
) -> Vec<Placement> {
    let slots = participants(season, race_id, class);
    if slots.is_empty() {
        return Vec::new();
    }

    let enriched = enrich(season, race_id, &slots, tables);
    let placements = apply_overrides(natural_order(enriched), race_id, tables);

    for (i, placement) in placements.iter().enumerate() {
        let rank = (i + 1) as u32;
        let p = &placement.participant;
        let result = &mut season.drivers[p.driver_idx].race_results[p.result_idx];
        result.class_position = Some(i64::from(rank));
        result.new_position = Some(rank);
        result.manual_position = placement.manual_position;
    }

    debug!(
        race_id,
        class,
        entries = placements.len(),
        overrides = placements.iter().filter(|p| p.manual_position.is_some()).count(),
        "classified race"
    );

    placements
}
