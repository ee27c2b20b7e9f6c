use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::debug;

use super::types::{Race, RaceStatus, Season};

/// Append a scheduled round after the highest existing race id.
///
/// Returns the id of the new race.
pub fn add_round(season: &mut Season, track: Option<&str>, date: NaiveDate) -> u32 {
    let id = season.races.iter().map(|r| r.id).max().map_or(1, |max| max + 1);
    season.races.push(Race {
        id,
        name: Some(format!("Round {}", id)),
        track: Some(track.unwrap_or("Unknown Track").to_string()),
        date: Some(date.format("%Y-%m-%d").to_string()),
        status: Some(Value::from(RaceStatus::Scheduled.as_str())),
        extra: Map::new(),
    });
    season.total_rounds = season.races.len() as u32;
    id
}

/// Remove a round and every result recorded against it.
///
/// If the deleted round was at or before the current round, the current
/// round moves back to the closest remaining race below it (or the first
/// remaining race, or 0 when the schedule is now empty).
/// Returns false when no race had that id.
pub fn delete_round(season: &mut Season, race_id: u32) -> bool {
    let before = season.races.len();
    season.races.retain(|r| r.id != race_id);
    let removed = season.races.len() != before;
    debug!(race_id, before, after = season.races.len(), "deleted round");

    season.total_rounds = season.races.len() as u32;

    for driver in &mut season.drivers {
        driver.race_results.retain(|r| r.race_id != Some(race_id));
    }

    if removed && season.current_round >= race_id && season.current_round > 0 {
        let current = season.current_round;
        let below = season
            .races
            .iter()
            .map(|r| r.id)
            .filter(|id| *id < current)
            .max();
        let first = season.races.iter().map(|r| r.id).min();
        season.current_round = match (below, first) {
            (Some(id), _) if id > 0 => id,
            (_, Some(id)) => id,
            (_, None) => 0,
        };
    }

    removed
}
