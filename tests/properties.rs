//! Property-based tests for the championship engine.
//!
//! These tests verify that:
//! - Computing the same season twice yields byte-identical JSON
//! - Every classified class in every completed race is ranked 1..N
//! - Zero-lap results never score points
//! - Running ballast always stays within 0..=45 kg

use proptest::prelude::*;
use race_standings::engine::{running_ballast, MAX_BALLAST_KG};
use race_standings::rules::RuleSet;
use race_standings::season::CalculationSource;
use race_standings::{recalculate, Season};
use serde_json::{json, Value};

const CLASSES: [&str; 2] = ["LMP2", "LMGT3"];
const RACES: u32 = 3;

#[derive(Debug, Clone)]
struct Entry {
    laps: i64,
    finish_time: Value,
    status: &'static str,
    class_position: i64,
    driven_class: Option<usize>,
    penalty: Option<f64>,
    manual_position: Option<u32>,
}

/// Strategy for a single race result, including any overrides for it.
fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        0i64..30,
        prop_oneof![
            (60.0f64..7200.0).prop_map(|t| json!(t)),
            Just(json!("DNF")),
            Just(json!(0)),
            Just(json!(999_999)),
        ],
        prop::sample::select(vec!["Finished", "DNF", "Disqualified", "Completed"]),
        0i64..12,
        prop::option::of(0usize..CLASSES.len()),
        prop::option::of((1u32..60).prop_map(f64::from)),
        prop::option::weighted(0.2, 1u32..8),
    )
        .prop_map(
            |(laps, finish_time, status, class_position, driven_class, penalty, manual_position)| {
                Entry {
                    laps,
                    finish_time,
                    status,
                    class_position,
                    driven_class,
                    penalty,
                    manual_position,
                }
            },
        )
}

/// Strategy for a roster: each driver has a class and one entry per race.
fn arb_roster() -> impl Strategy<Value = Vec<(usize, Vec<Entry>)>> {
    prop::collection::vec(
        (
            0usize..CLASSES.len(),
            prop::collection::vec(arb_entry(), RACES as usize),
        ),
        1..12,
    )
}

fn build_season(roster: &[(usize, Vec<Entry>)], current_round: u32) -> Value {
    let mut penalties = serde_json::Map::new();
    let mut manual = serde_json::Map::new();

    let drivers: Vec<Value> = roster
        .iter()
        .enumerate()
        .map(|(i, (class, entries))| {
            let driver_id = i as u32 + 1;
            let results: Vec<Value> = entries
                .iter()
                .enumerate()
                .map(|(r, entry)| {
                    let race_id = r as u32 + 1;
                    let key = format!("{}-{}", race_id, driver_id);
                    if let Some(seconds) = entry.penalty {
                        penalties.insert(key.clone(), json!(seconds));
                    }
                    if let Some(position) = entry.manual_position {
                        manual.insert(key, json!(position));
                    }
                    let mut result = json!({
                        "raceId": race_id,
                        "laps": entry.laps,
                        "finishTime": entry.finish_time,
                        "status": entry.status,
                        "classPosition": entry.class_position,
                    });
                    if let Some(driven) = entry.driven_class {
                        result["drivenClass"] = json!(CLASSES[driven]);
                    }
                    result
                })
                .collect();

            json!({
                "id": driver_id,
                "name": format!("Driver {}", driver_id),
                "class": CLASSES[*class],
                "raceResults": results,
            })
        })
        .collect();

    let races: Vec<Value> = (1..=RACES)
        .map(|id| json!({ "id": id, "name": format!("Round {}", id), "status": "Completed" }))
        .collect();

    json!({
        "season": "Property",
        "races": races,
        "drivers": drivers,
        "currentRound": current_round,
        "totalRounds": RACES,
        "penalties": penalties,
        "manualPositions": manual,
    })
}

fn compute(raw: Value) -> Season {
    recalculate(raw, None, None, &RuleSet::standard(), CalculationSource::Scheduled)
}

proptest! {
    /// The same season computed twice serializes to identical bytes.
    #[test]
    fn computation_is_idempotent(roster in arb_roster(), current in 0u32..=RACES) {
        let raw = build_season(&roster, current);

        let first = serde_json::to_string(&compute(raw.clone())).unwrap();
        let second = serde_json::to_string(&compute(raw)).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Each class in each completed race is ranked exactly 1..N.
    #[test]
    fn classification_is_complete(roster in arb_roster(), current in 1u32..=RACES) {
        let out = compute(build_season(&roster, current));
        prop_assert!(!out.is_error());

        for race_id in 1..=current {
            for class in CLASSES {
                let mut ranks: Vec<u32> = out
                    .drivers
                    .iter()
                    .filter_map(|d| {
                        let result = d.result_for(race_id)?;
                        (result.class_or(&d.current_class) == class).then_some(result.new_position)
                    })
                    .map(|rank| rank.unwrap_or(0))
                    .collect();
                ranks.sort_unstable();

                let expected: Vec<u32> = (1..=ranks.len() as u32).collect();
                prop_assert_eq!(ranks, expected);
            }
        }
    }

    /// A result with zero laps never scores points, whatever its rank.
    #[test]
    fn zero_laps_score_nothing(roster in arb_roster()) {
        let out = compute(build_season(&roster, RACES));

        for driver in &out.drivers {
            for result in &driver.race_results {
                if result.laps <= 0 {
                    prop_assert_eq!(result.points, 0);
                }
            }
        }
    }

    /// Current ballast never leaves 0..=45 kg.
    #[test]
    fn current_ballast_is_clamped(roster in arb_roster()) {
        let out = compute(build_season(&roster, RACES));

        for driver in &out.drivers {
            prop_assert!(i64::from(driver.current_ballast) <= MAX_BALLAST_KG);
        }
    }

    /// The running clamp holds for any sequence of deltas.
    #[test]
    fn running_ballast_stays_in_range(deltas in prop::collection::vec(-60i64..60, 0..40)) {
        let ballast = running_ballast(deltas);
        prop_assert!((0..=MAX_BALLAST_KG).contains(&ballast));
    }
}
