use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::error::StandingsError;
use crate::overrides::{ManualPositions, PenaltyTable};

/// Label given to the placeholder snapshot returned for structurally broken input.
pub const ERROR_LABEL: &str = "Data Corruption Error";

/// A season snapshot: schedule, roster and every driver's results.
///
/// The same shape is used for raw input and for the enriched output; the
/// derived fields (`totalPoints`, `newPosition`, ...) are only meaningful
/// on a snapshot returned by the engine. Fields this crate does not know
/// about are carried through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(
        rename = "season",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,

    pub races: Vec<Race>,

    pub drivers: Vec<Driver>,

    /// Highest race id considered completed
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub current_round: u32,

    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub total_rounds: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalties: Option<PenaltyTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_positions: Option<ManualPositions>,

    /// Which call path produced this snapshot (output only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_source: Option<CalculationSource>,

    /// Set only on the placeholder returned for structurally broken input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Season {
    /// Decode a season document, rejecting structurally broken input.
    ///
    /// A missing race list or driver list is an error rather than an empty
    /// season, so callers can tell "broken" apart from "nothing raced yet".
    pub fn from_value(value: Value) -> Result<Self, StandingsError> {
        let object = value.as_object().ok_or(StandingsError::NotAnObject)?;
        if !matches!(object.get("races"), Some(Value::Array(_))) {
            return Err(StandingsError::MissingField("races"));
        }
        if !matches!(object.get("drivers"), Some(Value::Array(_))) {
            return Err(StandingsError::MissingField("drivers"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The tagged empty snapshot handed back instead of partial data.
    pub fn error_placeholder(message: impl Into<String>) -> Self {
        Self {
            label: Some(ERROR_LABEL.to_string()),
            races: Vec::new(),
            drivers: Vec::new(),
            current_round: 0,
            total_rounds: 0,
            penalties: None,
            manual_positions: None,
            calculation_source: None,
            error: Some(message.into()),
            extra: Map::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn race(&self, race_id: u32) -> Option<&Race> {
        self.races.iter().find(|r| r.id == race_id)
    }

    pub fn driver(&self, driver_id: u32) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == driver_id)
    }

    /// Ids of races with `id <= currentRound`, in schedule order.
    pub fn completed_race_ids(&self) -> Vec<u32> {
        self.races
            .iter()
            .filter(|r| r.id <= self.current_round)
            .map(|r| r.id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u32,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub track: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,

    /// Status exactly as stored; see [`Race::race_status`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Race {
    /// "completed" in any case is Completed; anything else, or nothing, is Scheduled.
    pub fn race_status(&self) -> RaceStatus {
        match self.status {
            Some(Value::String(ref s)) if s.trim().eq_ignore_ascii_case("completed") => {
                RaceStatus::Completed
            }
            _ => RaceStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RaceStatus {
    #[default]
    Scheduled,
    Completed,
}

impl RaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceStatus::Scheduled => "Scheduled",
            RaceStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u32,

    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub team: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub car: Option<String>,

    /// The class the driver currently races in
    #[serde(rename = "class", default, deserialize_with = "lenient::text_or_empty")]
    pub current_class: String,

    #[serde(default)]
    pub race_results: Vec<RaceResult>,

    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub total_points: u32,

    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub current_ballast: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Driver {
    /// Index of the first result recorded for `race_id`.
    ///
    /// Results without a usable race id never match.
    pub fn result_index(&self, race_id: u32) -> Option<usize> {
        self.race_results
            .iter()
            .position(|r| r.race_id == Some(race_id))
    }

    pub fn result_for(&self, race_id: u32) -> Option<&RaceResult> {
        self.result_index(race_id).map(|i| &self.race_results[i])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    /// Race this result belongs to; absent or garbled ids are kept but never classified
    #[serde(
        default,
        deserialize_with = "lenient::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub race_id: Option<u32>,

    /// Overall position reported by the simulator
    #[serde(
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<i64>,

    /// In-class position; reported by the simulator on input, engine-assigned on output
    #[serde(
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_position: Option<i64>,

    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub laps: i64,

    /// Seconds as a number, a "MM:SS.sss" string, or a DNF marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<Value>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub driven_class: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_time: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_penalty: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_time: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub new_position: Option<u32>,

    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub points: u32,

    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub ballast_change: i64,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub manual_position: Option<u32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RaceResult {
    pub fn new(race_id: u32) -> Self {
        Self {
            race_id: Some(race_id),
            position: None,
            class_position: None,
            laps: 0,
            finish_time: None,
            status: None,
            driven_class: None,
            original_time: None,
            total_penalty: None,
            final_time: None,
            new_position: None,
            points: 0,
            ballast_change: 0,
            manual_position: None,
            extra: Map::new(),
        }
    }

    /// Class actually raced, falling back to the driver's current class.
    pub fn class_or<'a>(&'a self, current_class: &'a str) -> &'a str {
        match self.driven_class.as_deref() {
            Some(class) if !class.is_empty() => class,
            _ => current_class,
        }
    }

    /// Simulator-reported rank: class position, then overall position, then 0.
    ///
    /// A zero entry counts as missing and falls through to the next one.
    pub fn source_rank(&self) -> i64 {
        self.class_position
            .filter(|p| *p != 0)
            .or(self.position.filter(|p| *p != 0))
            .unwrap_or(0)
    }
}

/// Provenance tag naming the call path that produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationSource {
    /// Recomputed by a trigger after the stored season changed
    Scheduled,
    /// Recomputed locally on request
    OnDemand,
}

impl std::fmt::Display for CalculationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculationSource::Scheduled => write!(f, "scheduled"),
            CalculationSource::OnDemand => write!(f, "on-demand"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_minimal_season() {
        let season = Season::from_value(json!({
            "season": "Season 2",
            "races": [{ "id": 1, "track": "Monza", "status": "Completed" }],
            "drivers": [{ "id": 7, "name": "Ana Silva", "class": "LMP2" }],
            "currentRound": 1
        }))
        .unwrap();

        assert_eq!(season.label.as_deref(), Some("Season 2"));
        assert_eq!(season.races[0].race_status(), RaceStatus::Completed);
        assert_eq!(season.drivers[0].current_class, "LMP2");
        assert!(season.drivers[0].race_results.is_empty());
        assert_eq!(season.completed_race_ids(), vec![1]);
    }

    #[test]
    fn test_missing_driver_list_is_structural() {
        let err = Season::from_value(json!({ "races": [] })).unwrap_err();
        assert!(matches!(err, StandingsError::MissingField("drivers")));
    }

    #[test]
    fn test_missing_race_list_is_structural() {
        let err = Season::from_value(json!({ "drivers": [] })).unwrap_err();
        assert!(matches!(err, StandingsError::MissingField("races")));
    }

    #[test]
    fn test_non_object_is_structural() {
        let err = Season::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, StandingsError::NotAnObject));
    }

    #[test]
    fn test_lenient_result_fields() {
        let result: RaceResult = serde_json::from_value(json!({
            "raceId": "3",
            "laps": "41",
            "position": null,
            "classPosition": "abc",
            "finishTime": "DNF",
            "points": "n/a",
            "bestLap": 92.113
        }))
        .unwrap();

        assert_eq!(result.race_id, Some(3));
        assert_eq!(result.laps, 41);
        assert_eq!(result.position, None);
        assert_eq!(result.class_position, None);
        assert_eq!(result.points, 0);
        assert_eq!(result.extra.get("bestLap"), Some(&json!(92.113)));
    }

    #[test]
    fn test_bad_text_fields_do_not_fail_the_season() {
        let season = Season::from_value(json!({
            "races": [{ "id": 1, "status": "Completed" }],
            "drivers": [
                { "id": 1, "name": null, "class": null, "team": 4, "raceResults": [
                    { "laps": 3, "status": "DNF" },
                    { "raceId": 1, "laps": 10, "status": 1, "drivenClass": ["LMP2"] }
                ]}
            ],
            "currentRound": 1
        }))
        .unwrap();

        let driver = &season.drivers[0];
        assert_eq!(driver.name, "");
        assert_eq!(driver.current_class, "");
        assert_eq!(driver.team.as_deref(), Some("4"));
        assert_eq!(driver.race_results[0].race_id, None);
        assert_eq!(driver.result_index(1), Some(1));
        assert_eq!(driver.race_results[1].status.as_deref(), Some("1"));
        assert_eq!(driver.race_results[1].driven_class, None);
    }

    #[test]
    fn test_race_status_is_stored_verbatim() {
        let input = json!({
            "races": [
                { "id": 1, "status": "completed" },
                { "id": 2, "status": "Cancelled" },
                { "id": 3 }
            ],
            "drivers": []
        });
        let season = Season::from_value(input.clone()).unwrap();

        assert_eq!(season.races[0].race_status(), RaceStatus::Completed);
        assert_eq!(season.races[1].race_status(), RaceStatus::Scheduled);
        assert_eq!(season.races[2].race_status(), RaceStatus::Scheduled);

        let output = serde_json::to_value(&season).unwrap();
        assert_eq!(output["races"], input["races"]);
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let input = json!({
            "races": [{ "id": 1, "round": "R1" }],
            "drivers": [],
            "championship": "Endurance Cup"
        });
        let season = Season::from_value(input).unwrap();
        let output = serde_json::to_value(&season).unwrap();
        assert_eq!(output["championship"], json!("Endurance Cup"));
        assert_eq!(output["races"][0]["round"], json!("R1"));
    }

    #[test]
    fn test_source_rank_fallback_order() {
        let mut result = RaceResult::new(1);
        assert_eq!(result.source_rank(), 0);

        result.position = Some(5);
        assert_eq!(result.source_rank(), 5);

        result.class_position = Some(0);
        assert_eq!(result.source_rank(), 5);

        result.class_position = Some(2);
        assert_eq!(result.source_rank(), 2);
    }

    #[test]
    fn test_class_falls_back_to_current() {
        let mut result = RaceResult::new(1);
        assert_eq!(result.class_or("LMGT3"), "LMGT3");

        result.driven_class = Some(String::new());
        assert_eq!(result.class_or("LMGT3"), "LMGT3");

        result.driven_class = Some("LMP2".to_string());
        assert_eq!(result.class_or("LMGT3"), "LMP2");
    }

    #[test]
    fn test_error_placeholder_is_tagged_and_empty() {
        let placeholder = Season::error_placeholder("missing field: races");
        assert!(placeholder.is_error());
        assert!(placeholder.races.is_empty());
        assert!(placeholder.drivers.is_empty());
        assert_eq!(placeholder.label.as_deref(), Some(ERROR_LABEL));
    }

    #[test]
    fn test_calculation_source_wire_names() {
        assert_eq!(
            serde_json::to_value(CalculationSource::OnDemand).unwrap(),
            json!("on-demand")
        );
        assert_eq!(CalculationSource::Scheduled.to_string(), "scheduled");
    }
}
