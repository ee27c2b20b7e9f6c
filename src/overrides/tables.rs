use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::key::EntryKey;
use crate::season::lenient::{coerce_f64, coerce_i64};
use crate::season::Season;

type RawTable = BTreeMap<String, Value>;

fn parse_key(table: &str, raw: &str) -> Option<EntryKey> {
    match raw.parse() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!(table, key = raw, "ignoring malformed entry key: {}", e);
            None
        }
    }
}

/// Time penalties in seconds, keyed by (race, driver).
///
/// Absence means no penalty. Values that are not numbers are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTable", into = "RawTable")]
pub struct PenaltyTable(BTreeMap<EntryKey, f64>);

impl PenaltyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Penalty seconds for an entry, 0 when none is recorded.
    pub fn seconds(&self, key: EntryKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    /// Record a penalty. Zero seconds clears the entry.
    pub fn set(&mut self, key: EntryKey, seconds: f64) {
        if seconds == 0.0 || !seconds.is_finite() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, seconds);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl From<RawTable> for PenaltyTable {
    fn from(raw: RawTable) -> Self {
        let mut table = PenaltyTable::new();
        for (raw_key, value) in &raw {
            let Some(key) = parse_key("penalties", raw_key) else {
                continue;
            };
            match coerce_f64(value) {
                Some(seconds) => table.set(key, seconds),
                None => warn!(key = %key, "ignoring non-numeric penalty {}", value),
            }
        }
        table
    }
}

impl From<PenaltyTable> for RawTable {
    fn from(table: PenaltyTable) -> Self {
        table
            .0
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect()
    }
}

/// Administrator-forced classification positions, keyed by (race, driver).
///
/// Positions are 1-based; zero or unparseable values mean "no override".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTable", into = "RawTable")]
pub struct ManualPositions(BTreeMap<EntryKey, u32>);

impl ManualPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, key: EntryKey) -> Option<u32> {
        self.0.get(&key).copied()
    }

    /// Force a position. Zero clears the entry.
    pub fn set(&mut self, key: EntryKey, position: u32) {
        if position == 0 {
            self.0.remove(&key);
        } else {
            self.0.insert(key, position);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryKey, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl From<RawTable> for ManualPositions {
    fn from(raw: RawTable) -> Self {
        let mut table = ManualPositions::new();
        for (raw_key, value) in &raw {
            let Some(key) = parse_key("manualPositions", raw_key) else {
                continue;
            };
            match coerce_i64(value).and_then(|p| u32::try_from(p).ok()) {
                Some(position) => table.set(key, position),
                None => warn!(key = %key, "ignoring invalid manual position {}", value),
            }
        }
        table
    }
}

impl From<ManualPositions> for RawTable {
    fn from(table: ManualPositions) -> Self {
        table
            .0
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect()
    }
}

/// The pair of tables one championship computation reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTables {
    pub penalties: PenaltyTable,
    pub manual_positions: ManualPositions,
}

impl OverrideTables {
    /// Tables embedded in the season document (empty when absent).
    pub fn embedded(season: &Season) -> Self {
        Self::resolve(season, None, None)
    }

    /// Pick each table from the explicit argument when given, else from the season.
    ///
    /// Seasons have been stored both with the tables inline and with the
    /// tables kept alongside, so both layouts resolve here.
    pub fn resolve(
        season: &Season,
        penalties: Option<PenaltyTable>,
        manual_positions: Option<ManualPositions>,
    ) -> Self {
        Self {
            penalties: penalties
                .or_else(|| season.penalties.clone())
                .unwrap_or_default(),
            manual_positions: manual_positions
                .or_else(|| season.manual_positions.clone())
                .unwrap_or_default(),
        }
    }

    pub fn penalty_seconds(&self, race_id: u32, driver_id: u32) -> f64 {
        self.penalties.seconds(EntryKey::new(race_id, driver_id))
    }

    pub fn manual_position(&self, race_id: u32, driver_id: u32) -> Option<u32> {
        self.manual_positions
            .position(EntryKey::new(race_id, driver_id))
    }
}
