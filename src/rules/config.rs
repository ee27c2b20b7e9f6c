use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::tables::{BallastTable, PointsTable};

/// Statuses that count as having finished the race for ballast purposes.
pub const DEFAULT_FINISHED_STATUSES: [&str; 3] = ["Finished", "Finished Normally", "Completed"];

/// Drivers whose first race in their current class is after this round
/// forfeit points scored in other classes.
pub const DEFAULT_SWAP_GRACE_ROUND: u32 = 2;

/// Fully resolved league rules used by one championship computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSet {
    /// Preset the rules were built from
    pub name: String,

    /// Revision of the preset, bumped whenever its tables change
    pub version: u32,

    /// Classes classified independently, in processing order
    pub classes: Vec<String>,

    pub points: PointsTable,

    pub ballast: BallastTable,

    pub finished_statuses: Vec<String>,

    pub swap_grace_round: u32,

    /// Driver ids left out of the computed snapshot entirely
    pub excluded_drivers: Vec<u32>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Two-class league with moderate success ballast.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            version: 2,
            classes: vec!["LMP2".to_string(), "LMGT3".to_string()],
            points: PointsTable::standard(),
            ballast: BallastTable::standard(),
            finished_statuses: DEFAULT_FINISHED_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            swap_grace_round: DEFAULT_SWAP_GRACE_ROUND,
            excluded_drivers: Vec::new(),
        }
    }

    /// Same league with the steep +45..0 success ballast scale.
    pub fn heavy() -> Self {
        Self {
            name: "heavy".to_string(),
            version: 1,
            ballast: BallastTable::heavy(),
            ..Self::standard()
        }
    }

    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "heavy" => Ok(Self::heavy()),
            other => bail!("Unknown rules preset '{}' (expected standard or heavy)", other),
        }
    }

    pub fn is_finished(&self, status: Option<&str>) -> bool {
        status.is_some_and(|s| self.finished_statuses.iter().any(|f| f == s))
    }

    pub fn is_excluded(&self, driver_id: u32) -> bool {
        self.excluded_drivers.contains(&driver_id)
    }
}

/// Rules section of the config file.
///
/// Every key is optional; keys that are present replace the preset's value.
///
/// Example YAML:
/// ```yaml
/// rules:
///   preset: heavy
///   classes: [LMP2, LMGT3, GT4]
///   ballast:
///     positions: [20, 10, 5]
///     default: -10
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub preset: Option<String>,

    #[serde(default)]
    pub classes: Option<Vec<String>>,

    #[serde(default)]
    pub points: Option<Vec<u32>>,

    #[serde(default)]
    pub ballast: Option<BallastTable>,

    #[serde(default)]
    pub finished_statuses: Option<Vec<String>>,

    #[serde(default)]
    pub swap_grace_round: Option<u32>,

    #[serde(default)]
    pub excluded_drivers: Option<Vec<u32>>,
}

impl RulesConfig {
    /// Build the effective rule set: preset first, then explicit overrides.
    pub fn resolve(&self) -> Result<RuleSet> {
        let mut rules = match self.preset.as_deref() {
            Some(name) => RuleSet::preset(name)?,
            None => RuleSet::standard(),
        };
        if let Some(ref classes) = self.classes {
            rules.classes = classes.clone();
        }
        if let Some(ref points) = self.points {
            rules.points = PointsTable::new(points.clone());
        }
        if let Some(ref ballast) = self.ballast {
            rules.ballast = ballast.clone();
        }
        if let Some(ref statuses) = self.finished_statuses {
            rules.finished_statuses = statuses.clone();
        }
        if let Some(round) = self.swap_grace_round {
            rules.swap_grace_round = round;
        }
        if let Some(ref excluded) = self.excluded_drivers {
            rules.excluded_drivers = excluded.clone();
        }
        Ok(rules)
    }
}
