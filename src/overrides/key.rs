use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// Composite key for a single driver's result in a single race.
///
/// Rendered as `"{raceId}-{driverId}"`, the key format stored alongside seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryKey {
    pub race_id: u32,
    pub driver_id: u32,
}

impl EntryKey {
    pub fn new(race_id: u32, driver_id: u32) -> Self {
        Self { race_id, driver_id }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.race_id, self.driver_id)
    }
}

impl FromStr for EntryKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((race, driver)) = s.trim().split_once('-') else {
            bail!("Entry key must look like <raceId>-<driverId>: {}", s)
        };
        Ok(EntryKey {
            race_id: race.trim().parse()?,
            driver_id: driver.trim().parse()?,
        })
    }
}
