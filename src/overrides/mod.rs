//! Sparse per-(race, driver) adjustments: time penalties and forced positions.

mod key;
mod tables;

pub use key::EntryKey;
pub use tables::{ManualPositions, OverrideTables, PenaltyTable};
