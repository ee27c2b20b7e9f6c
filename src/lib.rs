//! Championship standings for multi-class racing leagues.
//!
//! A season document goes in, a fully recomputed snapshot comes out:
//! per-class race classification (with time penalties and manual
//! position overrides), points, success ballast and season totals.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod overrides;
pub mod rules;
pub mod season;

pub use engine::{calculate_championship, class_standings, recalculate};
pub use error::StandingsError;
pub use overrides::{ManualPositions, OverrideTables, PenaltyTable};
pub use rules::{validate_rules, RuleSet};
pub use season::{CalculationSource, Season};
