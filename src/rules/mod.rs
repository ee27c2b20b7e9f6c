pub mod config;
pub mod tables;
pub mod validation;

pub use config::{RuleSet, RulesConfig, DEFAULT_FINISHED_STATUSES, DEFAULT_SWAP_GRACE_ROUND};
pub use tables::{BallastTable, PointsTable};
pub use validation::validate_rules;
