pub mod aggregate;
pub mod award;
pub mod championship;
pub mod classify;
pub mod standings;
pub mod timing;

pub use aggregate::{aggregate_driver, current_ballast, running_ballast, total_points, MAX_BALLAST_KG};
pub use award::{assign, ballast_for, points_for};
pub use championship::{calculate_championship, recalculate};
pub use classify::{classify_race, compare_natural, Participant, Placement};
pub use standings::class_standings;
pub use timing::{format_time, parse_time, NON_FINISH_SENTINEL, NON_FINISH_THRESHOLD};
