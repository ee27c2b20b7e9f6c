pub mod admin;
pub mod lenient;
pub mod storage;
pub mod types;

pub use admin::{add_round, delete_round};
pub use storage::{load_json, load_season, load_season_value, save_json};
pub use types::{
    CalculationSource, Driver, Race, RaceResult, RaceStatus, Season, ERROR_LABEL,
};
