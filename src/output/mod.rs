pub mod formatter;

pub use formatter::{format_driver_name, format_standings_table, should_use_colors};
