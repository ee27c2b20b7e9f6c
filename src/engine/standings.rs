use crate::season::{Driver, Season};

/// Drivers currently in `class`, best season total first.
///
/// Equal totals keep roster order.
pub fn class_standings<'a>(season: &'a Season, class: &str) -> Vec<&'a Driver> {
    let mut drivers: Vec<&Driver> = season
        .drivers
        .iter()
        .filter(|d| d.current_class == class)
        .collect();
    drivers.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    drivers
}
