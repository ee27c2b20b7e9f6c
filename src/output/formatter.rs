use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::season::Driver;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Shorten a driver's name for public tables.
/// "John Doe" -> "John D.", "John Doe Smith" -> "John S.", "John" -> "John"
pub fn format_driver_name(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => "Unknown".to_string(),
        [single] => single.to_string(),
        [first, .., last] => {
            let initial: String = last.chars().take(1).collect();
            format!("{} {}.", first, initial)
        }
    }
}

/// Format a class standings table: position, driver, team, points, ballast.
/// Drivers must already be in standings order.
pub fn format_standings_table(
    class: &str,
    drivers: &[&Driver],
    use_colors: bool,
    full_names: bool,
) -> String {
    if drivers.is_empty() {
        return format!("{}: no drivers.", class);
    }

    let names: Vec<String> = drivers
        .iter()
        .map(|d| {
            if full_names {
                d.name.clone()
            } else {
                format_driver_name(&d.name)
            }
        })
        .collect();
    let name_width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0).max(6);
    let team_width = drivers
        .iter()
        .map(|d| d.team.as_deref().unwrap_or("-").chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let header = format!(
        "{:>3}  {:<nw$}  {:<tw$}  {:>6}  {:>7}",
        "Pos",
        "Driver",
        "Team",
        "Points",
        "Ballast",
        nw = name_width,
        tw = team_width
    );

    let mut lines = Vec::with_capacity(drivers.len() + 2);
    if use_colors {
        lines.push(class.bold().to_string());
        lines.push(header.dimmed().to_string());
    } else {
        lines.push(class.to_string());
        lines.push(header);
    }

    for (idx, (driver, name)) in drivers.iter().zip(&names).enumerate() {
        let pos = format!("{:>2}.", idx + 1);
        let name = format!("{:<width$}", name, width = name_width);
        let team = format!(
            "{:<width$}",
            driver.team.as_deref().unwrap_or("-"),
            width = team_width
        );
        let points = format!("{:>6}", driver.total_points);
        let ballast = format!("{:>5}kg", driver.current_ballast);

        if use_colors {
            lines.push(format!(
                "{}  {}  {}  {}  {}",
                pos.dimmed(),
                name.bold(),
                team.cyan(),
                points.yellow(),
                ballast
            ));
        } else {
            lines.push(format!("{}  {}  {}  {}  {}", pos, name, team, points, ballast));
        }
    }

    lines.join("\n")
}
