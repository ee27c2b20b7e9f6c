use serde_json::Value;

/// Finish time recorded for a car that did not finish (or has no time at all).
pub const NON_FINISH_SENTINEL: f64 = 999_999.0;

/// Any original time at or above this is treated as a non-finish.
pub const NON_FINISH_THRESHOLD: f64 = 900_000.0;

/// Parse a raw finish time into seconds.
///
/// Accepts seconds as a number or string, `MM:SS.sss` and `H:MM:SS.sss`.
/// Returns `None` for missing values, `DNF`/`DNS` markers and anything
/// that does not parse to a finite number.
pub fn parse_time(raw: &Value) -> Option<f64> {
    let seconds = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_time_str(s),
        _ => None,
    };
    seconds.filter(|s| s.is_finite())
}

fn parse_time_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("DNF") || s.eq_ignore_ascii_case("DNS") {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    let part = |i: usize| parts[i].trim().parse::<f64>().ok();
    match parts.len() {
        3 => Some(part(0)? * 3600.0 + part(1)? * 60.0 + part(2)?),
        2 => Some(part(0)? * 60.0 + part(1)?),
        1 => part(0),
        _ => None,
    }
}

/// Seconds used for ordering: the parsed finish time, or the non-finish sentinel.
///
/// A zero time counts as missing.
pub fn original_time(raw: Option<&Value>) -> f64 {
    raw.and_then(parse_time)
        .filter(|s| *s != 0.0)
        .unwrap_or(NON_FINISH_SENTINEL)
}

pub fn is_non_finish(seconds: f64) -> bool {
    seconds >= NON_FINISH_THRESHOLD
}

/// Format seconds as `M:SS.sss`, or `DNF` for a non-finish.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || is_non_finish(seconds) {
        return "DNF".to_string();
    }
    let total_millis = (seconds * 1000.0).round() as u64;
    let minutes = total_millis / 60_000;
    let millis = total_millis % 60_000;
    format!("{}:{:02}.{:03}", minutes, millis / 1000, millis % 1000)
}
