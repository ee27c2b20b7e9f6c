use std::collections::HashSet;

use super::config::RuleSet;

/// Longest points table accepted; no grid comes close.
const MAX_POINTS_POSITIONS: usize = 100;

/// Validate a resolved rule set at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &RuleSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if rules.name.trim().is_empty() {
        errors.push("rules.name: must not be empty".to_string());
    }

    if rules.classes.is_empty() {
        errors.push("rules.classes: at least one class is required".to_string());
    }

    let mut seen = HashSet::new();
    for (i, class) in rules.classes.iter().enumerate() {
        if class.trim().is_empty() {
            errors.push(format!("rules.classes[{}]: must not be empty", i));
        } else if !seen.insert(class.as_str()) {
            errors.push(format!("rules.classes[{}]: duplicate class '{}'", i, class));
        }
    }

    if rules.points.is_empty() {
        errors.push("rules.points: at least one scoring position is required".to_string());
    } else if rules.points.len() > MAX_POINTS_POSITIONS {
        errors.push(format!(
            "rules.points: {} positions given, at most {} allowed",
            rules.points.len(),
            MAX_POINTS_POSITIONS
        ));
    }

    if rules.finished_statuses.is_empty() {
        errors.push("rules.finished_statuses: at least one status is required".to_string());
    }

    if rules.swap_grace_round == 0 {
        errors.push("rules.swap_grace_round: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PointsTable;

    #[test]
    fn test_presets_are_valid() {
        assert!(validate_rules(&RuleSet::standard()).is_ok());
        assert!(validate_rules(&RuleSet::heavy()).is_ok());
    }

    #[test]
    fn test_no_classes() {
        let rules = RuleSet {
            classes: vec![],
            ..RuleSet::standard()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("rules.classes"));
    }

    #[test]
    fn test_duplicate_class() {
        let rules = RuleSet {
            classes: vec!["LMP2".to_string(), "LMP2".to_string()],
            ..RuleSet::standard()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("rules.classes[1]"));
    }

    #[test]
    fn test_empty_points_table() {
        let rules = RuleSet {
            points: PointsTable::new(vec![]),
            ..RuleSet::standard()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("rules.points"));
    }

    #[test]
    fn test_oversized_points_table() {
        let rules = RuleSet {
            points: PointsTable::new(vec![1; 101]),
            ..RuleSet::standard()
        };
        assert!(validate_rules(&rules).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let rules = RuleSet {
            name: String::new(),                // Error 1
            finished_statuses: vec![],          // Error 2
            swap_grace_round: 0,                // Error 3
            ..RuleSet::standard()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
