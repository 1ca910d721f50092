//! Weekly planner model
//!
//! Maps each day of the week to an ordered list of planned recipe ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Day keys for the weekly planner, Monday first
pub const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// True when `day` is one of the planner's day keys
pub fn is_valid_day(day: &str) -> bool {
    DAYS.contains(&day)
}

/// Recipe ids assigned to each day of the week
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Planner {
    #[serde(flatten)]
    days: HashMap<String, Vec<String>>,
}

impl Planner {
    /// A planner with every day present and empty
    pub fn empty() -> Self {
        Self {
            days: DAYS.iter().map(|d| (d.to_string(), Vec::new())).collect(),
        }
    }

    /// Ids planned for one day (empty for unknown or unset days)
    pub fn get(&self, day: &str) -> &[String] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Assign a recipe to a day. Duplicate assignments are a no-op.
    /// Returns true when the assignment was added.
    pub fn add(&mut self, day: &str, recipe_id: &str) -> bool {
        let entries = self.days.entry(day.to_string()).or_default();
        if entries.iter().any(|id| id == recipe_id) {
            return false;
        }
        entries.push(recipe_id.to_string());
        true
    }

    /// Remove a recipe from a day. Returns true when something was removed.
    pub fn remove(&mut self, day: &str, recipe_id: &str) -> bool {
        match self.days.get_mut(day) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|id| id != recipe_id);
                entries.len() < before
            }
            None => false,
        }
    }

    /// Remove a recipe from every day
    pub fn remove_everywhere(&mut self, recipe_id: &str) {
        for entries in self.days.values_mut() {
            entries.retain(|id| id != recipe_id);
        }
    }

    /// All planned recipe ids in week order (Mon..Sun), duplicates kept
    pub fn ids_in_week_order(&self) -> Vec<String> {
        DAYS.iter()
            .flat_map(|day| self.get(day).iter().cloned())
            .collect()
    }

    /// Total number of assignments across the week
    pub fn assignment_count(&self) -> usize {
        DAYS.iter().map(|day| self.get(day).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates() {
        let mut planner = Planner::empty();
        assert!(planner.add("Mon", "r_1"));
        assert!(!planner.add("Mon", "r_1"));
        assert_eq!(planner.get("Mon"), ["r_1".to_string()]);
    }

    #[test]
    fn test_remove() {
        let mut planner = Planner::empty();
        planner.add("Tue", "r_1");
        assert!(planner.remove("Tue", "r_1"));
        assert!(!planner.remove("Tue", "r_1"));
        assert!(planner.get("Tue").is_empty());
    }

    #[test]
    fn test_remove_everywhere() {
        let mut planner = Planner::empty();
        planner.add("Mon", "r_1");
        planner.add("Fri", "r_1");
        planner.add("Fri", "r_2");
        planner.remove_everywhere("r_1");
        assert!(planner.get("Mon").is_empty());
        assert_eq!(planner.get("Fri"), ["r_2".to_string()]);
    }

    #[test]
    fn test_week_order() {
        let mut planner = Planner::empty();
        planner.add("Sun", "r_3");
        planner.add("Mon", "r_1");
        planner.add("Wed", "r_2");
        assert_eq!(
            planner.ids_in_week_order(),
            vec!["r_1".to_string(), "r_2".to_string(), "r_3".to_string()]
        );
    }

    #[test]
    fn test_tolerates_missing_days_after_deserialization() {
        // A partially stored planner only has some keys
        let planner: Planner = serde_json::from_str(r#"{"Mon": ["r_1"]}"#).unwrap();
        assert_eq!(planner.get("Mon"), ["r_1".to_string()]);
        assert!(planner.get("Tue").is_empty());
        assert_eq!(planner.ids_in_week_order(), vec!["r_1".to_string()]);
    }

    #[test]
    fn test_valid_days() {
        assert!(is_valid_day("Mon"));
        assert!(is_valid_day("Sun"));
        assert!(!is_valid_day("Funday"));
        assert!(!is_valid_day("mon"));
    }
}
