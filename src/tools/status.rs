//! Service status tool
//!
//! Runtime status information about the mealplan service.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Store;
use crate::models::{IdSource, PlannerState};

/// Usage guidance returned by the planner_instructions tool
pub const PLANNER_INSTRUCTIONS: &str = r#"
# Mealplan Instructions

Plan a week of meals in three steps:

1. **Library** - create_recipe with a title and free-text ingredient lines
   ("1 1/2 cups sugar", "2 cloves garlic", "salt"). list_recipes applies the
   persisted filters; adjust them with set_search_filter, toggle_tag_filter,
   toggle_favorites_filter, and clear_filters.
2. **Planner** - plan_recipe assigns a recipe to a day (Mon..Sun);
   unplan_recipe removes it; get_planner shows the week.
3. **Grocery list** - generate_grocery_list pools every planned recipe's
   ingredient lines, merges equivalent ingredients (same normalized name and
   unit), and sums quantities. Lines without a numeric quantity show up as
   "Nx name". add_recipe_to_grocery appends one recipe's ingredients;
   add_grocery_item adds a custom free-text line.

Quantities understand plain numbers, fractions ("3/4"), and mixed numbers
("1 1/2"). There is no unit conversion: "500 g flour" and "2 cups flour"
stay separate entries.
"#;

/// Service status snapshot
#[derive(Debug, Serialize)]
pub struct PlannerStatus {
    pub version: &'static str,
    pub build_number: &'static str,
    pub build_timestamp: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub recipe_count: usize,
    pub planned_count: usize,
    pub grocery_count: usize,
}

/// Tracks service start time and reports runtime status
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, store: &Store, ids: &dyn IdSource) -> Result<PlannerStatus, String> {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        let state = PlannerState::load(store, ids)
            .map_err(|e| format!("Database error: {}", e))?;

        Ok(PlannerStatus {
            version: build_info.version,
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            recipe_count: state.recipes.len(),
            planned_count: state.planner.assignment_count(),
            grocery_count: state.grocery.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::testing::SequentialIdSource;

    #[test]
    fn test_status_counts_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(&path).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        let store = Store::new(db);
        let ids = SequentialIdSource::default();

        let tracker = StatusTracker::new(path);
        let status = tracker.get_status(&store, &ids).unwrap();
        assert_eq!(status.recipe_count, 3); // demo library
        assert_eq!(status.planned_count, 0);
        assert_eq!(status.grocery_count, 0);
        assert!(status.database_size_bytes.is_some());
    }
}
