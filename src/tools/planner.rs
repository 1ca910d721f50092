//! Weekly planner tools
//!
//! Assigning recipes to days and reading back the week.

use serde::Serialize;

use crate::db::Store;
use crate::models::{is_valid_day, IdSource, PlannerState, DAYS};

/// One planned recipe in the week view
#[derive(Debug, Serialize)]
pub struct PlannedRecipe {
    pub id: String,
    pub title: String,
}

/// One day in the week view
#[derive(Debug, Serialize)]
pub struct PlannerDayView {
    pub day: String,
    pub recipes: Vec<PlannedRecipe>,
}

/// Response for get_planner
#[derive(Debug, Serialize)]
pub struct PlannerResponse {
    pub days: Vec<PlannerDayView>,
    pub assignment_count: usize,
}

/// Response for plan_recipe / unplan_recipe
#[derive(Debug, Serialize)]
pub struct PlanChangeResponse {
    pub day: String,
    pub recipe_id: String,
    /// False when the assignment was already in the requested state
    pub changed: bool,
}

fn db_err(e: crate::db::DbError) -> String {
    format!("Database error: {}", e)
}

fn check_day(day: &str) -> Result<(), String> {
    if is_valid_day(day) {
        Ok(())
    } else {
        Err(format!("Unknown day: {} (expected one of {})", day, DAYS.join(", ")))
    }
}

/// Assign a recipe to a day of the week
pub fn plan_recipe(
    store: &Store,
    ids: &dyn IdSource,
    recipe_id: &str,
    day: &str,
) -> Result<PlanChangeResponse, String> {
    check_day(day)?;
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    if state.find_recipe(recipe_id).is_none() {
        return Err(format!("Recipe not found: {}", recipe_id));
    }

    let changed = state.planner.add(day, recipe_id);
    state.persist(store).map_err(db_err)?;
    Ok(PlanChangeResponse {
        day: day.to_string(),
        recipe_id: recipe_id.to_string(),
        changed,
    })
}

/// Remove a recipe from a day of the week
pub fn unplan_recipe(
    store: &Store,
    ids: &dyn IdSource,
    recipe_id: &str,
    day: &str,
) -> Result<PlanChangeResponse, String> {
    check_day(day)?;
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let changed = state.planner.remove(day, recipe_id);
    state.persist(store).map_err(db_err)?;
    Ok(PlanChangeResponse {
        day: day.to_string(),
        recipe_id: recipe_id.to_string(),
        changed,
    })
}

/// The week view, Monday first. Assignments whose recipe no longer
/// exists are skipped.
pub fn get_planner(store: &Store, ids: &dyn IdSource) -> Result<PlannerResponse, String> {
    let state = PlannerState::load(store, ids).map_err(db_err)?;

    let days: Vec<PlannerDayView> = DAYS
        .iter()
        .map(|day| PlannerDayView {
            day: day.to_string(),
            recipes: state
                .planner
                .get(day)
                .iter()
                .filter_map(|id| {
                    state.find_recipe(id).map(|r| PlannedRecipe {
                        id: r.id.clone(),
                        title: r.title.clone(),
                    })
                })
                .collect(),
        })
        .collect();

    let assignment_count = days.iter().map(|d| d.recipes.len()).sum();
    Ok(PlannerResponse {
        days,
        assignment_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::testing::SequentialIdSource;

    fn setup() -> (Store, SequentialIdSource, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        (Store::new(db), SequentialIdSource::default(), dir)
    }

    fn first_demo_id(store: &Store, ids: &SequentialIdSource) -> String {
        PlannerState::load(store, ids).unwrap().recipes[0].id.clone()
    }

    #[test]
    fn test_plan_and_get() {
        let (store, ids, _dir) = setup();
        let id = first_demo_id(&store, &ids);

        let planned = plan_recipe(&store, &ids, &id, "Wed").unwrap();
        assert!(planned.changed);

        let week = get_planner(&store, &ids).unwrap();
        assert_eq!(week.assignment_count, 1);
        let wed = week.days.iter().find(|d| d.day == "Wed").unwrap();
        assert_eq!(wed.recipes[0].id, id);
        assert!(!wed.recipes[0].title.is_empty());
    }

    #[test]
    fn test_plan_duplicate_is_noop() {
        let (store, ids, _dir) = setup();
        let id = first_demo_id(&store, &ids);
        plan_recipe(&store, &ids, &id, "Mon").unwrap();
        let again = plan_recipe(&store, &ids, &id, "Mon").unwrap();
        assert!(!again.changed);
        assert_eq!(get_planner(&store, &ids).unwrap().assignment_count, 1);
    }

    #[test]
    fn test_plan_unknown_day_is_error() {
        let (store, ids, _dir) = setup();
        let id = first_demo_id(&store, &ids);
        assert!(plan_recipe(&store, &ids, &id, "Funday").is_err());
    }

    #[test]
    fn test_plan_unknown_recipe_is_error() {
        let (store, ids, _dir) = setup();
        assert!(plan_recipe(&store, &ids, "r_missing", "Mon").is_err());
    }

    #[test]
    fn test_unplan() {
        let (store, ids, _dir) = setup();
        let id = first_demo_id(&store, &ids);
        plan_recipe(&store, &ids, &id, "Sat").unwrap();

        let removed = unplan_recipe(&store, &ids, &id, "Sat").unwrap();
        assert!(removed.changed);
        let again = unplan_recipe(&store, &ids, &id, "Sat").unwrap();
        assert!(!again.changed);
        assert_eq!(get_planner(&store, &ids).unwrap().assignment_count, 0);
    }

    #[test]
    fn test_week_view_is_monday_first() {
        let (store, ids, _dir) = setup();
        let week = get_planner(&store, &ids).unwrap();
        let names: Vec<&str> = week.days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(names, DAYS);
    }
}
