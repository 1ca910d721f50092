//! Grocery list tools
//!
//! Generating the shopping list from the planner, per-recipe adds,
//! custom lines, and list editing.

use serde::Serialize;

use crate::db::Store;
use crate::ingredient::{aggregate_ingredients, parse_ingredient, sanitize};
use crate::models::{GroceryItem, IdSource, PlannerState};

/// Response carrying the full grocery list
#[derive(Debug, Serialize)]
pub struct GroceryListResponse {
    pub items: Vec<GroceryItem>,
    pub count: usize,
}

impl GroceryListResponse {
    fn from_state(state: &PlannerState) -> Self {
        Self {
            items: state.grocery.clone(),
            count: state.grocery.len(),
        }
    }
}

/// Response for single-item edits
#[derive(Debug, Serialize)]
pub struct GroceryItemResponse {
    pub index: usize,
    pub item: GroceryItem,
}

fn db_err(e: crate::db::DbError) -> String {
    format!("Database error: {}", e)
}

/// Replace the grocery list with an aggregate of every planned recipe's
/// ingredients, pooled in week order
pub fn generate_grocery_list(
    store: &Store,
    ids: &dyn IdSource,
) -> Result<GroceryListResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let lines: Vec<String> = state
        .planner
        .ids_in_week_order()
        .iter()
        .filter_map(|id| state.find_recipe(id))
        .flat_map(|r| r.ingredients.iter().cloned())
        .collect();

    state.grocery = aggregate_ingredients(&lines)
        .into_iter()
        .map(GroceryItem::from)
        .collect();

    state.persist(store).map_err(db_err)?;
    Ok(GroceryListResponse::from_state(&state))
}

/// Aggregate one recipe's ingredients and append them to the list
pub fn add_recipe_to_grocery(
    store: &Store,
    ids: &dyn IdSource,
    recipe_id: &str,
) -> Result<GroceryListResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let recipe = state
        .find_recipe(recipe_id)
        .ok_or_else(|| format!("Recipe not found: {}", recipe_id))?;

    let added: Vec<GroceryItem> = aggregate_ingredients(&recipe.ingredients)
        .into_iter()
        .map(GroceryItem::from)
        .collect();
    state.grocery.extend(added);

    state.persist(store).map_err(db_err)?;
    Ok(GroceryListResponse::from_state(&state))
}

/// Parse a custom line and insert it at the front of the list
pub fn add_grocery_item(
    store: &Store,
    ids: &dyn IdSource,
    line: &str,
) -> Result<GroceryItemResponse, String> {
    let clean = sanitize(line);
    if clean.is_empty() {
        return Err("Grocery item text cannot be empty".to_string());
    }

    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let parsed = parse_ingredient(&clean);
    // Zero quantities stay out of the label, same as missing ones
    let qty_text = match parsed.quantity {
        Some(q) if q != 0.0 => format!("{}", q),
        _ => String::new(),
    };
    let label = [qty_text.as_str(), parsed.unit.as_str(), parsed.name.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let label = if label.is_empty() { clean } else { label };

    let item = GroceryItem {
        name: parsed.name,
        unit: parsed.unit,
        qty: parsed.quantity,
        checked: false,
        label,
    };
    state.grocery.insert(0, item.clone());

    state.persist(store).map_err(db_err)?;
    Ok(GroceryItemResponse { index: 0, item })
}

/// Mark an item purchased or not, by list index
pub fn set_grocery_checked(
    store: &Store,
    ids: &dyn IdSource,
    index: usize,
    checked: bool,
) -> Result<GroceryItemResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let item = state
        .grocery
        .get_mut(index)
        .ok_or_else(|| format!("No grocery item at index {}", index))?;
    item.checked = checked;
    let item = item.clone();

    state.persist(store).map_err(db_err)?;
    Ok(GroceryItemResponse { index, item })
}

/// Remove an item by list index
pub fn remove_grocery_item(
    store: &Store,
    ids: &dyn IdSource,
    index: usize,
) -> Result<GroceryListResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    if index >= state.grocery.len() {
        return Err(format!("No grocery item at index {}", index));
    }
    state.grocery.remove(index);

    state.persist(store).map_err(db_err)?;
    Ok(GroceryListResponse::from_state(&state))
}

/// Empty the grocery list
pub fn clear_grocery_list(store: &Store, ids: &dyn IdSource) -> Result<GroceryListResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;
    state.grocery.clear();
    state.persist(store).map_err(db_err)?;
    Ok(GroceryListResponse::from_state(&state))
}

/// The current grocery list
pub fn get_grocery_list(store: &Store, ids: &dyn IdSource) -> Result<GroceryListResponse, String> {
    let state = PlannerState::load(store, ids).map_err(db_err)?;
    Ok(GroceryListResponse::from_state(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::testing::SequentialIdSource;
    use crate::models::RecipeDraft;
    use crate::tools::{planner, recipes};

    fn setup() -> (Store, SequentialIdSource, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        (Store::new(db), SequentialIdSource::default(), dir)
    }

    fn add_recipe(store: &Store, ids: &SequentialIdSource, title: &str, lines: &[&str]) -> String {
        let draft = RecipeDraft {
            title: title.to_string(),
            ingredients: lines.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        };
        recipes::create_recipe(store, ids, draft).unwrap().id
    }

    #[test]
    fn test_generate_from_planner_merges_across_recipes() {
        let (store, ids, _dir) = setup();
        let a = add_recipe(&store, &ids, "Cake", &["1 cup flour", "1/2 cup sugar", "salt"]);
        let b = add_recipe(&store, &ids, "Bread", &["2 cup flour", "salt"]);
        planner::plan_recipe(&store, &ids, &a, "Mon").unwrap();
        planner::plan_recipe(&store, &ids, &b, "Thu").unwrap();

        let list = generate_grocery_list(&store, &ids).unwrap();
        let labels: Vec<&str> = list.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["3 cup flour", "0.5 cup sugar", "2x salt"]);
        assert!(list.items.iter().all(|i| !i.checked));
    }

    #[test]
    fn test_generate_with_empty_planner_empties_list() {
        let (store, ids, _dir) = setup();
        add_grocery_item(&store, &ids, "2 cans beans").unwrap();
        let list = generate_grocery_list(&store, &ids).unwrap();
        assert_eq!(list.count, 0);
    }

    #[test]
    fn test_add_recipe_appends() {
        let (store, ids, _dir) = setup();
        let id = add_recipe(&store, &ids, "Cake", &["1 cup flour"]);
        add_grocery_item(&store, &ids, "2 cans beans").unwrap();

        let list = add_recipe_to_grocery(&store, &ids, &id).unwrap();
        assert_eq!(list.count, 2);
        assert_eq!(list.items[1].label, "1 cup flour");
    }

    #[test]
    fn test_add_recipe_unknown_id_is_error() {
        let (store, ids, _dir) = setup();
        assert!(add_recipe_to_grocery(&store, &ids, "r_missing").is_err());
    }

    #[test]
    fn test_custom_line_front_inserted_and_parsed() {
        let (store, ids, _dir) = setup();
        add_grocery_item(&store, &ids, "2 cans beans").unwrap();
        let added = add_grocery_item(&store, &ids, "1 1/2 cups sugar").unwrap();

        assert_eq!(added.index, 0);
        assert_eq!(added.item.qty, Some(1.5));
        assert_eq!(added.item.unit, "cups");
        assert_eq!(added.item.label, "1.5 cups sugar");

        let list = get_grocery_list(&store, &ids).unwrap();
        assert_eq!(list.items[0].label, "1.5 cups sugar");
        assert_eq!(list.items[1].label, "2 cans beans");
    }

    #[test]
    fn test_custom_line_rejects_empty() {
        let (store, ids, _dir) = setup();
        assert!(add_grocery_item(&store, &ids, "   ").is_err());
    }

    #[test]
    fn test_check_and_remove_by_index() {
        let (store, ids, _dir) = setup();
        add_grocery_item(&store, &ids, "milk").unwrap();
        add_grocery_item(&store, &ids, "bread").unwrap();

        let checked = set_grocery_checked(&store, &ids, 1, true).unwrap();
        assert!(checked.item.checked);
        assert_eq!(checked.item.label, "milk");

        let list = remove_grocery_item(&store, &ids, 0).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.items[0].label, "milk");

        assert!(set_grocery_checked(&store, &ids, 5, true).is_err());
        assert!(remove_grocery_item(&store, &ids, 5).is_err());
    }

    #[test]
    fn test_clear() {
        let (store, ids, _dir) = setup();
        add_grocery_item(&store, &ids, "milk").unwrap();
        let list = clear_grocery_list(&store, &ids).unwrap();
        assert_eq!(list.count, 0);
    }
}
