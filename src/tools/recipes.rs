//! Recipe library tools
//!
//! Recipe CRUD, favorites, tags, and the persisted library filters.

use serde::Serialize;

use crate::db::Store;
use crate::models::{IdSource, PlannerState, Recipe, RecipeDraft};

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub favorite: bool,
    pub servings: Option<i64>,
    pub time: Option<i64>,
    pub tags: Vec<String>,
    pub ingredient_count: usize,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            favorite: recipe.favorite,
            servings: recipe.servings,
            time: recipe.time,
            tags: recipe.tags.clone(),
            ingredient_count: recipe.ingredients.len(),
        }
    }
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    /// Matches after filtering
    pub count: usize,
    /// Library size before filtering
    pub total: usize,
}

/// Response for create_recipe and update_recipe
#[derive(Debug, Serialize)]
pub struct RecipeSavedResponse {
    pub id: String,
    pub title: String,
}

/// Response for delete_recipe
#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// Response for toggle_favorite
#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub id: String,
    pub favorite: bool,
}

/// Response for list_tags
#[derive(Debug, Serialize)]
pub struct ListTagsResponse {
    pub tags: Vec<String>,
}

/// Response for filter updates
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub search: String,
    pub tags: Vec<String>,
    pub favorites_only: bool,
}

impl FiltersResponse {
    fn from_state(state: &PlannerState) -> Self {
        Self {
            search: state.filters.search.clone(),
            tags: state.filters.tags.clone(),
            favorites_only: state.filters.favorites_only,
        }
    }
}

fn db_err(e: crate::db::DbError) -> String {
    format!("Database error: {}", e)
}

/// Create a new recipe at the front of the library
pub fn create_recipe(
    store: &Store,
    ids: &dyn IdSource,
    draft: RecipeDraft,
) -> Result<RecipeSavedResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let recipe = Recipe::from_draft(ids.next_id(), &draft, String::new())?;
    let response = RecipeSavedResponse {
        id: recipe.id.clone(),
        title: recipe.title.clone(),
    };

    state.recipes.insert(0, recipe);
    state.persist(store).map_err(db_err)?;
    Ok(response)
}

/// Replace an existing recipe's fields, preserving its description
pub fn update_recipe(
    store: &Store,
    ids: &dyn IdSource,
    id: &str,
    draft: RecipeDraft,
) -> Result<RecipeSavedResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let existing = state
        .find_recipe(id)
        .ok_or_else(|| format!("Recipe not found: {}", id))?;
    let description = existing.description.clone();

    let recipe = Recipe::from_draft(id.to_string(), &draft, description)?;
    let response = RecipeSavedResponse {
        id: recipe.id.clone(),
        title: recipe.title.clone(),
    };

    let slot = state
        .recipes
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| format!("Recipe not found: {}", id))?;
    *slot = recipe;

    state.persist(store).map_err(db_err)?;
    Ok(response)
}

/// Get a full recipe
pub fn get_recipe(store: &Store, ids: &dyn IdSource, id: &str) -> Result<Option<Recipe>, String> {
    let state = PlannerState::load(store, ids).map_err(db_err)?;
    Ok(state.find_recipe(id).cloned())
}

/// List recipes matching the persisted filters
pub fn list_recipes(store: &Store, ids: &dyn IdSource) -> Result<ListRecipesResponse, String> {
    let state = PlannerState::load(store, ids).map_err(db_err)?;
    let recipes: Vec<RecipeSummary> = state
        .recipes
        .iter()
        .filter(|r| state.filters.matches(r))
        .map(RecipeSummary::from)
        .collect();
    Ok(ListRecipesResponse {
        count: recipes.len(),
        total: state.recipes.len(),
        recipes,
    })
}

/// Delete a recipe and unassign it from every planner day
pub fn delete_recipe(
    store: &Store,
    ids: &dyn IdSource,
    id: &str,
) -> Result<DeleteRecipeResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let before = state.recipes.len();
    state.recipes.retain(|r| r.id != id);
    if state.recipes.len() == before {
        return Err(format!("Recipe not found: {}", id));
    }

    state.planner.remove_everywhere(id);
    state.persist(store).map_err(db_err)?;
    Ok(DeleteRecipeResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

/// Flip a recipe's favorite flag
pub fn toggle_favorite(
    store: &Store,
    ids: &dyn IdSource,
    id: &str,
) -> Result<ToggleFavoriteResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;

    let recipe = state
        .find_recipe_mut(id)
        .ok_or_else(|| format!("Recipe not found: {}", id))?;
    recipe.favorite = !recipe.favorite;
    let response = ToggleFavoriteResponse {
        id: recipe.id.clone(),
        favorite: recipe.favorite,
    };

    state.persist(store).map_err(db_err)?;
    Ok(response)
}

/// Sorted distinct tags across the library
pub fn list_tags(store: &Store, ids: &dyn IdSource) -> Result<ListTagsResponse, String> {
    let state = PlannerState::load(store, ids).map_err(db_err)?;
    Ok(ListTagsResponse {
        tags: state.tag_set(),
    })
}

/// Set the library search term
pub fn set_search_filter(
    store: &Store,
    ids: &dyn IdSource,
    query: &str,
) -> Result<FiltersResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;
    state.filters.search = query.to_string();
    state.persist(store).map_err(db_err)?;
    Ok(FiltersResponse::from_state(&state))
}

/// Toggle a tag in the filter selection
pub fn toggle_tag_filter(
    store: &Store,
    ids: &dyn IdSource,
    tag: &str,
) -> Result<FiltersResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;
    state.filters.toggle_tag(tag);
    state.persist(store).map_err(db_err)?;
    Ok(FiltersResponse::from_state(&state))
}

/// Flip the favorites-only flag
pub fn toggle_favorites_filter(
    store: &Store,
    ids: &dyn IdSource,
) -> Result<FiltersResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;
    state.filters.favorites_only = !state.filters.favorites_only;
    state.persist(store).map_err(db_err)?;
    Ok(FiltersResponse::from_state(&state))
}

/// Reset all filters
pub fn clear_filters(store: &Store, ids: &dyn IdSource) -> Result<FiltersResponse, String> {
    let mut state = PlannerState::load(store, ids).map_err(db_err)?;
    state.filters = Default::default();
    state.persist(store).map_err(db_err)?;
    Ok(FiltersResponse::from_state(&state))
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

    fn draft(title: &str) -> RecipeDraft {
        RecipeDraft {
            title: title.to_string(),
            ingredients: vec!["1 cup flour".into(), "2 eggs".into()],
            tags: vec!["Baking".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_inserts_at_front() {
        let (store, ids, _dir) = setup();
        let created = create_recipe(&store, &ids, draft("Pancakes")).unwrap();

        let listed = list_recipes(&store, &ids).unwrap();
        assert_eq!(listed.total, 4); // 3 demo recipes + the new one
        assert_eq!(listed.recipes[0].id, created.id);
        assert_eq!(listed.recipes[0].tags, vec!["baking"]);
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let (store, ids, _dir) = setup();
        assert!(create_recipe(&store, &ids, draft("   ")).is_err());
    }

    #[test]
    fn test_update_preserves_description() {
        let (store, ids, _dir) = setup();
        let state = PlannerState::load(&store, &ids).unwrap();
        let target = state.recipes[0].clone();
        assert!(!target.description.is_empty());

        update_recipe(&store, &ids, &target.id, draft("Renamed")).unwrap();
        let updated = get_recipe(&store, &ids, &target.id).unwrap().unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, target.description);
    }

    #[test]
    fn test_update_unknown_id_is_error() {
        let (store, ids, _dir) = setup();
        assert!(update_recipe(&store, &ids, "r_missing", draft("X")).is_err());
    }

    #[test]
    fn test_delete_scrubs_planner() {
        let (store, ids, _dir) = setup();
        let created = create_recipe(&store, &ids, draft("Soup")).unwrap();
        crate::tools::planner::plan_recipe(&store, &ids, &created.id, "Mon").unwrap();

        delete_recipe(&store, &ids, &created.id).unwrap();

        let state = PlannerState::load(&store, &ids).unwrap();
        assert!(state.find_recipe(&created.id).is_none());
        assert!(state.planner.get("Mon").is_empty());
    }

    #[test]
    fn test_toggle_favorite() {
        let (store, ids, _dir) = setup();
        let created = create_recipe(&store, &ids, draft("Stew")).unwrap();
        let on = toggle_favorite(&store, &ids, &created.id).unwrap();
        assert!(on.favorite);
        let off = toggle_favorite(&store, &ids, &created.id).unwrap();
        assert!(!off.favorite);
    }

    #[test]
    fn test_list_applies_persisted_filters() {
        let (store, ids, _dir) = setup();
        toggle_favorites_filter(&store, &ids).unwrap();

        // Only the favorite demo recipe remains
        let listed = list_recipes(&store, &ids).unwrap();
        assert_eq!(listed.count, 1);
        assert!(listed.recipes[0].favorite);

        clear_filters(&store, &ids).unwrap();
        assert_eq!(list_recipes(&store, &ids).unwrap().count, 3);
    }

    #[test]
    fn test_search_filter_matches_ingredients() {
        let (store, ids, _dir) = setup();
        set_search_filter(&store, &ids, "lentils").unwrap();
        let listed = list_recipes(&store, &ids).unwrap();
        assert_eq!(listed.count, 1);
        assert_eq!(listed.recipes[0].title, "Hearty Lentil Soup");
    }

    #[test]
    fn test_tag_filter_toggles() {
        let (store, ids, _dir) = setup();
        toggle_tag_filter(&store, &ids, "vegetarian").unwrap();
        assert_eq!(list_recipes(&store, &ids).unwrap().count, 2);
        toggle_tag_filter(&store, &ids, "vegetarian").unwrap();
        assert_eq!(list_recipes(&store, &ids).unwrap().count, 3);
    }

    #[test]
    fn test_list_tags_sorted() {
        let (store, ids, _dir) = setup();
        let tags = list_tags(&store, &ids).unwrap().tags;
        assert!(tags.windows(2).all(|w| w[0] <= w[1]));
        assert!(tags.contains(&"quick".to_string()));
    }
}
