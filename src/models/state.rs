//! Persisted application state
//!
//! The full planner state, owned by callers and passed explicitly into
//! operations. Loaded from the store section by section with fallbacks,
//! and persisted back as a whole.

use serde::{Deserialize, Serialize};

use crate::db::{DbResult, Store};

use super::filters::Filters;
use super::grocery::GroceryItem;
use super::ids::IdSource;
use super::planner::Planner;
use super::recipe::{demo_recipes, Recipe};

/// Store section names
const RECIPES: &str = "recipes";
const PLANNER: &str = "planner";
const GROCERY: &str = "grocery";
const FILTERS: &str = "filters";

/// The complete persisted state of the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerState {
    pub recipes: Vec<Recipe>,
    pub planner: Planner,
    pub grocery: Vec<GroceryItem>,
    pub filters: Filters,
}

impl PlannerState {
    /// Load state from the store, seeding demo recipes when the library is
    /// empty, and persist the resolved state back so seeded ids stay stable.
    pub fn load(store: &Store, ids: &dyn IdSource) -> DbResult<Self> {
        let recipes: Vec<Recipe> = store.load(RECIPES, Vec::new());
        let recipes = if recipes.is_empty() {
            demo_recipes(ids)
        } else {
            recipes
        };

        let state = Self {
            recipes,
            planner: store.load(PLANNER, Planner::empty()),
            grocery: store.load(GROCERY, Vec::new()),
            filters: store.load(FILTERS, Filters::default()),
        };
        state.persist(store)?;
        Ok(state)
    }

    /// Save every section back to the store
    pub fn persist(&self, store: &Store) -> DbResult<()> {
        store.save(RECIPES, &self.recipes)?;
        store.save(PLANNER, &self.planner)?;
        store.save(GROCERY, &self.grocery)?;
        store.save(FILTERS, &self.filters)?;
        Ok(())
    }

    pub fn find_recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn find_recipe_mut(&mut self, id: &str) -> Option<&mut Recipe> {
        self.recipes.iter_mut().find(|r| r.id == id)
    }

    /// Sorted distinct tags across the library
    pub fn tag_set(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .recipes
            .iter()
            .flat_map(|r| r.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}
