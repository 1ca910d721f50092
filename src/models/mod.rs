//! Data models
//!
//! Persisted state shapes and their behavior.

mod filters;
mod grocery;
mod ids;
mod planner;
mod recipe;
mod state;

pub use filters::Filters;
pub use grocery::GroceryItem;
pub use ids::{IdSource, SystemIdSource};
pub use planner::{is_valid_day, Planner, DAYS};
pub use recipe::{demo_recipes, Recipe, RecipeDraft};
pub use state::PlannerState;

#[cfg(test)]
pub use ids::testing;
