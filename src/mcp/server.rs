//! Mealplan MCP Server Implementation
//!
//! Implements the MCP server with all planner tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Store;
use crate::models::{IdSource, RecipeDraft, SystemIdSource};
use crate::tools::grocery;
use crate::tools::planner;
use crate::tools::recipes;
use crate::tools::status::{StatusTracker, PLANNER_INSTRUCTIONS};

/// Mealplan MCP Service
#[derive(Clone)]
pub struct PlannerService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    store: Store,
    ids: Arc<dyn IdSource>,
    tool_router: ToolRouter<PlannerService>,
}

impl PlannerService {
    pub fn new(database_path: PathBuf, store: Store) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            store,
            ids: Arc::new(SystemIdSource::new()),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Recipe title
    pub title: String,
    /// Mark as favorite (default false)
    #[serde(default)]
    pub favorite: bool,
    /// Number of servings (optional)
    pub servings: Option<i64>,
    /// Preparation time in minutes (optional)
    pub time: Option<i64>,
    /// Tags, lowercased on save (e.g. ["quick", "vegetarian"])
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text ingredient lines, one per element (e.g. "1 1/2 cups sugar")
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Preparation steps as free text
    #[serde(default)]
    pub steps: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe id to update
    pub id: String,
    /// New title
    pub title: String,
    /// Favorite flag
    #[serde(default)]
    pub favorite: bool,
    /// Number of servings (optional)
    pub servings: Option<i64>,
    /// Preparation time in minutes (optional)
    pub time: Option<i64>,
    /// Tags, lowercased on save
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text ingredient lines, one per element
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Preparation steps as free text
    #[serde(default)]
    pub steps: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe id
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe id to delete
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleFavoriteParams {
    /// Recipe id
    pub id: String,
}

// ============================================================================
// Filter Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetSearchFilterParams {
    /// Search term matched against titles and ingredient text (empty clears)
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleTagFilterParams {
    /// Tag to toggle in the filter selection
    pub tag: String,
}

// ============================================================================
// Planner Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanRecipeParams {
    /// Recipe id to plan
    pub recipe_id: String,
    /// Day of the week: Mon, Tue, Wed, Thu, Fri, Sat, or Sun
    pub day: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UnplanRecipeParams {
    /// Recipe id to remove
    pub recipe_id: String,
    /// Day of the week: Mon, Tue, Wed, Thu, Fri, Sat, or Sun
    pub day: String,
}

// ============================================================================
// Grocery Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeToGroceryParams {
    /// Recipe whose ingredients to append to the grocery list
    pub recipe_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddGroceryItemParams {
    /// Free-text line, e.g. "2 cans beans" or "coffee"
    pub line: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGroceryCheckedParams {
    /// Zero-based index into the grocery list
    pub index: usize,
    /// Mark purchased (true) or not (false)
    pub checked: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveGroceryItemParams {
    /// Zero-based index into the grocery list
    pub index: usize,
}

fn to_json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl PlannerService {
    // --- Status ---

    #[tool(description = "Get the current status of the mealplan service including build info, database status, and library counts")]
    async fn planner_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker
            .get_status(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for planning meals and generating grocery lists. Call this when starting a planning session.")]
    fn planner_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            PLANNER_INSTRUCTIONS,
        )]))
    }

    // --- Recipes ---

    #[tool(description = "Create a new recipe with free-text ingredient lines")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let draft = RecipeDraft {
            title: p.title, favorite: p.favorite, servings: p.servings, time: p.time,
            tags: p.tags, ingredients: p.ingredients, steps: p.steps,
        };
        let result = recipes::create_recipe(&self.store, self.ids.as_ref(), draft)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get a full recipe by id, including its ingredient lines and steps")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.store, self.ids.as_ref(), &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => to_json_result(&recipe),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Recipe not found", "id": "{}"}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List recipes matching the persisted library filters (search term, tags, favorites)")]
    fn list_recipes(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Update a recipe's fields (title, tags, ingredients, steps, servings, time, favorite)")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let draft = RecipeDraft {
            title: p.title, favorite: p.favorite, servings: p.servings, time: p.time,
            tags: p.tags, ingredients: p.ingredients, steps: p.steps,
        };
        let result = recipes::update_recipe(&self.store, self.ids.as_ref(), &p.id, draft)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Delete a recipe and unassign it from every planner day")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.store, self.ids.as_ref(), &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Toggle a recipe's favorite flag")]
    fn toggle_favorite(&self, Parameters(p): Parameters<ToggleFavoriteParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::toggle_favorite(&self.store, self.ids.as_ref(), &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List every tag used in the recipe library, sorted")]
    fn list_tags(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::list_tags(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Filters ---

    #[tool(description = "Set the library search filter (matches titles and ingredient text)")]
    fn set_search_filter(&self, Parameters(p): Parameters<SetSearchFilterParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::set_search_filter(&self.store, self.ids.as_ref(), &p.query)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Toggle a tag in the library filter selection; selected tags must all match")]
    fn toggle_tag_filter(&self, Parameters(p): Parameters<ToggleTagFilterParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::toggle_tag_filter(&self.store, self.ids.as_ref(), &p.tag)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Toggle the favorites-only library filter")]
    fn toggle_favorites_filter(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::toggle_favorites_filter(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Clear the search term, tag selection, and favorites-only filter")]
    fn clear_filters(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::clear_filters(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Planner ---

    #[tool(description = "Assign a recipe to a day of the week (Mon..Sun)")]
    fn plan_recipe(&self, Parameters(p): Parameters<PlanRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = planner::plan_recipe(&self.store, self.ids.as_ref(), &p.recipe_id, &p.day)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Remove a recipe from a day of the week")]
    fn unplan_recipe(&self, Parameters(p): Parameters<UnplanRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = planner::unplan_recipe(&self.store, self.ids.as_ref(), &p.recipe_id, &p.day)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the weekly planner, Monday first, with planned recipe titles")]
    fn get_planner(&self) -> Result<CallToolResult, McpError> {
        let result = planner::get_planner(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Grocery ---

    #[tool(description = "Replace the grocery list with an aggregate of every planned recipe's ingredients. Equivalent ingredients are merged and their quantities summed.")]
    fn generate_grocery_list(&self) -> Result<CallToolResult, McpError> {
        let result = grocery::generate_grocery_list(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Aggregate one recipe's ingredients and append them to the grocery list")]
    fn add_recipe_to_grocery(&self, Parameters(p): Parameters<AddRecipeToGroceryParams>) -> Result<CallToolResult, McpError> {
        let result = grocery::add_recipe_to_grocery(&self.store, self.ids.as_ref(), &p.recipe_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Parse a free-text line (e.g. \"2 cans beans\") and add it to the top of the grocery list")]
    fn add_grocery_item(&self, Parameters(p): Parameters<AddGroceryItemParams>) -> Result<CallToolResult, McpError> {
        let result = grocery::add_grocery_item(&self.store, self.ids.as_ref(), &p.line)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Mark a grocery item purchased or not, by list index")]
    fn set_grocery_checked(&self, Parameters(p): Parameters<SetGroceryCheckedParams>) -> Result<CallToolResult, McpError> {
        let result = grocery::set_grocery_checked(&self.store, self.ids.as_ref(), p.index, p.checked)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Remove a grocery item by list index")]
    fn remove_grocery_item(&self, Parameters(p): Parameters<RemoveGroceryItemParams>) -> Result<CallToolResult, McpError> {
        let result = grocery::remove_grocery_item(&self.store, self.ids.as_ref(), p.index)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Empty the grocery list")]
    fn clear_grocery_list(&self) -> Result<CallToolResult, McpError> {
        let result = grocery::clear_grocery_list(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the current grocery list")]
    fn get_grocery_list(&self) -> Result<CallToolResult, McpError> {
        let result = grocery::get_grocery_list(&self.store, self.ids.as_ref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PlannerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mealplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Mealplan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Mealplan - weekly recipe planning and grocery lists. \
                 IMPORTANT: Call planner_instructions when starting a planning session. \
                 Recipes: create/get/list/update/delete_recipe, toggle_favorite, list_tags. \
                 Filters: set_search_filter, toggle_tag_filter, toggle_favorites_filter, clear_filters \
                 (list_recipes applies them). \
                 Planner: plan_recipe/unplan_recipe (days Mon..Sun), get_planner. \
                 Grocery: generate_grocery_list (from planner), add_recipe_to_grocery, \
                 add_grocery_item, set_grocery_checked, remove_grocery_item, clear_grocery_list, \
                 get_grocery_list. \
                 Ingredient lines are free text; quantities support fractions and mixed numbers. \
                 There is no unit conversion between grams and cups."
                    .into(),
            ),
        }
    }
}
