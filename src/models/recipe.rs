//! Recipe model
//!
//! A recipe in the library, plus the draft shape used when creating or
//! updating one from client input.

use serde::{Deserialize, Serialize};

use crate::ingredient::sanitize;

use super::ids::IdSource;

/// A recipe in the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub servings: Option<i64>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: String,
}

/// Raw client input for creating or updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub servings: Option<i64>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text ingredient lines, one per element
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: String,
}

impl Recipe {
    /// Build a recipe from a sanitized draft.
    ///
    /// Tags are lowercased and sanitized, ingredient lines sanitized, and
    /// empties dropped. Returns Err when the title sanitizes to nothing.
    pub fn from_draft(id: String, draft: &RecipeDraft, description: String) -> Result<Self, String> {
        let title = sanitize(&draft.title);
        if title.is_empty() {
            return Err("Recipe title cannot be empty".to_string());
        }

        let tags: Vec<String> = draft
            .tags
            .iter()
            .map(|t| sanitize(t).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let ingredients: Vec<String> = draft
            .ingredients
            .iter()
            .map(|line| sanitize(line))
            .filter(|line| !line.is_empty())
            .collect();

        Ok(Self {
            id,
            title,
            favorite: draft.favorite,
            servings: draft.servings,
            time: draft.time,
            description,
            tags,
            ingredients,
            steps: sanitize(&draft.steps),
        })
    }
}

/// Starter recipes seeded when the library is empty
pub fn demo_recipes(ids: &dyn IdSource) -> Vec<Recipe> {
    vec![
        Recipe {
            id: ids.next_id(),
            title: "Lemon Garlic Pasta".to_string(),
            favorite: true,
            servings: Some(2),
            time: Some(20),
            description: "Bright, zesty weeknight pasta with pantry staples.".to_string(),
            tags: vec!["quick".into(), "vegetarian".into(), "pasta".into()],
            ingredients: vec![
                "200 g spaghetti".into(),
                "2 cloves garlic".into(),
                "1 tbsp olive oil".into(),
                "1 lemon".into(),
                "1/4 cup parmesan".into(),
                "salt".into(),
                "pepper".into(),
            ],
            steps: "Boil pasta. Saute garlic in oil. Toss with lemon juice and zest. \
                    Add pasta water and cheese. Season and serve."
                .to_string(),
        },
        Recipe {
            id: ids.next_id(),
            title: "Hearty Lentil Soup".to_string(),
            favorite: false,
            servings: Some(4),
            time: Some(35),
            description: "Comforting, protein-rich soup perfect for make-ahead.".to_string(),
            tags: vec!["soup".into(), "vegetarian".into(), "budget".into()],
            ingredients: vec![
                "1 cup lentils".into(),
                "1 onion".into(),
                "2 carrots".into(),
                "2 stalks celery".into(),
                "1 can tomatoes".into(),
                "1 tsp cumin".into(),
                "4 cups vegetable broth".into(),
                "salt".into(),
            ],
            steps: "Sweat aromatics. Add spices, lentils, tomatoes, broth. Simmer until tender."
                .to_string(),
        },
        Recipe {
            id: ids.next_id(),
            title: "Sheet Pan Chicken & Veg".to_string(),
            favorite: false,
            servings: Some(3),
            time: Some(30),
            description: "Minimal dishes, maximum flavor.".to_string(),
            tags: vec!["chicken".into(), "easy".into(), "sheet-pan".into()],
            ingredients: vec![
                "500 g chicken thighs".into(),
                "1 zucchini".into(),
                "1 red onion".into(),
                "1 bell pepper".into(),
                "2 tbsp olive oil".into(),
                "1 tsp paprika".into(),
                "salt".into(),
                "pepper".into(),
            ],
            steps: "Toss chicken and veg with oil and spices. Roast at 425F until done.".to_string(),
        },
    ]
}
