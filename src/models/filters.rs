//! Library view filters
//!
//! Search term, tag selection, and favorites-only flag applied when
//! listing the recipe library.

use serde::{Deserialize, Serialize};

use super::recipe::Recipe;

/// Persisted library filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorites_only: bool,
}

impl Filters {
    /// True when a recipe passes every active filter.
    ///
    /// The search term matches case-insensitively against the title or the
    /// joined ingredient text; selected tags must all be present.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if self.favorites_only && !recipe.favorite {
            return false;
        }

        let term = self.search.to_lowercase();
        let matches_term = term.is_empty()
            || recipe.title.to_lowercase().contains(&term)
            || recipe.ingredients.join(" ").to_lowercase().contains(&term);
        if !matches_term {
            return false;
        }

        self.tags.iter().all(|tag| recipe.tags.contains(tag))
    }

    /// Toggle a tag in the selection. Returns true when the tag is now active.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(i) => {
                self.tags.remove(i);
                false
            }
            None => {
                self.tags.push(tag.to_string());
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        Recipe {
            id: "r_1".into(),
            title: "Lemon Garlic Pasta".into(),
            favorite: false,
            servings: None,
            time: None,
            description: String::new(),
            tags: vec!["quick".into(), "pasta".into()],
            ingredients: vec!["200 g spaghetti".into(), "2 cloves garlic".into()],
            steps: String::new(),
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(Filters::default().matches(&recipe()));
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let filters = Filters {
            search: "LEMON".into(),
            ..Default::default()
        };
        assert!(filters.matches(&recipe()));
    }

    #[test]
    fn test_search_matches_ingredient_text() {
        let filters = Filters {
            search: "spaghetti".into(),
            ..Default::default()
        };
        assert!(filters.matches(&recipe()));
    }

    #[test]
    fn test_search_miss() {
        let filters = Filters {
            search: "chocolate".into(),
            ..Default::default()
        };
        assert!(!filters.matches(&recipe()));
    }

    #[test]
    fn test_all_selected_tags_must_match() {
        let mut filters = Filters {
            tags: vec!["quick".into()],
            ..Default::default()
        };
        assert!(filters.matches(&recipe()));
        filters.tags.push("soup".into());
        assert!(!filters.matches(&recipe()));
    }

    #[test]
    fn test_favorites_only() {
        let filters = Filters {
            favorites_only: true,
            ..Default::default()
        };
        assert!(!filters.matches(&recipe()));
        let mut fav = recipe();
        fav.favorite = true;
        assert!(filters.matches(&fav));
    }

    #[test]
    fn test_toggle_tag() {
        let mut filters = Filters::default();
        assert!(filters.toggle_tag("quick"));
        assert_eq!(filters.tags, vec!["quick"]);
        assert!(!filters.toggle_tag("quick"));
        assert!(filters.tags.is_empty());
    }
}
