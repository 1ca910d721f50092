//! Grocery list model

use serde::{Deserialize, Serialize};

use crate::ingredient::AggregatedEntry;

/// A line on the grocery list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    pub unit: String,
    pub qty: Option<f64>,
    #[serde(default)]
    pub checked: bool,
    pub label: String,
}

impl From<AggregatedEntry> for GroceryItem {
    fn from(entry: AggregatedEntry) -> Self {
        Self {
            name: entry.name,
            unit: entry.unit,
            qty: entry.quantity,
            checked: false,
            label: entry.label,
        }
    }
}
