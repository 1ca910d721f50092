//! Shopping-list aggregation
//!
//! Groups parsed ingredient lines by normalized name + unit, sums their
//! quantities, and renders a human-readable label per group.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::parser::{parse_ingredient, ParsedIngredient};

/// One consolidated shopping-list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    /// Original-case name of the first-seen variant in the group
    pub name: String,
    /// Grouping unit, matched case-sensitively
    pub unit: String,
    /// Sum of numeric quantities, rounded to 2 decimals; None when the sum is not positive
    pub quantity: Option<f64>,
    /// Number of lines in the group that carried no numeric quantity
    pub count: u32,
    /// Display label, e.g. "1.5 cups sugar" or "2x eggs"
    pub label: String,
}

/// Normalize an ingredient name for grouping: lowercase, keep only
/// `[a-z0-9 ]`, collapse whitespace
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | ' '))
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Running totals for one grouping key
struct Group {
    name: String,
    unit: String,
    qty: f64,
    count_null: u32,
}

fn grouping_key(parsed: &ParsedIngredient) -> String {
    format!("{}|{}", normalize_name(&parsed.name), parsed.unit)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Render a quantity without a trailing ".0" (2 -> "2", 1.5 -> "1.5")
fn quantity_text(v: f64) -> String {
    format!("{}", v)
}

/// Aggregate free-text ingredient lines into shopping-list entries.
///
/// Lines that sanitize to nothing are skipped. Output order is the
/// first-seen order of distinct grouping keys. When a group has both a
/// positive quantity sum and quantity-less lines, the numeric sum wins
/// the label; the "Nx" form only appears for groups with no summed
/// quantity.
pub fn aggregate_ingredients<I, S>(lines: I) -> Vec<AggregatedEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for line in lines {
        let parsed = parse_ingredient(line.as_ref());
        // Empty name means the line was empty or whitespace-only
        if parsed.name.is_empty() {
            continue;
        }

        let key = grouping_key(&parsed);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group {
                name: parsed.name.clone(),
                unit: parsed.unit.clone(),
                qty: 0.0,
                count_null: 0,
            }
        });

        match parsed.quantity {
            Some(q) => group.qty += q,
            None => group.count_null += 1,
        }
    }

    order
        .iter()
        .map(|key| {
            let group = &groups[key];
            let rounded = round2(group.qty);
            let qty_text = if group.qty > 0.0 {
                quantity_text(rounded)
            } else if group.count_null > 0 {
                format!("{}x", group.count_null)
            } else {
                String::new()
            };

            let label = [qty_text.as_str(), group.unit.as_str(), group.name.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");

            AggregatedEntry {
                name: group.name.clone(),
                unit: group.unit.clone(),
                quantity: (group.qty > 0.0).then_some(rounded),
                count: group.count_null,
                label,
            }
        })
        .collect()
}
