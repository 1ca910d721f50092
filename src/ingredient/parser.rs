//! Ingredient line parsing
//!
//! Extracts a leading quantity, unit, and name from free-text lines like
//! "1 1/2 cups sugar". Parsing never fails: malformed numeric text just
//! means the line has no quantity.

use serde::{Deserialize, Serialize};

/// A single parsed ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Numeric quantity, if the line started with one
    pub quantity: Option<f64>,
    /// The token following the quantity (empty when no quantity or no token)
    pub unit: String,
    /// The rest of the line, trimmed and de-punctuated at the end
    pub name: String,
}

/// Strip control characters (0x00-0x1F and 0x7F) and trim whitespace
pub fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// True for tokens of the form `digits '/' digits`
fn is_simple_fraction(token: &str) -> bool {
    match token.split_once('/') {
        Some((num, den)) => {
            !num.is_empty()
                && !den.is_empty()
                && num.bytes().all(|b| b.is_ascii_digit())
                && den.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Evaluate a `digits '/' digits` token. Zero denominators are not a quantity.
fn parse_fraction(token: &str) -> Option<f64> {
    let (num, den) = token.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

/// Parse a single token as a quantity: simple fraction first, then plain float.
///
/// A token that looks like a fraction but has a zero denominator yields no
/// quantity at all; it does not fall through to the float parse.
fn parse_qty_token(token: &str) -> Option<f64> {
    if is_simple_fraction(token) {
        return parse_fraction(token);
    }
    token.parse::<f64>().ok()
}

/// True for tokens made purely of ASCII digits
fn is_plain_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parse one free-text ingredient line.
///
/// A mixed number ("1 1/2") is tried before a single-token quantity. After
/// the quantity, the next token becomes the unit and the remainder the name.
/// Lines with no leading quantity keep the whole sanitized line as the name.
///
/// Known quirk, kept for grouping compatibility: a line like "2 eggs"
/// consumes "eggs" as the unit, which empties the name and triggers the
/// fallback that restores the full line as the name.
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    let raw = sanitize(line);
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    if tokens.is_empty() {
        return ParsedIngredient {
            quantity: None,
            unit: String::new(),
            name: raw,
        };
    }

    let mut quantity = None;
    let mut consumed = 0;

    // Mixed number: "1 1/2" = 1 + 1/2
    if tokens.len() >= 2 && is_plain_integer(tokens[0]) && is_simple_fraction(tokens[1]) {
        if let (Ok(whole), Some(frac)) = (tokens[0].parse::<f64>(), parse_fraction(tokens[1])) {
            quantity = Some(whole + frac);
            consumed = 2;
        }
    }

    if quantity.is_none() {
        if let Some(q) = parse_qty_token(tokens[0]) {
            quantity = Some(q);
            consumed = 1;
        }
    }

    let (unit, name) = if quantity.is_some() {
        let unit = tokens.get(consumed).copied().unwrap_or("").to_string();
        let name_start = consumed + usize::from(!unit.is_empty());
        let name = if name_start < tokens.len() {
            tokens[name_start..].join(" ")
        } else {
            String::new()
        };
        (unit, name)
    } else {
        (String::new(), raw.clone())
    };

    let name = name.trim_end_matches([',', '.', ';']).trim().to_string();
    let name = if name.is_empty() { raw } else { name };

    ParsedIngredient {
        quantity,
        unit,
        name,
    }
}
