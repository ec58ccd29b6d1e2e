//! Canonical nutrient keys and total parsing of heterogeneous nutrient
//! values.
//!
//! Meal documents written by different app versions key their nutrients
//! loosely (`totalCarb` vs `totalCarbs` vs `carbs`) and store values as
//! numbers or unit-suffixed strings ("12g", "450mg"). Everything is
//! normalized here, at the ingestion boundary, so downstream code only ever
//! sees canonical keys and finite floats.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tracked nutrient, in its canonical wire spelling.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum NutrientKey {
    Calories,
    Protein,
    TotalFat,
    SaturatedFat,
    TotalCarbs,
    Fiber,
    Sugars,
    Sodium,
    Cholesterol,
}

impl NutrientKey {
    pub const ALL: [NutrientKey; 9] = [
        NutrientKey::Calories,
        NutrientKey::Protein,
        NutrientKey::TotalFat,
        NutrientKey::SaturatedFat,
        NutrientKey::TotalCarbs,
        NutrientKey::Fiber,
        NutrientKey::Sugars,
        NutrientKey::Sodium,
        NutrientKey::Cholesterol,
    ];

    /// Canonical field name, as serialized in summaries and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            NutrientKey::Calories => "calories",
            NutrientKey::Protein => "protein",
            NutrientKey::TotalFat => "totalFat",
            NutrientKey::SaturatedFat => "saturatedFat",
            NutrientKey::TotalCarbs => "totalCarbs",
            NutrientKey::Fiber => "fiber",
            NutrientKey::Sugars => "sugars",
            NutrientKey::Sodium => "sodium",
            NutrientKey::Cholesterol => "cholesterol",
        }
    }

    /// Human-readable name used in guidance text.
    pub fn display_name(self) -> &'static str {
        match self {
            NutrientKey::Calories => "Calories",
            NutrientKey::Protein => "Protein",
            NutrientKey::TotalFat => "Total Fat",
            NutrientKey::SaturatedFat => "Saturated Fat",
            NutrientKey::TotalCarbs => "Total Carbohydrates",
            NutrientKey::Fiber => "Fiber",
            NutrientKey::Sugars => "Sugars",
            NutrientKey::Sodium => "Sodium",
            NutrientKey::Cholesterol => "Cholesterol",
        }
    }

    /// Field names that may carry this nutrient in a raw document,
    /// canonical spelling first. Resolution takes the first non-empty one.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            NutrientKey::Calories => &["calories"],
            NutrientKey::Protein => &["protein"],
            NutrientKey::TotalFat => &["totalFat"],
            NutrientKey::SaturatedFat => &["saturatedFat"],
            NutrientKey::TotalCarbs => &["totalCarbs", "totalCarb", "carbs"],
            NutrientKey::Fiber => &["fiber", "dietaryFiber"],
            NutrientKey::Sugars => &["sugars"],
            NutrientKey::Sodium => &["sodium"],
            NutrientKey::Cholesterol => &["cholesterol"],
        }
    }

    /// Resolve a raw field name (canonical or alias) to its canonical key.
    pub fn from_key(key: &str) -> Option<Self> {
        NutrientKey::ALL
            .into_iter()
            .find(|k| k.aliases().contains(&key))
    }
}

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("static regex is valid"));

/// Parse a nutrient value that may arrive as a JSON number, a unit-suffixed
/// string, null, or anything else a document happens to hold.
///
/// Total over its input domain: unparsable input yields 0, and minus signs
/// are stripped along with units, so the result is always a finite
/// non-negative float.
pub fn parse_nutrient(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(f64::abs).unwrap_or(0.0),
        Value::String(s) => parse_nutrient_str(s),
        _ => 0.0,
    }
}

/// String form of [`parse_nutrient`]: drop every character that is not a
/// digit or a decimal point, then read the leading float.
pub fn parse_nutrient_str(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    parse_leading_float(&NON_NUMERIC.replace_all(raw, ""))
}

/// `parseFloat` semantics: skip leading whitespace, accept an optional sign,
/// read the longest valid decimal prefix. 0 when nothing numeric leads the
/// string.
pub fn parse_leading_float(s: &str) -> f64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i = 1;
    }
    let mut end = i;
    let mut seen_digit = false;
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                i += 1;
                end = i;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
                if seen_digit {
                    end = i;
                }
            }
            _ => break,
        }
    }
    if !seen_digit {
        return 0.0;
    }
    t[..end].parse::<f64>().unwrap_or(0.0)
}

/// Resolve a loosely-keyed nutrient object into canonical keys. For each
/// canonical key the first non-empty alias present in the object wins;
/// keys with no usable alias are absent from the result.
pub fn resolve_totals(raw: &serde_json::Map<String, Value>) -> BTreeMap<NutrientKey, Value> {
    let mut out = BTreeMap::new();
    for key in NutrientKey::ALL {
        for alias in key.aliases() {
            match raw.get(*alias) {
                Some(v) if !is_empty_value(v) => {
                    out.insert(key, v.clone());
                    break;
                }
                _ => {}
            }
        }
    }
    out
}

fn is_empty_value(v: &Value) -> bool {
    v.is_null() || matches!(v, Value::String(s) if s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_nutrient_handles_unit_suffixes() {
        assert_eq!(parse_nutrient(&json!("12g")), 12.0);
        assert_eq!(parse_nutrient(&json!("12.5mg")), 12.5);
        assert_eq!(parse_nutrient(&json!("450 mg")), 450.0);
        assert_eq!(parse_nutrient(&json!(200)), 200.0);
        assert_eq!(parse_nutrient(&json!(13.7)), 13.7);
    }

    #[test]
    fn parse_nutrient_is_total_over_garbage() {
        assert_eq!(parse_nutrient(&Value::Null), 0.0);
        assert_eq!(parse_nutrient(&json!("")), 0.0);
        assert_eq!(parse_nutrient(&json!("abc")), 0.0);
        assert_eq!(parse_nutrient(&json!(true)), 0.0);
        assert_eq!(parse_nutrient(&json!({"nested": 1})), 0.0);
        assert_eq!(parse_nutrient(&json!([1, 2])), 0.0);
    }

    #[test]
    fn parse_nutrient_strips_negative_signs() {
        // Sign characters are dropped with the rest of the non-numeric
        // noise, so output is never negative.
        assert_eq!(parse_nutrient(&json!("-5g")), 5.0);
        assert_eq!(parse_nutrient(&json!(-3.5)), 3.5);
    }

    #[test]
    fn parse_nutrient_takes_leading_float_from_messy_strings() {
        assert_eq!(parse_nutrient_str("12.5.3"), 12.5);
        assert_eq!(parse_nutrient_str(".5g"), 0.5);
    }

    #[test]
    fn parse_leading_float_matches_parsefloat() {
        assert_eq!(parse_leading_float("2000"), 2000.0);
        assert_eq!(parse_leading_float("  65 g"), 65.0);
        assert_eq!(parse_leading_float("-12.5"), -12.5);
        assert_eq!(parse_leading_float("g12"), 0.0);
        assert_eq!(parse_leading_float(""), 0.0);
    }

    #[test]
    fn from_key_accepts_aliases() {
        assert_eq!(NutrientKey::from_key("totalCarb"), Some(NutrientKey::TotalCarbs));
        assert_eq!(NutrientKey::from_key("carbs"), Some(NutrientKey::TotalCarbs));
        assert_eq!(NutrientKey::from_key("dietaryFiber"), Some(NutrientKey::Fiber));
        assert_eq!(NutrientKey::from_key("calories"), Some(NutrientKey::Calories));
        assert_eq!(NutrientKey::from_key("caffeine"), None);
    }

    #[test]
    fn resolve_totals_first_non_empty_alias_wins() {
        let raw = json!({
            "totalCarbs": "",
            "totalCarb": "45g",
            "carbs": "99g",
            "dietaryFiber": 6,
            "calories": null
        });
        let resolved = resolve_totals(raw.as_object().unwrap());
        assert_eq!(resolved.get(&NutrientKey::TotalCarbs), Some(&json!("45g")));
        assert_eq!(resolved.get(&NutrientKey::Fiber), Some(&json!(6)));
        assert!(!resolved.contains_key(&NutrientKey::Calories));
    }

    #[test]
    fn nutrient_key_serializes_to_canonical_name() {
        let s = serde_json::to_string(&NutrientKey::TotalCarbs).unwrap();
        assert_eq!(s, "\"totalCarbs\"");
        let k: NutrientKey = serde_json::from_str("\"saturatedFat\"").unwrap();
        assert_eq!(k, NutrientKey::SaturatedFat);
    }
}
