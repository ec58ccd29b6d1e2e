//! Minimal `MealStore` trait, domain types, and a reqwest-based client for
//! the meal-store REST facade.

use std::collections::BTreeMap;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod nutrient;
pub mod observability;
pub mod retry;
pub mod utils;

use nutrient::NutrientKey;

#[derive(Debug, Error)]
pub enum MealStoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store returned status {status}: {body}")]
    Api { status: u16, body: String },
}

/// One tracked metric in a nutrition plan. `target` is kept as raw JSON
/// because plan editors have written it both as a numeric string ("2000")
/// and as a plain number.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MetricDefinition {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub target: serde_json::Value,
    #[serde(default)]
    pub unit: String,
}

impl MetricDefinition {
    /// Numeric target: a number is taken as-is, a string is parsed from its
    /// leading float, anything else is 0.
    pub fn target_value(&self) -> f64 {
        match &self.target {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => nutrient::parse_leading_float(s),
            _ => 0.0,
        }
    }
}

/// A user's nutrition plan document. Metrics are keyed by raw field names
/// exactly as stored; resolve through [`NutritionPlan::enabled_metrics`]
/// before doing arithmetic with them.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPlan {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub preset_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricDefinition>,
}

impl NutritionPlan {
    pub fn display_name(&self) -> String {
        self.preset_name
            .clone()
            .unwrap_or_else(|| "Custom Plan".to_string())
    }

    /// Enabled metrics resolved to canonical keys. Unknown keys (plans are
    /// free-form documents) are skipped rather than rejected.
    pub fn enabled_metrics(&self) -> BTreeMap<NutrientKey, &MetricDefinition> {
        self.metrics
            .iter()
            .filter(|(_, metric)| metric.enabled)
            .filter_map(|(key, metric)| NutrientKey::from_key(key).map(|k| (k, metric)))
            .collect()
    }
}

/// Nutrient totals as they were accumulated, before numeric parsing.
pub type RawTotals = BTreeMap<NutrientKey, serde_json::Value>;

/// One calendar day of logged meals: the meal count and the summed raw
/// totals. Days without meals never appear in provider output.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: String, // YYYY-MM-DD
    pub meal_count: u32,
    #[serde(default)]
    pub totals: RawTotals,
}

impl DaySummary {
    /// Zero-meal placeholder for a day the store has nothing for.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            meal_count: 0,
            totals: BTreeMap::new(),
        }
    }
}

/// A raw meal document from the store. Three shapes exist in the wild:
/// an `items` list (each item either nests its nutrients under `nutrition`
/// or carries them flat), pre-computed `totals`, or a legacy top-level
/// `nutrition` object.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealDocument {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub meal_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    #[serde(default)]
    pub totals: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub nutrition: Option<serde_json::Map<String, serde_json::Value>>,
}

impl MealDocument {
    /// Calendar day this meal belongs to, normalized to YYYY-MM-DD.
    /// `mealDate` wins over the older `date` field.
    pub fn day_key(&self) -> Option<String> {
        self.meal_date
            .as_deref()
            .or(self.date.as_deref())
            .and_then(utils::normalize_date_str)
    }
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Read-side provider for everything the progress analytics needs: the
/// active plan and per-day meal summaries. Implementations own all I/O;
/// everything downstream of this trait is synchronous and pure.
#[async_trait]
pub trait MealStore: Send + Sync + 'static {
    /// The user's active nutrition plan, or `None` when no plan is active.
    async fn get_active_plan(&self, user_id: &str)
    -> Result<Option<NutritionPlan>, MealStoreError>;

    /// Summary for a single calendar day; a zero-meal summary when nothing
    /// was logged.
    async fn get_day_summary(&self, user_id: &str, date: &str)
    -> Result<DaySummary, MealStoreError>;

    /// Summaries for every day in the inclusive range that has at least one
    /// logged meal, sorted by date ascending.
    async fn get_range_summaries(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<DaySummary>, MealStoreError>;
}
