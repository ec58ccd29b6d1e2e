//! Wire types for the progress endpoints. Field names mirror the JSON
//! envelope the frontend already consumes, hence the camelCase renames.

use std::collections::BTreeMap;

use mealtrack_client::RawTotals;
use mealtrack_client::nutrient::NutrientKey;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tri-state progress status against a metric's daily target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Met,
    Close,
    Below,
}

impl ProgressStatus {
    /// 100% and above is met, 80–99% is close, everything under is below.
    pub fn from_percentage(percentage: i64) -> Self {
        if percentage >= 100 {
            ProgressStatus::Met
        } else if percentage >= 80 {
            ProgressStatus::Close
        } else {
            ProgressStatus::Below
        }
    }
}

/// One enabled metric scored against the plan for a single day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub current: f64,
    pub target: f64,
    pub unit: String,
    pub percentage: i64,
    pub remaining: f64,
    pub status: ProgressStatus,
}

pub type ProgressMap = BTreeMap<NutrientKey, ProgressRecord>;

/// Templated suggestion naming the metrics that fell short of target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub message: String,
    pub macros: Vec<String>,
}

/// One calendar day in a range response.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayAggregate {
    pub date: String,
    pub meal_count: u32,
    /// The totals exactly as accumulated, for display.
    pub totals_formatted: RawTotals,
    /// The same totals after nutrient parsing, canonical keys only.
    pub totals_numeric: BTreeMap<NutrientKey, f64>,
    pub progress: ProgressMap,
    pub call_to_action: Option<CallToAction>,
}

/// One day of the trend feed.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeriesPoint {
    pub date: String,
    pub meal_count: u32,
    pub values: BTreeMap<NutrientKey, f64>,
    pub targets: BTreeMap<NutrientKey, f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Discretize a per-meal change percentage with a ±5% dead band.
    pub fn from_change_percent(change: f64) -> Self {
        if change > 5.0 {
            TrendDirection::Up
        } else if change < -5.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }
}

/// Whole-range trend for one enabled metric.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrend {
    pub average_per_day: f64,
    pub average_per_meal: f64,
    pub change_per_meal_percent: f64,
    pub direction: TrendDirection,
    pub target: f64,
}

/// Human-readable sentence derived from a metric's trend.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub metric: NutrientKey,
    pub direction: TrendDirection,
    pub change_percent: f64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub series: Vec<TrendSeriesPoint>,
    pub metrics: BTreeMap<NutrientKey, MetricTrend>,
    pub narratives: Vec<Narrative>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Body of `GET /api/nutrition-progress/today` when a plan is active.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayReport {
    pub plan_name: String,
    pub date: String,
    pub meal_count: u32,
    pub progress: ProgressMap,
}

/// Body of `GET /api/nutrition-progress/range` when a plan is active.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    pub plan_name: String,
    pub plan_id: Option<String>,
    pub range: DateRange,
    pub days: Vec<DayAggregate>,
    pub trend: TrendReport,
    pub streak: u32,
}
