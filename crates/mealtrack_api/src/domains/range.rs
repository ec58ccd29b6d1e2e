//! Per-day aggregates across a requested date range.

use std::collections::BTreeMap;

use mealtrack_client::nutrient::{self, NutrientKey};
use mealtrack_client::{DaySummary, MetricDefinition, RawTotals};

use crate::domains::{guidance, progress};
use crate::types::DayAggregate;

/// Run every raw total through the nutrient parser. Every canonical key is
/// present in the result; keys the day has no data for read as 0.
pub fn numeric_totals(raw: &RawTotals) -> BTreeMap<NutrientKey, f64> {
    NutrientKey::ALL
        .into_iter()
        .map(|key| {
            let value = raw.get(&key).map(nutrient::parse_nutrient).unwrap_or(0.0);
            (key, value)
        })
        .collect()
}

/// One aggregate per provider day: parsed totals alongside the originals,
/// per-metric progress, and the day's call-to-action. Day order is
/// whatever the provider returned (its contract is date-ascending).
pub fn build_day_aggregates(
    summaries: &[DaySummary],
    metrics: &BTreeMap<NutrientKey, &MetricDefinition>,
) -> Vec<DayAggregate> {
    summaries
        .iter()
        .map(|summary| {
            let totals_numeric = numeric_totals(&summary.totals);
            let progress = progress::build_progress(&totals_numeric, metrics);
            let call_to_action = guidance::build_call_to_action(summary.meal_count, &progress);
            DayAggregate {
                date: summary.date.clone(),
                meal_count: summary.meal_count,
                totals_formatted: summary.totals.clone(),
                totals_numeric,
                progress,
                call_to_action,
            }
        })
        .collect()
}
