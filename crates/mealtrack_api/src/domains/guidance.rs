//! Call-to-action text for a day's unmet metrics.

use std::collections::BTreeMap;

use mealtrack_client::nutrient::NutrientKey;

use crate::types::{CallToAction, ProgressRecord, ProgressStatus};

/// Build the day's suggestion, or `None` when every metric is at least
/// close to target.
///
/// A day with 3+ logged meals is treated as closed for eating, so the
/// advice points at tomorrow; with fewer meals the day may still be in
/// progress and the advice targets the next meal.
pub fn build_call_to_action(
    meal_count: u32,
    progress: &BTreeMap<NutrientKey, ProgressRecord>,
) -> Option<CallToAction> {
    let unmet: Vec<String> = progress
        .iter()
        .filter(|(_, record)| record.status == ProgressStatus::Below)
        .map(|(key, _)| key.display_name().to_string())
        .collect();

    if unmet.is_empty() {
        return None;
    }

    let list = unmet.join(", ");
    let message = if meal_count >= 3 {
        format!("Tomorrow make sure you hit {list} to close the gap.")
    } else {
        format!("For your next meal focus on {list} to stay on track.")
    };

    Some(CallToAction {
        message,
        macros: unmet,
    })
}
