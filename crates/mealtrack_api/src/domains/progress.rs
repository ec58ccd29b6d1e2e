//! Per-metric progress scoring against the active plan.

use std::collections::BTreeMap;

use mealtrack_client::MetricDefinition;
use mealtrack_client::nutrient::NutrientKey;

use crate::types::{ProgressRecord, ProgressStatus};

/// Score a day's consumed totals against the plan's enabled metrics.
///
/// `percentage` is `round(current / target * 100)`; a zero or unparsable
/// target scores 0% instead of dividing by zero. `remaining` never goes
/// negative. Pure function of its inputs.
pub fn build_progress(
    consumed: &BTreeMap<NutrientKey, f64>,
    metrics: &BTreeMap<NutrientKey, &MetricDefinition>,
) -> BTreeMap<NutrientKey, ProgressRecord> {
    metrics
        .iter()
        .map(|(key, metric)| {
            let target = metric.target_value();
            let current = consumed.get(key).copied().unwrap_or(0.0);
            let percentage = if target > 0.0 {
                (current / target * 100.0).round() as i64
            } else {
                0
            };
            let record = ProgressRecord {
                current,
                target,
                unit: metric.unit.clone(),
                percentage,
                remaining: (target - current).max(0.0),
                status: ProgressStatus::from_percentage(percentage),
            };
            (*key, record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric(target: serde_json::Value, unit: &str) -> MetricDefinition {
        serde_json::from_value(json!({"enabled": true, "target": target, "unit": unit}))
            .expect("metric")
    }

    fn single(
        key: NutrientKey,
        metric: &MetricDefinition,
    ) -> BTreeMap<NutrientKey, &MetricDefinition> {
        BTreeMap::from([(key, metric)])
    }

    #[test]
    fn close_at_eighty_percent() {
        let m = metric(json!("2000"), "kcal");
        let consumed = BTreeMap::from([(NutrientKey::Calories, 1600.0)]);
        let progress = build_progress(&consumed, &single(NutrientKey::Calories, &m));
        let record = &progress[&NutrientKey::Calories];
        assert_eq!(record.percentage, 80);
        assert_eq!(record.status, ProgressStatus::Close);
    }

    #[test]
    fn below_with_remaining() {
        let m = metric(json!("2000"), "kcal");
        let consumed = BTreeMap::from([(NutrientKey::Calories, 1500.0)]);
        let progress = build_progress(&consumed, &single(NutrientKey::Calories, &m));
        let record = &progress[&NutrientKey::Calories];
        assert_eq!(record.percentage, 75);
        assert_eq!(record.remaining, 500.0);
        assert_eq!(record.status, ProgressStatus::Below);
    }

    #[test]
    fn met_clamps_remaining_to_zero() {
        let m = metric(json!("2000"), "kcal");
        let consumed = BTreeMap::from([(NutrientKey::Calories, 2100.0)]);
        let progress = build_progress(&consumed, &single(NutrientKey::Calories, &m));
        let record = &progress[&NutrientKey::Calories];
        assert_eq!(record.percentage, 105);
        assert_eq!(record.remaining, 0.0);
        assert_eq!(record.status, ProgressStatus::Met);
    }

    #[test]
    fn zero_target_scores_zero_percent() {
        let m = metric(json!("0"), "g");
        let consumed = BTreeMap::from([(NutrientKey::Protein, 120.0)]);
        let progress = build_progress(&consumed, &single(NutrientKey::Protein, &m));
        assert_eq!(progress[&NutrientKey::Protein].percentage, 0);

        let garbage = metric(json!("soon"), "g");
        let progress = build_progress(&consumed, &single(NutrientKey::Protein, &garbage));
        assert_eq!(progress[&NutrientKey::Protein].percentage, 0);
    }

    #[test]
    fn missing_consumed_value_reads_as_zero() {
        let m = metric(json!("30"), "g");
        let progress = build_progress(&BTreeMap::new(), &single(NutrientKey::Fiber, &m));
        let record = &progress[&NutrientKey::Fiber];
        assert_eq!(record.current, 0.0);
        assert_eq!(record.remaining, 30.0);
        assert_eq!(record.status, ProgressStatus::Below);
    }

    #[test]
    fn percentage_is_monotonic_in_current() {
        let m = metric(json!("100"), "g");
        let metrics = single(NutrientKey::Protein, &m);
        let mut last = i64::MIN;
        for current in [0.0, 10.0, 49.9, 50.0, 99.0, 100.0, 250.0] {
            let consumed = BTreeMap::from([(NutrientKey::Protein, current)]);
            let pct = build_progress(&consumed, &metrics)[&NutrientKey::Protein].percentage;
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let m = metric(json!("150"), "g");
        let metrics = single(NutrientKey::Protein, &m);
        let consumed = BTreeMap::from([(NutrientKey::Protein, 87.3)]);
        assert_eq!(
            build_progress(&consumed, &metrics),
            build_progress(&consumed, &metrics)
        );
    }
}
