//! Per-meal trend analysis over a chronologically ordered day sequence.
//!
//! Change is measured per meal, not per day: a nutrient increase that is
//! purely the result of logging more meals should not read as a dietary
//! trend.

use std::collections::BTreeMap;

use mealtrack_client::MetricDefinition;
use mealtrack_client::nutrient::NutrientKey;

use crate::types::{DayAggregate, MetricTrend, Narrative, TrendDirection, TrendReport, TrendSeriesPoint};

/// Compute the whole-range trend report. Returns empty shapes when there
/// are no days or no enabled metrics.
///
/// The first/second-half split takes `ceil(n/2)` days from each end, so the
/// halves share the middle day when `n` is odd. Longstanding production
/// behavior that the narrative wording depends on; see the
/// `odd_day_counts_share_the_middle_day` test before changing it.
pub fn compute_trend(
    days: &[DayAggregate],
    metrics: &BTreeMap<NutrientKey, &MetricDefinition>,
) -> TrendReport {
    if metrics.is_empty() || days.is_empty() {
        return TrendReport {
            series: Vec::new(),
            metrics: BTreeMap::new(),
            narratives: Vec::new(),
        };
    }

    let series: Vec<TrendSeriesPoint> = days
        .iter()
        .map(|day| TrendSeriesPoint {
            date: day.date.clone(),
            meal_count: day.meal_count,
            values: metrics
                .keys()
                .map(|key| (*key, day.totals_numeric.get(key).copied().unwrap_or(0.0)))
                .collect(),
            targets: metrics
                .iter()
                .map(|(key, metric)| (*key, metric.target_value()))
                .collect(),
        })
        .collect();

    let n = days.len();
    let half = n.div_ceil(2).max(1);
    let total_meals: u32 = days.iter().map(|d| d.meal_count).sum();
    let first_meals: u32 = days[..half].iter().map(|d| d.meal_count).sum();
    let second_meals: u32 = days[n - half..].iter().map(|d| d.meal_count).sum();

    let mut metric_trends = BTreeMap::new();
    let mut narratives = Vec::new();

    for (key, metric) in metrics {
        let values: Vec<f64> = series.iter().map(|point| point.values[key]).collect();
        let total: f64 = values.iter().sum();
        let average_per_day = total / n as f64;
        let average_per_meal = if total_meals > 0 {
            total / f64::from(total_meals)
        } else {
            0.0
        };

        let first_sum: f64 = values[..half].iter().sum();
        let second_sum: f64 = values[n - half..].iter().sum();
        let first_avg_per_meal = if first_meals > 0 {
            first_sum / f64::from(first_meals)
        } else {
            0.0
        };
        let second_avg_per_meal = if second_meals > 0 {
            second_sum / f64::from(second_meals)
        } else {
            0.0
        };

        let change_per_meal_percent = if first_avg_per_meal > 0.0 {
            (second_avg_per_meal - first_avg_per_meal) / first_avg_per_meal * 100.0
        } else {
            0.0
        };

        let direction = TrendDirection::from_change_percent(change_per_meal_percent);

        metric_trends.insert(
            *key,
            MetricTrend {
                average_per_day,
                average_per_meal,
                change_per_meal_percent,
                direction,
                target: metric.target_value(),
            },
        );

        narratives.push(Narrative {
            metric: *key,
            direction,
            change_percent: change_per_meal_percent,
            message: narrative_message(*key, direction, change_per_meal_percent),
        });
    }

    TrendReport {
        series,
        metrics: metric_trends,
        narratives,
    }
}

fn narrative_message(key: NutrientKey, direction: TrendDirection, change: f64) -> String {
    let rounded = change.round().abs() as i64;
    match direction {
        TrendDirection::Up => format!(
            "Since the start of this range, your average {} per meal increased by {rounded}%",
            key.as_str()
        ),
        TrendDirection::Down => format!(
            "Since the start of this range, your average {} per meal decreased by {rounded}%",
            key.as_str()
        ),
        TrendDirection::Flat => format!(
            "Your average {} per meal has stayed about the same over this range",
            key.as_str()
        ),
    }
}
