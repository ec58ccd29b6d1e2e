//! End-to-end service tests against an in-memory meal store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use mealtrack_api::ProgressService;
use mealtrack_api::error::ApiError;
use mealtrack_api::types::{ProgressStatus, TrendDirection};
use mealtrack_client::nutrient::NutrientKey;
use mealtrack_client::{DaySummary, MealStore, MealStoreError, NutritionPlan};

struct MockMealStore {
    plan: Option<NutritionPlan>,
    days: HashMap<String, DaySummary>,
}

impl MockMealStore {
    fn new(plan: Option<serde_json::Value>, days: Vec<serde_json::Value>) -> Self {
        let plan = plan.map(|p| serde_json::from_value(p).expect("plan fixture"));
        let days = days
            .into_iter()
            .map(|d| {
                let summary: DaySummary = serde_json::from_value(d).expect("day fixture");
                (summary.date.clone(), summary)
            })
            .collect();
        Self { plan, days }
    }

    fn service(self) -> ProgressService {
        ProgressService::new(Arc::new(self))
    }
}

#[async_trait]
impl MealStore for MockMealStore {
    async fn get_active_plan(
        &self,
        _user_id: &str,
    ) -> Result<Option<NutritionPlan>, MealStoreError> {
        Ok(self.plan.clone())
    }

    async fn get_day_summary(
        &self,
        _user_id: &str,
        date: &str,
    ) -> Result<DaySummary, MealStoreError> {
        Ok(self
            .days
            .get(date)
            .cloned()
            .unwrap_or_else(|| DaySummary::empty(date)))
    }

    async fn get_range_summaries(
        &self,
        _user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<DaySummary>, MealStoreError> {
        let mut summaries: Vec<DaySummary> = self
            .days
            .values()
            .filter(|s| s.date.as_str() >= start && s.date.as_str() <= end)
            .cloned()
            .collect();
        summaries.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(summaries)
    }
}

fn bulking_plan() -> serde_json::Value {
    json!({
        "id": "plan-1",
        "presetName": "Bulking",
        "isActive": true,
        "metrics": {
            "calories": {"enabled": true, "target": "2000", "unit": "kcal"},
            "protein": {"enabled": true, "target": 150, "unit": "g"},
            "sodium": {"enabled": false, "target": "2300", "unit": "mg"}
        }
    })
}

fn day(date: &str, meal_count: u32, calories: &str, protein: &str) -> serde_json::Value {
    json!({
        "date": date,
        "mealCount": meal_count,
        "totals": {"calories": calories, "protein": protein}
    })
}

#[tokio::test]
async fn today_scores_against_enabled_metrics_only() {
    let store = MockMealStore::new(
        Some(bulking_plan()),
        vec![day("2024-01-05", 2, "1600 kcal", "90g")],
    );
    let report = store
        .service()
        .today("u1", "2024-01-05")
        .await
        .expect("today")
        .expect("active plan");

    assert_eq!(report.plan_name, "Bulking");
    assert_eq!(report.date, "2024-01-05");
    assert_eq!(report.meal_count, 2);

    let calories = &report.progress[&NutrientKey::Calories];
    assert_eq!(calories.percentage, 80);
    assert_eq!(calories.status, ProgressStatus::Close);

    let protein = &report.progress[&NutrientKey::Protein];
    assert_eq!(protein.current, 90.0);
    assert_eq!(protein.remaining, 60.0);
    assert_eq!(protein.status, ProgressStatus::Below);

    // Disabled metric never shows up.
    assert!(!report.progress.contains_key(&NutrientKey::Sodium));
}

#[tokio::test]
async fn today_with_no_logged_meals_reads_all_zero() {
    let store = MockMealStore::new(Some(bulking_plan()), vec![]);
    let report = store
        .service()
        .today("u1", "2024-01-05")
        .await
        .expect("today")
        .expect("active plan");

    assert_eq!(report.meal_count, 0);
    let calories = &report.progress[&NutrientKey::Calories];
    assert_eq!(calories.current, 0.0);
    assert_eq!(calories.remaining, 2000.0);
}

#[tokio::test]
async fn range_builds_days_trend_and_streak() {
    let store = MockMealStore::new(
        Some(bulking_plan()),
        vec![
            day("2024-01-01", 1, "1000", "50g"),
            day("2024-01-02", 1, "1000", "50g"),
            // gap on 2024-01-03
            day("2024-01-04", 1, "2000", "120g"),
            day("2024-01-05", 1, "2000", "120g"),
        ],
    );
    let report = store
        .service()
        .range("u1", "2024-01-01", "2024-01-05")
        .await
        .expect("range")
        .expect("active plan");

    assert_eq!(report.plan_name, "Bulking");
    assert_eq!(report.plan_id.as_deref(), Some("plan-1"));
    assert_eq!(report.range.start, "2024-01-01");
    assert_eq!(report.range.end, "2024-01-05");

    // Only logged days appear; each carries progress for the day.
    assert_eq!(report.days.len(), 4);
    assert_eq!(report.days[0].date, "2024-01-01");
    assert_eq!(
        report.days[0].progress[&NutrientKey::Calories].status,
        ProgressStatus::Below
    );
    assert_eq!(
        report.days[3].progress[&NutrientKey::Calories].status,
        ProgressStatus::Met
    );

    // Per-meal calories doubled between halves.
    let trend = &report.trend.metrics[&NutrientKey::Calories];
    assert_eq!(trend.direction, TrendDirection::Up);
    assert_eq!(trend.change_per_meal_percent, 100.0);
    assert_eq!(report.trend.series.len(), 4);

    // The gap on 01-03 limits the streak to the final two days.
    assert_eq!(report.streak, 2);
}

#[tokio::test]
async fn no_active_plan_yields_none() {
    let store = MockMealStore::new(None, vec![day("2024-01-05", 2, "1600", "90g")]);
    let service = store.service();
    assert!(service.today("u1", "2024-01-05").await.expect("today").is_none());
    assert!(
        service
            .range("u1", "2024-01-01", "2024-01-05")
            .await
            .expect("range")
            .is_none()
    );
}

#[tokio::test]
async fn inverted_or_malformed_ranges_are_rejected() {
    let store = MockMealStore::new(Some(bulking_plan()), vec![]);
    let service = store.service();

    let err = service
        .range("u1", "2024-01-05", "2024-01-01")
        .await
        .expect_err("inverted range");
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service
        .range("u1", "soon", "2024-01-05")
        .await
        .expect_err("malformed start");
    assert!(matches!(err, ApiError::Validation(_)));

    let err = service
        .today("u1", "01/05/2024")
        .await
        .expect_err("malformed date");
    assert!(matches!(err, ApiError::Validation(_)));
}
