//! Nutrition progress and trend reports over a meal store.
//!
//! The analytics live in [`domains`] as pure functions over already-fetched
//! data; [`ProgressService`] is the thin async layer that pulls the active
//! plan and day summaries from the store and runs the pipeline.

use std::sync::Arc;

use mealtrack_client::MealStore;
use tracing::debug;

pub mod auth;
pub mod domains;
pub mod error;
pub mod types;

use domains::{progress, range, streak, trend};
use error::{ApiError, ApiResult};
use types::{DateRange, RangeReport, TodayReport};

/// Builds progress and trend reports for one user at a time.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn MealStore>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn MealStore>) -> Self {
        Self { store }
    }

    /// Today's progress against the active plan. `None` when the user has
    /// no active plan.
    pub async fn today(&self, user_id: &str, date: &str) -> ApiResult<Option<TodayReport>> {
        parse_date(date)?;
        let Some(plan) = self.store.get_active_plan(user_id).await? else {
            debug!(%user_id, "no active plan");
            return Ok(None);
        };
        let metrics = plan.enabled_metrics();
        let summary = self.store.get_day_summary(user_id, date).await?;
        let totals = range::numeric_totals(&summary.totals);
        Ok(Some(TodayReport {
            plan_name: plan.display_name(),
            date: summary.date,
            meal_count: summary.meal_count,
            progress: progress::build_progress(&totals, &metrics),
        }))
    }

    /// Per-day aggregates, trend and streak for an inclusive date range.
    /// `None` when the user has no active plan.
    pub async fn range(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> ApiResult<Option<RangeReport>> {
        let parsed_start = parse_date(start)?;
        let parsed_end = parse_date(end)?;
        if parsed_start > parsed_end {
            return Err(ApiError::Validation(format!(
                "range start {start} is after end {end}"
            )));
        }
        let Some(plan) = self.store.get_active_plan(user_id).await? else {
            debug!(%user_id, "no active plan");
            return Ok(None);
        };
        let metrics = plan.enabled_metrics();
        let summaries = self.store.get_range_summaries(user_id, start, end).await?;
        debug!(%user_id, %start, %end, days = summaries.len(), "building range report");

        let days = range::build_day_aggregates(&summaries, &metrics);
        let trend = trend::compute_trend(&days, &metrics);
        let streak = streak::compute_streak(&summaries, start, end);

        Ok(Some(RangeReport {
            plan_name: plan.display_name(),
            plan_id: plan.id,
            range: DateRange {
                start: start.to_string(),
                end: end.to_string(),
            },
            days,
            trend,
            streak,
        }))
    }
}

fn parse_date(value: &str) -> ApiResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("expected a YYYY-MM-DD date, got {value:?}")))
}
