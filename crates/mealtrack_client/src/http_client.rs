//! HTTP client implementation for the meal-store REST facade.
//!
//! This module provides a reqwest-based implementation of the
//! [`MealStore`](crate::MealStore) trait, including the per-day aggregation
//! of raw meal documents into [`DaySummary`] values.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::nutrient::{self, NutrientKey};
use crate::observability::{record_store_error, record_store_request};
use crate::retry::RetryPolicy;
use crate::{DaySummary, MealDocument, MealStore, MealStoreError, NutritionPlan};

/// Client for the meal-store REST facade using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestMealStoreClient {
    base_url: String,
    service_token: SecretString,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestMealStoreClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the store facade (e.g., "http://mealstore:8973")
    /// * `service_token` - Bearer token for service-to-service auth
    pub fn new(base_url: &str, service_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_token,
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self::new(&cfg.base_url, cfg.service_token.clone())
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.service_token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, MealStoreError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> MealStoreError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => MealStoreError::NotFound(body_snippet),
            401 | 403 => MealStoreError::Auth(body_snippet),
            _ => MealStoreError::Api {
                status,
                body: body_snippet,
            },
        }
    }

    /// GET with retry and metrics. Only used for reads where a 404 is a
    /// genuine failure rather than an expected outcome.
    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MealStoreError> {
        let started = Instant::now();
        let result = self
            .retry
            .retry_async(|| self.execute_json::<T>(self.get_request(url).query(query)))
            .await;
        match &result {
            Ok(_) => record_store_request(endpoint, started.elapsed()),
            Err(e) => {
                tracing::debug!(endpoint, error = %e, "meal store request failed");
                record_store_error(endpoint);
            }
        }
        result
    }
}

/// Numeric nutrient totals for one meal document. An `items` list takes
/// precedence over pre-computed `totals`; the legacy top-level `nutrition`
/// object is the last resort.
pub fn meal_totals(meal: &MealDocument) -> BTreeMap<NutrientKey, f64> {
    if let Some(items) = &meal.items {
        return items_totals(items);
    }
    if let Some(totals) = &meal.totals {
        return object_totals(totals);
    }
    if let Some(nutrition) = &meal.nutrition {
        return object_totals(nutrition);
    }
    BTreeMap::new()
}

fn object_totals(obj: &serde_json::Map<String, Value>) -> BTreeMap<NutrientKey, f64> {
    nutrient::resolve_totals(obj)
        .into_iter()
        .map(|(key, value)| (key, nutrient::parse_nutrient(&value)))
        .collect()
}

fn items_totals(items: &[serde_json::Map<String, Value>]) -> BTreeMap<NutrientKey, f64> {
    let mut acc: BTreeMap<NutrientKey, f64> = BTreeMap::new();
    for item in items {
        let qty = item
            .get("quantity")
            .and_then(Value::as_f64)
            .filter(|q| *q != 0.0)
            .unwrap_or(1.0);
        // Older documents nest nutrients under `nutrition`; newer ones
        // (imported from posts and meal plans) carry them flat.
        let source = item
            .get("nutrition")
            .and_then(Value::as_object)
            .unwrap_or(item);
        for (key, value) in nutrient::resolve_totals(source) {
            *acc.entry(key).or_insert(0.0) += nutrient::parse_nutrient(&value) * qty;
        }
    }
    acc
}

/// Group meal documents by calendar day and sum their totals. Output is
/// sorted by date ascending; meals without a parsable date are dropped.
pub fn aggregate_daily_summaries(meals: &[MealDocument]) -> Vec<DaySummary> {
    let mut by_day: BTreeMap<String, (u32, BTreeMap<NutrientKey, f64>)> = BTreeMap::new();
    for meal in meals {
        let Some(day) = meal.day_key() else { continue };
        let entry = by_day.entry(day).or_default();
        entry.0 += 1;
        for (key, value) in meal_totals(meal) {
            *entry.1.entry(key).or_insert(0.0) += value;
        }
    }

    by_day
        .into_iter()
        .map(|(date, (meal_count, totals))| DaySummary {
            date,
            meal_count,
            totals: totals
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect(),
        })
        .collect()
}

#[async_trait]
impl MealStore for ReqwestMealStoreClient {
    async fn get_active_plan(
        &self,
        user_id: &str,
    ) -> Result<Option<NutritionPlan>, MealStoreError> {
        let url = format!(
            "{}/v1/users/{}/nutrition-plans/active",
            self.base_url, user_id
        );
        // A 404 here means "no active plan", so this read skips the retry
        // wrapper and maps it to None instead of an error.
        let started = Instant::now();
        match self
            .execute_json::<NutritionPlan>(self.get_request(&url))
            .await
        {
            Ok(plan) => {
                record_store_request("active_plan", started.elapsed());
                Ok(Some(plan))
            }
            Err(MealStoreError::NotFound(_)) => {
                record_store_request("active_plan", started.elapsed());
                Ok(None)
            }
            Err(e) => {
                record_store_error("active_plan");
                Err(e)
            }
        }
    }

    async fn get_day_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<DaySummary, MealStoreError> {
        let summaries = self.get_range_summaries(user_id, date, date).await?;
        Ok(summaries
            .into_iter()
            .find(|s| s.date == date)
            .unwrap_or_else(|| DaySummary::empty(date)))
    }

    async fn get_range_summaries(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<DaySummary>, MealStoreError> {
        let url = format!("{}/v1/users/{}/meals", self.base_url, user_id);
        let meals: Vec<MealDocument> = self
            .fetch_json("meals", &url, &[("start", start), ("end", end)])
            .await?;
        tracing::debug!(
            user = user_id,
            start,
            end,
            meals = meals.len(),
            "fetched meal documents"
        );
        Ok(aggregate_daily_summaries(&meals))
    }
}
