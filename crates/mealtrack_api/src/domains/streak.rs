//! Meal-logging streaks over a date range.

use std::collections::HashMap;

use chrono::NaiveDate;
use mealtrack_client::DaySummary;

/// Length of the unbroken run of days with at least one logged meal,
/// walking backward from the range's end date and never crossing the
/// start. This is "current streak at range end", not "longest streak in
/// range": a gap anywhere before the final run is irrelevant.
///
/// Returns 0 for an empty summary list or unparsable boundary dates.
pub fn compute_streak(summaries: &[DaySummary], range_start: &str, range_end: &str) -> u32 {
    if summaries.is_empty() {
        return 0;
    }
    let (Ok(start), Ok(end)) = (
        NaiveDate::parse_from_str(range_start, "%Y-%m-%d"),
        NaiveDate::parse_from_str(range_end, "%Y-%m-%d"),
    ) else {
        return 0;
    };

    let meal_counts: HashMap<&str, u32> = summaries
        .iter()
        .map(|s| (s.date.as_str(), s.meal_count))
        .collect();

    let mut streak = 0;
    let mut current = end;
    while current >= start {
        let key = current.format("%Y-%m-%d").to_string();
        if meal_counts.get(key.as_str()).copied().unwrap_or(0) == 0 {
            break;
        }
        streak += 1;
        let Some(prev) = current.pred_opt() else {
            break;
        };
        current = prev;
    }
    streak
}
