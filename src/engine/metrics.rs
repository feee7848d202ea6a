use chrono::NaiveDate;

use crate::engine::plan::ComputedPlan;

/// Day counts derived from a plan for a given day.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMetrics {
    /// Days from start to target, at least 1.
    pub total_span_days: i64,
    /// Days from today to target, at least 0.
    pub days_remaining: i64,
    /// Share of the span still remaining, truncated to a whole percent.
    pub percent_complete: i64,
    /// Percent of the span covered by a single day.
    pub per_day_rate: f64,
}

pub fn compute_metrics(plan: &ComputedPlan, today: NaiveDate) -> DisplayMetrics {
    let total_span_days = plan.target.signed_duration_since(plan.start).num_days().max(1);
    let days_remaining = plan.target.signed_duration_since(today).num_days().max(0);

    // Remaining over span, not elapsed over span. The label on screen reads
    // "残り" (remaining) and this is what users have always seen.
    let percent_complete = (days_remaining as f64 / total_span_days as f64 * 100.0) as i64;
    let per_day_rate = 100.0 / total_span_days as f64;

    DisplayMetrics {
        total_span_days,
        days_remaining,
        percent_complete,
        per_day_rate,
    }
}
