use chrono::NaiveDate;

use crate::config::{PlanRecord, START_NOW};

pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Substituted for any stored date that cannot be parsed.
pub const SENTINEL_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 2) {
    Some(d) => d,
    None => panic!("invalid sentinel date"),
};

/// Runtime form of a plan with parsed calendar dates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedPlan {
    pub name: String,
    pub start: NaiveDate,
    pub target: NaiveDate,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict, zero-padded `YYYY/MM/DD`. Anything that would not
/// format back to the same string is rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    (format_date(date) == raw).then_some(date)
}

/// Parse a stored plan, normalizing it along the way.
///
/// `"Now"` as a start date becomes `today`. Each unparsable date is
/// independently replaced by [`SENTINEL_DATE`]. Every substitution is
/// reflected in the returned record so it can be persisted.
pub fn resolve_plan(record: &PlanRecord, today: NaiveDate) -> (ComputedPlan, PlanRecord) {
    let mut normalized = record.clone();

    if normalized.start_date == START_NOW {
        normalized.start_date = format_date(today);
        log::info!("start date resolved to {}", normalized.start_date);
    }

    let start = resolve_field(&mut normalized.start_date, "start");
    let target = resolve_field(&mut normalized.target_date, "target");

    let plan = ComputedPlan {
        name: normalized.name.clone(),
        start,
        target,
    };
    (plan, normalized)
}

fn resolve_field(raw: &mut String, label: &str) -> NaiveDate {
    match parse_date(raw) {
        Some(date) => date,
        None => {
            log::warn!("unparsable {label} date {raw:?}, using {SENTINEL_DATE}");
            *raw = format_date(SENTINEL_DATE);
            SENTINEL_DATE
        }
    }
}
