use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Persisted application settings. Field names are part of the on-disk
/// format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Display refresh interval in milliseconds.
    #[serde(rename = "FlushRate", default)]
    pub flush_rate: i64,
    #[serde(rename = "MyPlan", default)]
    pub plan: PlanRecord,
}

/// A plan as stored on disk. Dates are `YYYY/MM/DD`, and `StartDate` may be
/// the literal `"Now"`, which is replaced by the launch date on first use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "StartDate", default)]
    pub start_date: String,
    #[serde(rename = "TargetDate", default)]
    pub target_date: String,
}

pub const START_NOW: &str = "Now";

fn default_flush_rate() -> i64 {
    10
}

fn default_plan() -> PlanRecord {
    PlanRecord {
        name: "２０１８年まで".to_string(),
        start_date: "2017/01/01".to_string(),
        target_date: "2018/01/01".to_string(),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flush_rate: default_flush_rate(),
            plan: default_plan(),
        }
    }
}

impl Settings {
    /// Returns a description of the first violated constraint, if any.
    pub fn validate(&self) -> Option<String> {
        if self.flush_rate <= 0 {
            return Some(format!(
                "FlushRate must be 1 or greater (got {})",
                self.flush_rate
            ));
        }
        None
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.flush_rate.max(1) as u64)
    }

    /// Replace a plan with no fields set at all by the default plan.
    /// Returns true if the plan was replaced.
    pub fn fill_blank_plan(&mut self) -> bool {
        if self.plan.is_blank() {
            self.plan = default_plan();
            return true;
        }
        false
    }
}

impl PlanRecord {
    pub fn new(name: &str, start_date: &str, target_date: &str) -> Self {
        Self {
            name: name.to_string(),
            start_date: start_date.to_string(),
            target_date: target_date.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.start_date.is_empty() && self.target_date.is_empty()
    }
}
