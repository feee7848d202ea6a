use chrono::{Datelike, NaiveDateTime};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::engine::metrics::DisplayMetrics;
use crate::engine::plan::{ComputedPlan, format_date};
use crate::ui::line::draw_line;
use crate::ui::theme::{LineColors, Theme};

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// The whole countdown screen: clock, plan name, date range, day counts and
/// percentage, one per row from the top-left corner.
pub struct PlanView<'a> {
    pub now: NaiveDateTime,
    pub plan: &'a ComputedPlan,
    pub metrics: &'a DisplayMetrics,
    pub theme: &'a Theme,
}

impl<'a> PlanView<'a> {
    pub fn new(
        now: NaiveDateTime,
        plan: &'a ComputedPlan,
        metrics: &'a DisplayMetrics,
        theme: &'a Theme,
    ) -> Self {
        Self {
            now,
            plan,
            metrics,
            theme,
        }
    }

    pub fn lines(&self) -> [(String, LineColors); 5] {
        let plain = self.theme.plain;
        let highlight = self.theme.highlight;
        let weekday = WEEKDAYS[self.now.weekday().num_days_from_sunday() as usize];
        let m = self.metrics;

        [
            (
                format!("{} ({weekday})", self.now.format(TIMESTAMP_FORMAT)),
                plain,
            ),
            (self.plan.name.clone(), highlight),
            (
                format!(
                    "{}〜{} まで",
                    format_date(self.plan.start),
                    format_date(self.plan.target)
                ),
                plain,
            ),
            (
                format!("残り {} 日 / {}日", m.days_remaining, m.total_span_days),
                plain,
            ),
            (
                format!(
                    "残り {}％ 1日あたり:{}%",
                    m.percent_complete, m.per_day_rate
                ),
                highlight,
            ),
        ]
    }
}

impl Widget for PlanView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row, (text, colors)) in self.lines().iter().enumerate() {
            let y = area.y.saturating_add(row as u16);
            if y >= area.bottom() {
                break;
            }
            draw_line(buf, area.x, y, text, *colors);
        }
    }
}
