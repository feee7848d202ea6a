use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Settings;
use crate::engine::metrics::{DisplayMetrics, compute_metrics};
use crate::engine::plan::{ComputedPlan, resolve_plan};
use crate::event::{AppEvent, EventHandler};
use crate::store::json_store::JsonStore;
use crate::ui::components::plan_view::PlanView;
use crate::ui::theme::Theme;

/// Everything the screen shows. Only the event loop mutates it; the
/// background producers never see it.
pub struct App {
    pub settings: Settings,
    pub plan: ComputedPlan,
    pub metrics: DisplayMetrics,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    /// Resolve the plan in `settings`, writing any normalization back into
    /// `settings.plan` so the caller can persist it.
    pub fn new(mut settings: Settings, today: NaiveDate) -> Self {
        let (plan, normalized) = resolve_plan(&settings.plan, today);
        settings.plan = normalized;
        let metrics = compute_metrics(&plan, today);
        Self {
            settings,
            plan,
            metrics,
            theme: Theme::default(),
            should_quit: false,
        }
    }

    /// Startup sequence: load or create the settings file, fall back to the
    /// defaults on any load failure, normalize the plan and save the result.
    /// Progress goes to the console since the terminal UI is not up yet.
    pub fn bootstrap(store: &JsonStore, today: NaiveDate) -> Self {
        println!("Settings file: {}", store.path().display());
        log::info!("settings file {}", store.path().display());

        let mut settings = if store.exists() {
            println!("Loading settings...");
            match store.load() {
                Ok(settings) => settings,
                Err(e) => {
                    println!("{e}");
                    log::warn!("falling back to default settings: {e}");
                    Settings::default()
                }
            }
        } else {
            println!("No settings file found. Creating one and starting with defaults.");
            save_or_report(store, &Settings::default());
            Settings::default()
        };
        println!("Settings loaded. Starting.");

        if settings.fill_blank_plan() {
            log::info!("plan was blank, using the default plan");
        }

        let app = Self::new(settings, today);
        save_or_report(store, &app.settings);
        app
    }

    /// Startup guarded by a terminal check. A failing check returns before
    /// the settings file is read or written, so `"Now"` is not consumed by a
    /// launch that cannot show anything.
    pub fn start<F>(store: &JsonStore, today: NaiveDate, check_terminal: F) -> Result<Self>
    where
        F: FnOnce() -> Result<()>,
    {
        check_terminal()?;
        Ok(Self::bootstrap(store, today))
    }

    pub fn view(&self, now: NaiveDateTime) -> PlanView<'_> {
        PlanView::new(now, &self.plan, &self.metrics, &self.theme)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if ctrl_c || key.code == KeyCode::Esc {
            log::info!("quit requested");
            self.should_quit = true;
        }
    }

    pub fn roll_over(&mut self, today: NaiveDate) {
        self.metrics = compute_metrics(&self.plan, today);
        log::debug!("metrics for {today}: {:?}", self.metrics);
    }

    /// Main loop: one event per iteration until a quit key arrives.
    /// `render` draws and flushes a complete frame.
    pub fn run<F>(&mut self, events: &EventHandler, mut render: F) -> Result<()>
    where
        F: FnMut(&App) -> Result<()>,
    {
        loop {
            match events.next()? {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Refresh => render(self)?,
                AppEvent::DayRollover => self.roll_over(Local::now().date_naive()),
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

fn save_or_report(store: &JsonStore, settings: &Settings) {
    if let Err(e) = store.save(settings) {
        eprintln!("Could not save settings: {e:#}");
        log::error!("saving settings failed: {e:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanRecord;
    use crossbeam_channel::{Sender, bounded};
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn test_app() -> App {
        let settings = Settings {
            flush_rate: 10,
            plan: PlanRecord::new("Test", "2020/01/01", "2020/01/11"),
        };
        App::new(settings, date(2020, 1, 6))
    }

    struct Channels {
        keys: Sender<KeyEvent>,
        refresh: Sender<()>,
        rollover: Sender<()>,
    }

    fn test_events() -> (Channels, EventHandler) {
        let (keys, key_rx) = bounded(1);
        let (refresh, refresh_rx) = bounded(1);
        let (rollover, rollover_rx) = bounded(1);
        (
            Channels {
                keys,
                refresh,
                rollover,
            },
            EventHandler::from_channels(key_rx, refresh_rx, rollover_rx),
        )
    }

    #[test]
    fn test_new_computes_metrics() {
        let app = test_app();
        assert_eq!(app.metrics.total_span_days, 10);
        assert_eq!(app.metrics.days_remaining, 5);
        assert_eq!(app.metrics.percent_complete, 50);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_new_writes_normalization_back() {
        let settings = Settings {
            flush_rate: 10,
            plan: PlanRecord::new("p", "Now", "garbage"),
        };
        let app = App::new(settings, date(2026, 10, 19));
        assert_eq!(app.settings.plan.start_date, "2026/10/19");
        assert_eq!(app.settings.plan.target_date, "2000/01/02");
        assert_eq!(app.plan.start, date(2026, 10, 19));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);

        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('c'), KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Char('q'), KeyModifiers::NONE));
        app.handle_key(key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_released_escape_ignored() {
        let mut app = test_app();
        let mut release = key(KeyCode::Esc, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_key(release);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_roll_over_recomputes_for_new_day() {
        let mut app = test_app();
        app.roll_over(date(2020, 1, 7));
        assert_eq!(app.metrics.days_remaining, 4);
        assert_eq!(app.metrics.percent_complete, 40);

        app.roll_over(date(2020, 2, 1));
        assert_eq!(app.metrics.days_remaining, 0);
    }

    #[test]
    fn test_run_renders_on_refresh_and_exits_on_escape() {
        let mut app = test_app();
        let (tx, events) = test_events();

        let handle = std::thread::spawn(move || {
            tx.refresh.send(()).unwrap();
            tx.refresh.send(()).unwrap();
            tx.keys
                .send(key(KeyCode::Char('x'), KeyModifiers::NONE))
                .unwrap();
            tx.refresh.send(()).unwrap();
            tx.keys.send(key(KeyCode::Esc, KeyModifiers::NONE)).unwrap();
            tx
        });

        let mut frames = 0;
        app.run(&events, |_| {
            frames += 1;
            Ok(())
        })
        .unwrap();
        let _tx = handle.join().unwrap();

        assert!(app.should_quit);
        // The refresh queued behind 'x' may or may not win the race with Esc
        assert!((2..=3).contains(&frames), "frames = {frames}");
    }

    #[test]
    fn test_run_exits_with_other_signals_pending() {
        let mut app = test_app();
        let (tx, events) = test_events();
        tx.refresh.send(()).unwrap();
        tx.rollover.send(()).unwrap();
        tx.keys.send(key(KeyCode::Esc, KeyModifiers::NONE)).unwrap();

        let mut frames = 0;
        app.run(&events, |_| {
            frames += 1;
            Ok(())
        })
        .unwrap();

        assert!(app.should_quit);
        assert!(frames <= 1);
        // Nothing blocks on the channels after exit
        drop(tx);
    }

    #[test]
    fn test_run_propagates_render_errors() {
        let mut app = test_app();
        let (tx, events) = test_events();
        tx.refresh.send(()).unwrap();
        let result = app.run(&events, |_| anyhow::bail!("device gone"));
        assert!(result.unwrap_err().to_string().contains("device gone"));
    }

    #[test]
    fn test_bootstrap_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        let app = App::bootstrap(&store, date(2017, 6, 1));

        assert_eq!(app.settings, Settings::default());
        assert_eq!(store.load().unwrap(), Settings::default());
        assert_eq!(app.metrics.total_span_days, 365);
    }

    #[test]
    fn test_bootstrap_invalid_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        fs::write(
            store.path(),
            r#"{"FlushRate": 0, "MyPlan": {"Name": "Mine", "StartDate": "2020/01/01", "TargetDate": "2021/01/01"}}"#,
        )
        .unwrap();

        let app = App::bootstrap(&store, date(2020, 6, 1));
        assert_eq!(app.settings, Settings::default());
        assert_eq!(app.plan.name, "２０１８年まで");
    }

    #[test]
    fn test_bootstrap_persists_resolved_now() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        let settings = Settings {
            flush_rate: 500,
            plan: PlanRecord::new("Launch", "Now", "2027/04/01"),
        };
        store.save(&settings).unwrap();

        let app = App::bootstrap(&store, date(2026, 10, 19));
        assert_eq!(app.settings.flush_rate, 500);
        assert_eq!(app.plan.start, date(2026, 10, 19));

        let saved = store.load().unwrap();
        assert_eq!(saved.plan.start_date, "2026/10/19");
        assert_eq!(saved.plan.target_date, "2027/04/01");
    }

    #[test]
    fn test_start_without_terminal_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        let original = r#"{"FlushRate": 10, "MyPlan": {"Name": "p", "StartDate": "Now", "TargetDate": "2027/01/01"}}"#;
        fs::write(store.path(), original).unwrap();

        let result = App::start(&store, date(2026, 10, 19), || {
            anyhow::bail!("initializing terminal: no such device")
        });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
    }

    #[test]
    fn test_start_without_terminal_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        let result = App::start(&store, date(2026, 10, 19), || anyhow::bail!("no tty"));
        assert!(result.is_err());
        assert!(!store.exists());
    }

    #[test]
    fn test_start_with_terminal_bootstraps() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        let app = App::start(&store, date(2017, 6, 1), || Ok(())).unwrap();
        assert_eq!(app.settings, Settings::default());
        assert!(store.exists());
    }

    #[test]
    fn test_bootstrap_blank_plan_gets_default() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_path(dir.path().join("go-dayleft.json"));
        fs::write(store.path(), r#"{"FlushRate": 20}"#).unwrap();

        let app = App::bootstrap(&store, date(2017, 6, 1));
        assert_eq!(app.settings.flush_rate, 20);
        assert_eq!(app.settings.plan.name, "２０１８年まで");
    }
}
