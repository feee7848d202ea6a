use std::thread;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use crossbeam_channel::{Receiver, Sender, bounded, select};
use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Refresh,
    DayRollover,
}

/// Fan-in of the three signal sources driving the main loop. Producers run
/// on their own threads and only ever talk through single-slot channels.
pub struct EventHandler {
    keys: Receiver<KeyEvent>,
    refresh: Receiver<()>,
    rollover: Receiver<()>,
}

impl EventHandler {
    pub fn new(refresh_interval: Duration) -> Self {
        let (key_tx, keys) = bounded(1);
        let (refresh_tx, refresh) = bounded(1);
        let (rollover_tx, rollover) = bounded(1);

        thread::spawn(move || poll_keys(key_tx));
        thread::spawn(move || tick_refresh(refresh_tx, refresh_interval, thread::sleep));
        thread::spawn(move || watch_day_rollover(rollover_tx, Local::now, thread::sleep));

        Self {
            keys,
            refresh,
            rollover,
        }
    }

    pub fn from_channels(
        keys: Receiver<KeyEvent>,
        refresh: Receiver<()>,
        rollover: Receiver<()>,
    ) -> Self {
        Self {
            keys,
            refresh,
            rollover,
        }
    }

    /// Block until one source is ready. When several are, which one wins is
    /// up to the channel implementation.
    pub fn next(&self) -> anyhow::Result<AppEvent> {
        select! {
            recv(self.keys) -> key => Ok(AppEvent::Key(key?)),
            recv(self.refresh) -> tick => {
                tick?;
                Ok(AppEvent::Refresh)
            }
            recv(self.rollover) -> day => {
                day?;
                Ok(AppEvent::DayRollover)
            }
        }
    }
}

fn poll_keys(tx: Sender<KeyEvent>) {
    loop {
        match event::read() {
            Ok(Event::Key(key)) => {
                if tx.send(key).is_err() {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("terminal input failed: {e}");
                return;
            }
        }
    }
}

/// Emit a refresh after every `interval`. A full slot blocks the ticker, so
/// at most one refresh is ever pending.
fn tick_refresh<S>(tx: Sender<()>, interval: Duration, sleep: S)
where
    S: Fn(Duration),
{
    loop {
        sleep(interval);
        if tx.send(()).is_err() {
            return;
        }
    }
}

const ROLLOVER_POLL: Duration = Duration::from_secs(1);

/// Emit once per calendar day, right after local midnight.
fn watch_day_rollover<Tz, C, S>(tx: Sender<()>, clock: C, sleep: S)
where
    Tz: TimeZone,
    C: Fn() -> DateTime<Tz>,
    S: Fn(Duration),
{
    loop {
        let now = clock();
        let midnight = next_midnight(&now);
        sleep((midnight.clone() - now).to_std().unwrap_or(Duration::ZERO));

        // Sleep can wake early; wait until the calendar actually turned.
        while clock().date_naive() < midnight.date_naive() {
            sleep(ROLLOVER_POLL);
        }

        log::info!("day rolled over to {}", midnight.date_naive());
        if tx.send(()).is_err() {
            return;
        }
    }
}

/// The first instant of the calendar day after `now`, in `now`'s zone.
///
/// Where a DST jump skips midnight, the earliest valid instant of that day
/// is used instead.
pub fn next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or(chrono::NaiveDate::MAX);

    (0..24)
        .find_map(|hour| {
            let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
            tz.from_local_datetime(&tomorrow.and_time(time)).earliest()
        })
        .unwrap_or_else(|| now.clone() + chrono::Duration::days(1))
}
