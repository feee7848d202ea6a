use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use dayleft::app::App;
use dayleft::event::EventHandler;
use dayleft::store::json_store::JsonStore;
use dayleft::ui::terminal::{check_terminal, setup_terminal, teardown_terminal};

#[derive(Parser)]
#[command(name = "dayleft", version, about = "Terminal countdown to a goal date")]
struct Cli {
    #[arg(short, long, help = "Settings file (default: ~/go-dayleft.json)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Log file (default: <data dir>/dayleft/dayleft.log)")]
    log_file: Option<PathBuf>,

    #[arg(short, long, help = "Log debug messages")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file, cli.verbose);

    let store = match cli.config {
        Some(path) => JsonStore::with_path(path),
        None => JsonStore::new(),
    };
    let mut app = App::start(&store, Local::now().date_naive(), check_terminal)?;

    let mut terminal = setup_terminal()?;
    let events = EventHandler::new(app.settings.refresh_interval());

    let result = app.run(&events, |app| {
        terminal.draw(|frame| {
            frame.render_widget(app.view(Local::now().naive_local()), frame.area());
        })?;
        Ok(())
    });

    teardown_terminal(&mut terminal)?;

    if let Err(ref err) = result {
        log::error!("exiting after error: {err:#}");
    }
    result
}

fn init_logging(path: Option<PathBuf>, verbose: bool) {
    let path = path.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayleft")
            .join("dayleft.log")
    });
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}
