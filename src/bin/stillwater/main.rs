//! stillwater - guided session player for the terminal
//!
//! Run with: cargo run -- [--relax | path/to/session.json]

mod audio;
mod demo;
mod speech;
mod ui;

use std::fs::File;

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use audio::CpalBackend;
use speech::CaptionSpeech;
use stillwater::{PlaybackController, SessionConfig, SessionScript};
use ui::App;

const LOG_FILE: &str = "stillwater.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    // the terminal belongs to the UI, so logs go to a file
    let log = File::create(LOG_FILE).wrap_err("failed to create log file")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log)))
        .init();

    let script = load_script(std::env::args().nth(1).as_deref())?;
    let title = match &script {
        SessionScript::Timeline(s) => s.title.clone().unwrap_or_else(|| s.id.clone()),
        SessionScript::Phases(s) => s.id.clone(),
    };

    let config = SessionConfig::new();
    let backend = CpalBackend::new();
    let device = backend
        .device_name()
        .unwrap_or_else(|| "no output device".to_string());
    let (speech, caption) = CaptionSpeech::new();

    let controller = PlaybackController::new(
        script,
        config.clone(),
        Box::new(backend),
        Some(Box::new(speech)),
    )
    .wrap_err("invalid session script")?;

    let mut app = App::new(controller, caption, title, device, config.volume);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

fn load_script(arg: Option<&str>) -> EyreResult<SessionScript> {
    let script = match arg {
        None => demo::breathing()?,
        Some("--relax") => demo::relaxation()?,
        Some(path) => {
            let file = File::open(path).wrap_err_with(|| format!("failed to open {path}"))?;
            serde_json::from_reader(file).wrap_err_with(|| format!("failed to parse {path}"))?
        }
    };
    Ok(script)
}
