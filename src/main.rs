//! Gong Timer - A countdown timer that strikes a gong
//! 
//! This is the main entry point for the gong-timer application.

use std::{fs::OpenOptions, sync::Mutex};
use tokio::sync::mpsc;
use tracing::{error, info};

use gong_timer::{
    config::Config,
    services::{AlertPlayer, CommandSoundSource, JsonFileStore, SessionStore},
    state::AppState,
    tasks::{run_event_loop, terminal_input_task},
    ui::{terminal::TerminalGuard, Labels, TerminalView},
    utils::{now_ms, resume_signal_task, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // The terminal is taken over by the UI, so logs go to a file
    let log_path = config.log_path();
    if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!("gong_timer={}", config.log_level()))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!("Starting gong-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: state={}, sound={}, player={}, tick={:?}",
        config.state_file.display(),
        config.sound.display(),
        config.player,
        config.tick_interval()
    );

    let labels = Labels::for_language(config.lang);
    let store = SessionStore::new(JsonFileStore::open(&config.state_file));
    let alert = AlertPlayer::new(Box::new(CommandSoundSource::new(&config.player, &config.sound)));

    let guard = TerminalGuard::enter().map_err(anyhow::Error::msg)?;
    let view = TerminalView::new(std::io::stdout(), labels.clone());
    let mut app = AppState::new(view, store, alert, labels);
    app.load(now_ms());

    // Input and resume notifications all funnel into the one event loop
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(terminal_input_task(tx.clone()));
    tokio::spawn(resume_signal_task(tx));

    let result = tokio::select! {
        result = run_event_loop(&mut app, rx, config.tick_interval(), now_ms) => result,
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    drop(guard);
    if let Err(e) = &result {
        error!("Event loop failed: {}", e);
    }
    info!("gong-timer stopped");
    result.map_err(anyhow::Error::msg)
}
