//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::ui::Language;

/// Sound used when no `--sound` is given
pub const DEFAULT_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/complete.oga";

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "gong-timer")]
#[command(about = "A countdown timer that strikes a gong")]
#[command(version)]
pub struct Config {
    /// File holding the last duration and any running countdown
    #[arg(long, default_value = "gong-timer/state.json")]
    pub state_file: PathBuf,

    /// Sound file played as the gong
    #[arg(long, default_value = DEFAULT_SOUND)]
    pub sound: PathBuf,

    /// Program used to play the sound file
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Milliseconds between display updates while counting down
    #[arg(long, default_value = "500")]
    pub tick_ms: u64,

    /// Interface language
    #[arg(long, value_enum, default_value_t = Language::Sv)]
    pub lang: Language,

    /// Log file (defaults to gong-timer.log next to the state file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Tick interval, kept between 100ms and one second
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(100, 1000))
    }

    /// Where log output goes, the terminal itself belongs to the UI
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.state_file.with_file_name("gong-timer.log"))
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
