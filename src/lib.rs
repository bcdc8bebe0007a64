//! Gong Timer - A countdown timer with a circular drag picker
//! 
//! This library provides the wall-clock anchored countdown engine, the
//! wrap-around time pickers, session persistence across restarts and the
//! gong alert, plus the terminal front end that drives them.

pub mod config;
pub mod state;
pub mod services;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use tasks::{run_event_loop, AppEvent};
pub use utils::signals::shutdown_signal;
