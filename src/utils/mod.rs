//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod clock;
pub mod signals;

// Re-export main functions
pub use clock::now_ms;
pub use signals::{resume_signal_task, shutdown_signal};
