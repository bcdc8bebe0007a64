//! Background tasks module
//! 
//! This module contains the event loop that owns the controller and the
//! tasks feeding it input.

pub mod event_loop;
pub mod terminal_input;

// Re-export main functions
pub use event_loop::{run_event_loop, AppEvent};
pub use terminal_input::{terminal_input_task, InputMapper};
