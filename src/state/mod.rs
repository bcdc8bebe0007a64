//! State management module
//! 
//! This module contains the countdown engine, the circular pickers and the
//! controller that owns them.

pub mod app_state;
pub mod picker_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use picker_state::{CircularPicker, PickerId, PointerEvent, PointerKind, PointerPhase};
pub use timer_state::{CountdownEngine, CountdownSession, RestoreOutcome, TickOutcome, TimerPhase};
