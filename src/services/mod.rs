//! External resource module
//! 
//! This module contains the collaborators the controller drives: the local
//! key-value store and the alert sound.

pub mod alert;
pub mod sound;
pub mod storage;

// Re-export main types
pub use alert::AlertPlayer;
pub use sound::{CommandSoundSource, Sound, SoundSource};
pub use storage::*;
