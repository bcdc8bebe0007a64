//! Gong sound playback through an external player program

use std::{
    path::PathBuf,
    process::Stdio,
};
use tokio::process::{Child, Command};
use tracing::{debug, info};

/// Something that can produce a playable sound handle
pub trait SoundSource {
    fn load(&self) -> Result<Box<dyn Sound>, String>;
}

/// A loaded, playable sound
pub trait Sound {
    /// Silent play/stop cycle that proves playback is permitted
    fn prime(&mut self) -> Result<(), String>;
    /// Play from the beginning, cutting off any playback in progress
    fn play_from_start(&mut self) -> Result<(), String>;
    fn stop(&mut self);
}

/// Plays a sound file by spawning e.g. `paplay <file>`
#[derive(Debug, Clone)]
pub struct CommandSoundSource {
    pub player: String,
    pub file: PathBuf,
}

impl CommandSoundSource {
    pub fn new(player: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            player: player.into(),
            file: file.into(),
        }
    }
}

impl SoundSource for CommandSoundSource {
    fn load(&self) -> Result<Box<dyn Sound>, String> {
        if !self.file.exists() {
            return Err(format!("Sound file {} not found", self.file.display()));
        }
        debug!("Loaded sound {} for {}", self.file.display(), self.player);
        Ok(Box::new(CommandSound {
            player: self.player.clone(),
            file: self.file.clone(),
            child: None,
        }))
    }
}

#[derive(Debug)]
struct CommandSound {
    player: String,
    file: PathBuf,
    child: Option<Child>,
}

impl Sound for CommandSound {
    fn prime(&mut self) -> Result<(), String> {
        // Spawning the player with --version checks it exists and may run
        Command::new(&self.player)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("Failed to execute {}: {}", self.player, e))
    }

    fn play_from_start(&mut self) -> Result<(), String> {
        self.stop();
        let child = Command::new(&self.player)
            .arg(&self.file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.player, e))?;
        info!("Playing {} with {}", self.file.display(), self.player);
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                debug!("Playback already ended: {}", e);
            }
        }
    }
}
