//! Alert player: gesture-unlocked gong plus a transient indicator

use tracing::{debug, info, warn};

use super::sound::{Sound, SoundSource};

/// How long the "sound played" indicator stays visible
pub const INDICATOR_DURATION_MS: i64 = 4_000;

pub struct AlertPlayer {
    source: Box<dyn SoundSource>,
    sound: Option<Box<dyn Sound>>,
    indicator_until_ms: Option<i64>,
}

impl AlertPlayer {
    pub fn new(source: Box<dyn SoundSource>) -> Self {
        Self {
            source,
            sound: None,
            indicator_until_ms: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.sound.is_some()
    }

    /// Create and prime the sound. Call from within a user interaction.
    /// Failures are swallowed, unlocking is best effort.
    pub fn unlock(&mut self) {
        if self.sound.is_some() {
            return;
        }
        match self.source.load() {
            Ok(mut sound) => {
                if let Err(e) = sound.prime() {
                    debug!("Priming alert sound failed: {}", e);
                }
                info!("Alert sound unlocked");
                self.sound = Some(sound);
            }
            Err(e) => debug!("Unlocking alert sound failed: {}", e),
        }
    }

    /// Sound the gong and show the indicator. Returns whether audio started.
    pub fn play(&mut self, now_ms: i64) -> bool {
        self.indicator_until_ms = Some(now_ms + INDICATOR_DURATION_MS);

        match self.sound.as_mut() {
            Some(sound) => match sound.play_from_start() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Could not play alert sound: {}", e);
                    false
                }
            },
            None => {
                warn!("Could not play alert sound: not unlocked");
                false
            }
        }
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_until_ms.is_some()
    }

    pub fn indicator_deadline(&self) -> Option<i64> {
        self.indicator_until_ms
    }

    /// Hide the indicator once its time is up. Returns true if it just hid.
    pub fn expire_indicator(&mut self, now_ms: i64) -> bool {
        match self.indicator_until_ms {
            Some(until) if now_ms >= until => {
                self.indicator_until_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Stop and drop the sound so the next session needs a fresh unlock
    pub fn discard(&mut self) {
        if let Some(mut sound) = self.sound.take() {
            sound.stop();
            debug!("Alert sound discarded");
        }
    }
}

impl std::fmt::Debug for AlertPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertPlayer")
            .field("unlocked", &self.is_unlocked())
            .field("indicator_until_ms", &self.indicator_until_ms)
            .finish()
    }
}

/// Test doubles shared by unit and integration tests
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::{cell::RefCell, rc::Rc};

    use super::super::sound::{Sound, SoundSource};

    /// Counts what happened to the sounds a `FakeSoundSource` handed out
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct SoundLog {
        pub loads: usize,
        pub primes: usize,
        pub plays: usize,
        pub stops: usize,
    }

    #[derive(Debug, Clone, Default)]
    pub struct FakeSoundSource {
        pub log: Rc<RefCell<SoundLog>>,
        pub fail_load: bool,
        pub fail_play: bool,
    }

    impl FakeSoundSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn log(&self) -> SoundLog {
            self.log.borrow().clone()
        }
    }

    impl SoundSource for FakeSoundSource {
        fn load(&self) -> Result<Box<dyn Sound>, String> {
            if self.fail_load {
                return Err("no sound".to_string());
            }
            self.log.borrow_mut().loads += 1;
            Ok(Box::new(FakeSound {
                log: Rc::clone(&self.log),
                fail_play: self.fail_play,
            }))
        }
    }

    struct FakeSound {
        log: Rc<RefCell<SoundLog>>,
        fail_play: bool,
    }

    impl Sound for FakeSound {
        fn prime(&mut self) -> Result<(), String> {
            self.log.borrow_mut().primes += 1;
            Ok(())
        }

        fn play_from_start(&mut self) -> Result<(), String> {
            if self.fail_play {
                return Err("decode error".to_string());
            }
            self.log.borrow_mut().plays += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.log.borrow_mut().stops += 1;
        }
    }
}
