//! Countdown engine anchored to the wall clock

use tracing::{debug, info};

/// Remaining seconds at which the warning gong sounds
pub const WARNING_SECONDS: u64 = 10;
/// A tick landing this many seconds past the threshold still warns. Ticks
/// are at most one second apart, so only a late tick gets here; a longer
/// suspension skips the warning.
pub const WARNING_LATE_SECONDS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// An in-flight countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownSession {
    /// Absolute end instant in epoch milliseconds, `None` while paused
    pub end_at_ms: Option<i64>,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub paused: bool,
    warned: bool,
}

impl CountdownSession {
    fn running(end_at_ms: i64, total_seconds: u64, remaining_seconds: u64) -> Self {
        Self {
            end_at_ms: Some(end_at_ms),
            total_seconds,
            remaining_seconds,
            paused: false,
            warned: false,
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, nothing happened
    Ignored,
    Updated { remaining: u64 },
    /// Remaining just reached the warning threshold
    Warning { remaining: u64 },
    Finished,
}

/// What restoring a persisted end instant led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Running { remaining: u64 },
    Finished,
}

/// Seconds left until `end_at_ms`, rounded up and never negative
pub fn remaining_until(end_at_ms: i64, now_ms: i64) -> u64 {
    let left_ms = end_at_ms.saturating_sub(now_ms);
    if left_ms <= 0 {
        0
    } else {
        ((left_ms - 1) / 1000 + 1) as u64
    }
}

fn end_after(now_ms: i64, seconds: u64) -> i64 {
    let span_ms = i64::try_from(seconds).unwrap_or(i64::MAX).saturating_mul(1000);
    now_ms.saturating_add(span_ms)
}

/// Idle -> Running <-> Paused -> Finished state machine
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    phase: TimerPhase,
    session: Option<CountdownSession>,
    ticking: bool,
    tick_generation: u64,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            session: None,
            ticking: false,
            tick_generation: 0,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&CountdownSession> {
        self.session.as_ref()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.remaining_seconds)
    }

    pub fn end_at_ms(&self) -> Option<i64> {
        self.session.as_ref().and_then(|s| s.end_at_ms)
    }

    /// Fraction of the session still left, 0.0 when idle
    pub fn progress(&self) -> f64 {
        match &self.session {
            Some(s) if s.total_seconds > 0 => s.remaining_seconds as f64 / s.total_seconds as f64,
            _ => 0.0,
        }
    }

    /// Whether a periodic tick should currently be scheduled
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Bumped each time the periodic tick is (re)armed
    pub fn tick_generation(&self) -> u64 {
        self.tick_generation
    }

    /// Start a fresh countdown. Returns the end instant to persist.
    pub fn start(&mut self, total_seconds: u64, now_ms: i64) -> Result<i64, String> {
        if self.phase != TimerPhase::Idle {
            return Err(format!("Cannot start while {:?}", self.phase));
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        let end_at_ms = end_after(now_ms, total_seconds);
        self.session = Some(CountdownSession::running(end_at_ms, total_seconds, total_seconds));
        self.phase = TimerPhase::Running;
        self.arm();
        info!("Countdown started: {}s, ends at {}", total_seconds, end_at_ms);
        Ok(end_at_ms)
    }

    /// Recompute remaining time from the end instant
    pub fn tick(&mut self, now_ms: i64) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };
        let Some(end_at_ms) = session.end_at_ms else {
            return TickOutcome::Ignored;
        };

        let previous = session.remaining_seconds;
        let mut remaining = remaining_until(end_at_ms, now_ms);
        if remaining > previous {
            debug!("Wall clock stepped back, holding at {}s", previous);
            remaining = previous;
        }
        session.remaining_seconds = remaining;

        if remaining == 0 {
            self.finish();
            return TickOutcome::Finished;
        }

        let crossed = previous > WARNING_SECONDS && remaining <= WARNING_SECONDS;
        if !session.warned && crossed && remaining + WARNING_LATE_SECONDS >= WARNING_SECONDS {
            session.warned = true;
            return TickOutcome::Warning { remaining };
        }

        TickOutcome::Updated { remaining }
    }

    /// Freeze the countdown. Returns the retained remaining seconds.
    pub fn pause(&mut self, now_ms: i64) -> Option<u64> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        let session = self.session.as_mut()?;
        if let Some(end_at_ms) = session.end_at_ms {
            session.remaining_seconds =
                remaining_until(end_at_ms, now_ms).min(session.remaining_seconds);
        }
        session.end_at_ms = None;
        session.paused = true;
        let remaining = session.remaining_seconds;

        self.phase = TimerPhase::Paused;
        self.ticking = false;
        info!("Countdown paused with {}s left", remaining);
        Some(remaining)
    }

    /// Continue a paused countdown. Returns the new end instant to persist.
    pub fn resume(&mut self, now_ms: i64) -> Option<i64> {
        if self.phase != TimerPhase::Paused {
            return None;
        }
        let session = self.session.as_mut()?;
        let end_at_ms = end_after(now_ms, session.remaining_seconds);
        session.end_at_ms = Some(end_at_ms);
        session.paused = false;
        let remaining = session.remaining_seconds;

        self.phase = TimerPhase::Running;
        self.arm();
        info!("Countdown resumed with {}s left, ends at {}", remaining, end_at_ms);
        Some(end_at_ms)
    }

    /// Drop any session and go back to Idle
    pub fn reset(&mut self) {
        if self.phase != TimerPhase::Idle {
            info!("Countdown reset from {:?}", self.phase);
        }
        self.phase = TimerPhase::Idle;
        self.session = None;
        self.ticking = false;
    }

    /// Rebuild a session from a persisted end instant
    pub fn restore(&mut self, end_at_ms: i64, total_seconds: u64, now_ms: i64) -> RestoreOutcome {
        let remaining = remaining_until(end_at_ms, now_ms);
        if remaining == 0 {
            info!("Persisted countdown already elapsed");
            self.session = None;
            self.phase = TimerPhase::Finished;
            self.ticking = false;
            return RestoreOutcome::Finished;
        }

        let total_seconds = total_seconds.max(remaining);
        let mut session = CountdownSession::running(end_at_ms, total_seconds, remaining);
        // Already at or below the threshold, the warning moment has passed
        session.warned = remaining <= WARNING_SECONDS;
        self.session = Some(session);
        self.phase = TimerPhase::Running;
        self.arm();
        info!("Countdown restored with {}s left", remaining);
        RestoreOutcome::Running { remaining }
    }

    /// Host came back from the background: re-arm and recompute now
    pub fn on_resume(&mut self, now_ms: i64) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Ignored;
        }
        self.arm();
        self.tick(now_ms)
    }

    fn arm(&mut self) {
        self.ticking = true;
        self.tick_generation += 1;
    }

    fn finish(&mut self) {
        info!("Countdown finished");
        self.phase = TimerPhase::Finished;
        self.session = None;
        self.ticking = false;
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}
