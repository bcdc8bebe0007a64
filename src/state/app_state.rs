//! Main application state: the single controller owning every component

use tracing::{debug, info};

use super::{
    CircularPicker, CountdownEngine, PickerId, PointerEvent, PointerPhase, RestoreOutcome,
    TickOutcome, TimerPhase,
};
use crate::{
    services::{
        AlertPlayer, ChosenDuration, KeyValueStore, SessionStore, MINUTE_VALUES, SECOND_VALUES,
    },
    ui::{format_time, Controls, Labels, Presenter, View},
};

/// Owns the countdown engine, both pickers, persistence, the alert player
/// and the presenter. All input and timer callbacks enter here.
pub struct AppState<P, S> {
    engine: CountdownEngine,
    minutes: CircularPicker,
    seconds: CircularPicker,
    store: SessionStore<S>,
    alert: AlertPlayer,
    presenter: P,
    labels: Labels,
}

impl<P: Presenter, S: KeyValueStore> AppState<P, S> {
    /// Create the controller, rebuilding pickers from the last duration
    pub fn new(presenter: P, store: SessionStore<S>, alert: AlertPlayer, labels: Labels) -> Self {
        let duration = store.load_duration();
        Self {
            engine: CountdownEngine::new(),
            minutes: CircularPicker::new(MINUTE_VALUES, duration.minutes),
            seconds: CircularPicker::new(SECOND_VALUES, duration.seconds),
            store,
            alert,
            presenter,
            labels,
        }
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn alert(&self) -> &AlertPlayer {
        &self.alert
    }

    pub fn picker(&self, id: PickerId) -> &CircularPicker {
        match id {
            PickerId::Minutes => &self.minutes,
            PickerId::Seconds => &self.seconds,
        }
    }

    fn picker_mut(&mut self, id: PickerId) -> &mut CircularPicker {
        match id {
            PickerId::Minutes => &mut self.minutes,
            PickerId::Seconds => &mut self.seconds,
        }
    }

    /// Duration currently selected on the pickers
    pub fn chosen_duration(&self) -> ChosenDuration {
        ChosenDuration::new(self.minutes.value(), self.seconds.value())
    }

    /// Initial render plus restoring a persisted session
    pub fn load(&mut self, now_ms: i64) {
        let duration = self.chosen_duration();
        self.presenter.highlight(PickerId::Minutes, duration.minutes);
        self.presenter.highlight(PickerId::Seconds, duration.seconds);
        self.show_setup();

        let Some(end_at_ms) = self.store.load_end_at(now_ms) else {
            debug!("No persisted session");
            return;
        };

        match self.engine.restore(end_at_ms, duration.total_seconds(), now_ms) {
            RestoreOutcome::Running { remaining } => {
                info!("Resuming persisted countdown, {}s left", remaining);
                // The sound stays locked until the next user interaction
                self.show_running();
            }
            RestoreOutcome::Finished => {
                info!("Persisted countdown elapsed while away");
                self.store.clear_session();
                self.show_finished();
                self.presenter.set_completion_cue(true);
            }
        }
    }

    /// Feed a pointer sample to one of the pickers
    pub fn pointer(&mut self, id: PickerId, event: PointerEvent) {
        if self.engine.phase() != TimerPhase::Idle {
            return;
        }
        if event.phase == PointerPhase::Down {
            self.alert.unlock();
            self.presenter.show_validation(None);
        }

        let Some(value) = self.picker_mut(id).handle(event) else {
            return;
        };
        // Once released, the snap animation moves the highlight
        if !self.picker(id).is_animating() {
            self.presenter.highlight(id, value);
        }

        if matches!(event.phase, PointerPhase::Up | PointerPhase::Cancel) {
            debug!("{:?} picker committed {}", id, value);
            match id {
                PickerId::Minutes => self.store.save_minutes(value),
                PickerId::Seconds => self.store.save_seconds(value),
            }
            let total = self.chosen_duration().total_seconds();
            self.presenter.render_time(&format_time(total));
        }
    }

    /// Advance picker snap animations. Returns true while any is running.
    pub fn animate(&mut self, now_ms: i64) -> bool {
        let mut running = false;
        for id in [PickerId::Minutes, PickerId::Seconds] {
            let picker = self.picker_mut(id);
            if !picker.is_animating() {
                continue;
            }
            running |= picker.animate(now_ms);
            let nearest = picker.nearest();
            self.presenter.highlight(id, nearest);
        }
        running
    }

    pub fn is_animating(&self) -> bool {
        self.minutes.is_animating() || self.seconds.is_animating()
    }

    /// Start button
    pub fn start(&mut self, now_ms: i64) -> Result<(), String> {
        // Unlock inside the gesture even when validation fails
        self.alert.unlock();

        if self.engine.phase() != TimerPhase::Idle {
            return Err(format!("Countdown already {:?}", self.engine.phase()));
        }

        let duration = self.chosen_duration();
        if duration.total_seconds() == 0 {
            self.presenter.show_validation(Some(self.labels.invalid_duration));
            return Err(self.labels.invalid_duration.to_string());
        }

        let end_at_ms = self.engine.start(duration.total_seconds(), now_ms)?;
        self.store.save_duration(duration);
        self.store.save_end_at(end_at_ms);
        self.presenter.show_validation(None);
        self.show_running();
        Ok(())
    }

    /// Pause/resume button
    pub fn toggle_pause(&mut self, now_ms: i64) {
        self.alert.unlock();

        match self.engine.phase() {
            TimerPhase::Running => {
                // Settle any due tick first so a pause at zero still finishes
                self.tick(now_ms);
                if self.engine.pause(now_ms).is_some() {
                    self.store.clear_session();
                    self.presenter.set_pause_label(self.labels.resume);
                    self.presenter.set_pulsing(false);
                    self.render_remaining();
                }
            }
            TimerPhase::Paused => {
                if let Some(end_at_ms) = self.engine.resume(now_ms) {
                    self.store.save_end_at(end_at_ms);
                    self.presenter.set_pause_label(self.labels.pause);
                    self.presenter.set_pulsing(true);
                    self.render_remaining();
                }
            }
            phase => debug!("Pause ignored while {:?}", phase),
        }
    }

    /// Reset button
    pub fn reset(&mut self) {
        self.engine.reset();
        self.store.clear_session();
        self.alert.discard();
        self.show_setup();
    }

    /// Periodic tick
    pub fn tick(&mut self, now_ms: i64) {
        let outcome = self.engine.tick(now_ms);
        self.apply_tick_outcome(outcome, now_ms);
    }

    /// Host regained focus or the process was continued
    pub fn on_resume(&mut self, now_ms: i64) {
        if self.engine.phase() != TimerPhase::Running {
            return;
        }
        debug!("Resumed from background, recomputing");
        let outcome = self.engine.on_resume(now_ms);
        self.apply_tick_outcome(outcome, now_ms);
    }

    pub fn indicator_deadline(&self) -> Option<i64> {
        self.alert.indicator_deadline()
    }

    /// Hide the sound indicator once it has been up long enough
    pub fn expire_indicator(&mut self, now_ms: i64) {
        if self.alert.expire_indicator(now_ms) {
            self.presenter.set_sound_indicator(false);
        }
    }

    fn apply_tick_outcome(&mut self, outcome: TickOutcome, now_ms: i64) {
        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Updated { .. } => self.render_remaining(),
            TickOutcome::Warning { remaining } => {
                info!("Warning gong at {}s", remaining);
                self.render_remaining();
                self.sound_gong(now_ms);
            }
            TickOutcome::Finished => {
                self.sound_gong(now_ms);
                self.store.clear_session();
                self.show_finished();
            }
        }
    }

    fn sound_gong(&mut self, now_ms: i64) {
        self.alert.play(now_ms);
        self.presenter.set_sound_indicator(true);
    }

    fn render_remaining(&mut self) {
        self.presenter.render_time(&format_time(self.engine.remaining_seconds()));
        self.presenter.render_progress(self.engine.progress());
    }

    fn show_setup(&mut self) {
        self.presenter.show_view(View::Setup);
        self.presenter.set_controls(Controls::setup());
        self.presenter.set_pause_label(self.labels.pause);
        self.presenter.set_pulsing(false);
        self.presenter.set_completion_cue(false);
        self.presenter.render_progress(0.0);
        self.presenter.render_time(&format_time(self.chosen_duration().total_seconds()));
    }

    fn show_running(&mut self) {
        self.presenter.show_view(View::Timer);
        self.presenter.set_controls(Controls::running());
        self.presenter.set_pause_label(self.labels.pause);
        self.presenter.set_pulsing(true);
        self.presenter.set_completion_cue(false);
        self.render_remaining();
    }

    fn show_finished(&mut self) {
        self.presenter.show_view(View::Timer);
        self.presenter.set_controls(Controls::finished());
        self.presenter.set_pulsing(false);
        self.presenter.render_time(&format_time(0));
        self.presenter.render_progress(0.0);
    }
}

impl<P, S> std::fmt::Debug for AppState<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("minutes", &self.minutes.value())
            .field("seconds", &self.seconds.value())
            .field("alert", &self.alert)
            .finish()
    }
}
