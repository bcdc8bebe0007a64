//! Presentation layer
//!
//! The controller only talks to the display through [`Presenter`]. [`Screen`]
//! is the plain model of what is shown; the terminal view renders it.

pub mod format;
pub mod labels;
pub mod terminal;

pub use format::{format_time, split};
pub use labels::{Labels, Language};
pub use terminal::TerminalView;

use crate::state::PickerId;

/// Which buttons are currently offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub reset: bool,
}

impl Controls {
    pub fn setup() -> Self {
        Self { start: true, pause: false, reset: false }
    }

    pub fn running() -> Self {
        Self { start: false, pause: true, reset: true }
    }

    pub fn finished() -> Self {
        Self { start: false, pause: false, reset: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Setup,
    Timer,
}

/// Display operations the controller drives
pub trait Presenter {
    fn show_view(&mut self, view: View);
    fn render_time(&mut self, text: &str);
    fn render_progress(&mut self, fraction: f64);
    fn set_pulsing(&mut self, pulsing: bool);
    fn set_controls(&mut self, controls: Controls);
    fn set_pause_label(&mut self, label: &str);
    fn show_validation(&mut self, message: Option<&str>);
    fn highlight(&mut self, picker: PickerId, value: u32);
    fn set_sound_indicator(&mut self, visible: bool);
    fn set_completion_cue(&mut self, visible: bool);

    /// Push pending changes out to the device
    fn flush(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// Everything currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub view: View,
    pub time_text: String,
    pub progress: f64,
    pub pulsing: bool,
    pub controls: Controls,
    pub pause_label: String,
    pub validation: Option<String>,
    pub minutes: u32,
    pub seconds: u32,
    pub sound_indicator: bool,
    pub completion_cue: bool,
}

impl Screen {
    pub fn new(labels: &Labels) -> Self {
        Self {
            view: View::Setup,
            time_text: format_time(0),
            progress: 0.0,
            pulsing: false,
            controls: Controls::setup(),
            pause_label: labels.pause.to_string(),
            validation: None,
            minutes: 0,
            seconds: 0,
            sound_indicator: false,
            completion_cue: false,
        }
    }
}

impl Presenter for Screen {
    fn show_view(&mut self, view: View) {
        self.view = view;
    }

    fn render_time(&mut self, text: &str) {
        self.time_text = text.to_string();
    }

    fn render_progress(&mut self, fraction: f64) {
        self.progress = fraction.clamp(0.0, 1.0);
    }

    fn set_pulsing(&mut self, pulsing: bool) {
        self.pulsing = pulsing;
    }

    fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }

    fn set_pause_label(&mut self, label: &str) {
        self.pause_label = label.to_string();
    }

    fn show_validation(&mut self, message: Option<&str>) {
        self.validation = message.map(str::to_string);
    }

    fn highlight(&mut self, picker: PickerId, value: u32) {
        match picker {
            PickerId::Minutes => self.minutes = value,
            PickerId::Seconds => self.seconds = value,
        }
    }

    fn set_sound_indicator(&mut self, visible: bool) {
        self.sound_indicator = visible;
    }

    fn set_completion_cue(&mut self, visible: bool) {
        self.completion_cue = visible;
    }
}
