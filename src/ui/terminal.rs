//! Full-screen terminal rendering of the [`Screen`] model

use std::io::Write;

use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, warn};

use super::{Controls, Labels, Presenter, Screen, View};
use crate::{
    services::{MINUTE_VALUES, SECOND_VALUES},
    state::PickerId,
};

/// First terminal row of the picker columns
pub const PICKER_TOP: u16 = 3;
/// Visible rows per picker, the middle one is the selection
pub const PICKER_ROWS: u16 = 5;
pub const PICKER_WIDTH: u16 = 6;
pub const MINUTES_X: u16 = 4;
pub const SECONDS_X: u16 = 14;
const TIME_ROW: u16 = 10;
const PROGRESS_ROW: u16 = 11;
const CONTROLS_ROW: u16 = 13;
const MESSAGE_ROW: u16 = 15;
const INDICATOR_ROW: u16 = 16;
const PROGRESS_WIDTH: usize = 30;

/// Which picker column, if any, a terminal cell belongs to
pub fn picker_at(column: u16, row: u16) -> Option<PickerId> {
    if !(PICKER_TOP..PICKER_TOP + PICKER_ROWS).contains(&row) {
        return None;
    }
    if (MINUTES_X..MINUTES_X + PICKER_WIDTH).contains(&column) {
        Some(PickerId::Minutes)
    } else if (SECONDS_X..SECONDS_X + PICKER_WIDTH).contains(&column) {
        Some(PickerId::Seconds)
    } else {
        None
    }
}

/// Values shown top to bottom around `selected`, wrapping at both ends
pub fn picker_window(selected: u32, count: u32) -> Vec<u32> {
    let half = (PICKER_ROWS / 2) as i64;
    (-half..=half)
        .map(|delta| (selected as i64 + delta).rem_euclid(count as i64) as u32)
        .collect()
}

/// Text progress bar, `fraction` of it filled
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn controls_line(controls: Controls, pause_label: &str, labels: &Labels) -> String {
    let mut parts = Vec::new();
    if controls.start {
        parts.push(format!("[Enter] {}", labels.start));
    }
    if controls.pause {
        parts.push(format!("[Space] {}", pause_label));
    }
    if controls.reset {
        parts.push(format!("[r] {}", labels.reset));
    }
    parts.push(format!("[q] {}", labels.quit));
    parts.join("   ")
}

/// Presenter that draws the screen model onto a terminal
pub struct TerminalView<W: Write> {
    out: W,
    screen: Screen,
    labels: Labels,
    pulse_on: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, labels: Labels) -> Self {
        Self {
            out,
            screen: Screen::new(&labels),
            labels,
            pulse_on: true,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    fn draw(&mut self) -> std::io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(2, 1), Print("Gong"))?;

        match self.screen.view {
            View::Setup => self.draw_setup()?,
            View::Timer => self.draw_timer()?,
        }

        let controls = controls_line(self.screen.controls, &self.screen.pause_label, &self.labels);
        queue!(self.out, cursor::MoveTo(2, CONTROLS_ROW), Print(controls))?;

        if let Some(message) = &self.screen.validation {
            queue!(self.out, cursor::MoveTo(2, MESSAGE_ROW), Print(message))?;
        } else if self.screen.completion_cue {
            queue!(self.out, cursor::MoveTo(2, MESSAGE_ROW), Print(self.labels.completed))?;
        }
        if self.screen.sound_indicator {
            queue!(
                self.out,
                cursor::MoveTo(2, INDICATOR_ROW),
                SetAttribute(Attribute::Bold),
                Print(format!("♪ {}", self.labels.sound_played)),
                SetAttribute(Attribute::Reset)
            )?;
        }
        self.out.flush()
    }

    fn draw_setup(&mut self) -> std::io::Result<()> {
        let columns = [
            (MINUTES_X, self.screen.minutes, MINUTE_VALUES, self.labels.minutes),
            (SECONDS_X, self.screen.seconds, SECOND_VALUES, self.labels.seconds),
        ];
        for (x, selected, count, label) in columns {
            for (row, value) in picker_window(selected, count).into_iter().enumerate() {
                let y = PICKER_TOP + row as u16;
                queue!(self.out, cursor::MoveTo(x, y))?;
                if y == PICKER_TOP + PICKER_ROWS / 2 {
                    queue!(
                        self.out,
                        SetAttribute(Attribute::Reverse),
                        Print(format!(" {:02} ", value)),
                        SetAttribute(Attribute::Reset)
                    )?;
                } else {
                    queue!(self.out, Print(format!(" {:02} ", value)))?;
                }
            }
            queue!(self.out, cursor::MoveTo(x + 1, PICKER_TOP + PICKER_ROWS), Print(label))?;
        }
        queue!(self.out, cursor::MoveTo(MINUTES_X, TIME_ROW), Print(&self.screen.time_text))
    }

    fn draw_timer(&mut self) -> std::io::Result<()> {
        let marker = if self.screen.pulsing && self.pulse_on { "●" } else { " " };
        queue!(
            self.out,
            cursor::MoveTo(MINUTES_X, TIME_ROW),
            SetAttribute(Attribute::Bold),
            Print(format!("{} {}", marker, self.screen.time_text)),
            SetAttribute(Attribute::Reset),
            cursor::MoveTo(MINUTES_X, PROGRESS_ROW),
            Print(progress_bar(self.screen.progress, PROGRESS_WIDTH))
        )
    }
}

impl<W: Write> Presenter for TerminalView<W> {
    fn show_view(&mut self, view: View) {
        self.screen.show_view(view);
    }

    fn render_time(&mut self, text: &str) {
        if self.screen.time_text != text {
            self.pulse_on = !self.pulse_on;
        }
        self.screen.render_time(text);
    }

    fn render_progress(&mut self, fraction: f64) {
        self.screen.render_progress(fraction);
    }

    fn set_pulsing(&mut self, pulsing: bool) {
        self.screen.set_pulsing(pulsing);
    }

    fn set_controls(&mut self, controls: Controls) {
        self.screen.set_controls(controls);
    }

    fn set_pause_label(&mut self, label: &str) {
        self.screen.set_pause_label(label);
    }

    fn show_validation(&mut self, message: Option<&str>) {
        self.screen.show_validation(message);
    }

    fn highlight(&mut self, picker: PickerId, value: u32) {
        self.screen.highlight(picker, value);
    }

    fn set_sound_indicator(&mut self, visible: bool) {
        self.screen.set_sound_indicator(visible);
    }

    fn set_completion_cue(&mut self, visible: bool) {
        self.screen.set_completion_cue(visible);
    }

    fn flush(&mut self) -> Result<(), String> {
        self.draw().map_err(|e| format!("Failed to draw screen: {}", e))
    }
}

/// Raw mode, alternate screen, mouse and focus reporting for as long as it
/// lives
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> Result<Self, String> {
        terminal::enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        let mut stdout = std::io::stdout();
        if let Err(e) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide
        ) {
            // Keep the user's shell usable even if setup half failed
            let _ = terminal::disable_raw_mode();
            return Err(format!("Failed to set up terminal: {}", e));
        }
        debug!("Terminal prepared");
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = execute!(
            stdout,
            cursor::Show,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        ) {
            warn!("Failed to restore terminal: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
    }
}
