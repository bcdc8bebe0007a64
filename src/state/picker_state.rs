//! Circular (wrap-around) drag picker state

use tracing::debug;

/// Height of one picker row in pointer units
pub const ITEM_HEIGHT: f64 = 40.0;
/// Milliseconds of travel projected from the release velocity
pub const MOMENTUM_FACTOR: f64 = 150.0;
/// Duration of the snap animation after release
pub const SNAP_DURATION_MS: i64 = 250;
/// The item labels are laid out this many times to fake an endless list
pub const COPIES: u32 = 3;

/// Which picker a gesture or highlight belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerId {
    Minutes,
    Seconds,
}

/// Input modality that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single pointer sample in picker coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub phase: PointerPhase,
    pub y: f64,
    pub time_ms: i64,
}

/// Value shown at a scroll offset, wrapping negative offsets
pub fn value_at(offset: f64, item_height: f64, count: u32) -> u32 {
    let index = (-offset / item_height).round() as i64;
    index.rem_euclid(count.max(1) as i64) as u32
}

#[derive(Debug, Clone)]
struct Gesture {
    kind: PointerKind,
    start_y: f64,
    start_offset: f64,
    last_y: f64,
    last_time_ms: i64,
    velocity: f64,
}

#[derive(Debug, Clone)]
struct Snap {
    from: f64,
    to: f64,
    started_at_ms: i64,
}

/// Picker over the values `0..count`, scrolled by vertical drags
#[derive(Debug, Clone)]
pub struct CircularPicker {
    count: u32,
    item_height: f64,
    selected: u32,
    offset: f64,
    gesture: Option<Gesture>,
    snap: Option<Snap>,
}

impl CircularPicker {
    pub fn new(count: u32, initial: u32) -> Self {
        let count = count.max(1);
        let mut picker = Self {
            count,
            item_height: ITEM_HEIGHT,
            selected: 0,
            offset: 0.0,
            gesture: None,
            snap: None,
        };
        picker.set_value(initial);
        picker
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Committed value
    pub fn value(&self) -> u32 {
        self.selected
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Value nearest to the current (possibly uncommitted) offset
    pub fn nearest(&self) -> u32 {
        value_at(self.offset, self.item_height, self.count)
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.snap.is_some()
    }

    /// Offset that shows `value` inside the middle copy of the list
    pub fn centered_offset(&self, value: u32) -> f64 {
        -((self.count + value % self.count) as f64) * self.item_height
    }

    /// Jump to a value without animation, dropping any gesture
    pub fn set_value(&mut self, value: u32) {
        self.selected = value % self.count;
        self.gesture = None;
        self.snap = None;
        self.recenter();
    }

    /// Start a gesture. Returns false if another gesture is already active.
    pub fn press(&mut self, kind: PointerKind, y: f64, now_ms: i64) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        if self.snap.is_some() {
            // Freeze the list where the animation currently has it
            self.offset = self.animated_offset(now_ms);
            self.snap = None;
        }
        self.gesture = Some(Gesture {
            kind,
            start_y: y,
            start_offset: self.offset,
            last_y: y,
            last_time_ms: now_ms,
            velocity: 0.0,
        });
        true
    }

    /// Follow the pointer. Returns the value to highlight.
    pub fn drag(&mut self, kind: PointerKind, y: f64, now_ms: i64) -> Option<u32> {
        let gesture = self.gesture.as_mut().filter(|g| g.kind == kind)?;

        let elapsed = now_ms - gesture.last_time_ms;
        if elapsed > 0 {
            gesture.velocity = (y - gesture.last_y) / elapsed as f64;
        }
        gesture.last_y = y;
        gesture.last_time_ms = now_ms;
        self.offset = gesture.start_offset + (y - gesture.start_y);

        Some(self.nearest())
    }

    /// End the gesture with momentum and commit the snapped value
    pub fn release(&mut self, kind: PointerKind, now_ms: i64) -> Option<u32> {
        let velocity = self.gesture.as_ref().filter(|g| g.kind == kind)?.velocity;
        Some(self.settle(velocity, now_ms))
    }

    /// End the gesture where it is, without momentum
    pub fn cancel(&mut self, kind: PointerKind, now_ms: i64) -> Option<u32> {
        self.gesture.as_ref().filter(|g| g.kind == kind)?;
        Some(self.settle(0.0, now_ms))
    }

    /// Route a pointer sample. Returns the highlighted value on move and
    /// the committed value on release or cancel.
    pub fn handle(&mut self, event: PointerEvent) -> Option<u32> {
        match event.phase {
            PointerPhase::Down => {
                self.press(event.kind, event.y, event.time_ms);
                None
            }
            PointerPhase::Move => self.drag(event.kind, event.y, event.time_ms),
            PointerPhase::Up => self.release(event.kind, event.time_ms),
            PointerPhase::Cancel => self.cancel(event.kind, event.time_ms),
        }
    }

    /// Advance the snap animation. Returns true while it is still running.
    pub fn animate(&mut self, now_ms: i64) -> bool {
        let Some(snap) = &self.snap else {
            return false;
        };

        if now_ms - snap.started_at_ms >= SNAP_DURATION_MS {
            self.snap = None;
            self.recenter();
            return false;
        }

        self.offset = self.animated_offset(now_ms);
        true
    }

    fn settle(&mut self, velocity: f64, now_ms: i64) -> u32 {
        self.gesture = None;

        let projected = self.offset + velocity * MOMENTUM_FACTOR;
        let target = (projected / self.item_height).round() * self.item_height;
        self.selected = value_at(target, self.item_height, self.count);
        debug!(
            "Picker settled: offset={:.1} velocity={:.3} target={:.1} value={}",
            self.offset, velocity, target, self.selected
        );

        self.snap = Some(Snap {
            from: self.offset,
            to: target,
            started_at_ms: now_ms,
        });
        self.selected
    }

    fn animated_offset(&self, now_ms: i64) -> f64 {
        match &self.snap {
            Some(snap) => {
                let t = ((now_ms - snap.started_at_ms) as f64 / SNAP_DURATION_MS as f64)
                    .clamp(0.0, 1.0);
                let eased = 1.0 - (1.0 - t).powi(3);
                snap.from + (snap.to - snap.from) * eased
            }
            None => self.offset,
        }
    }

    // Same visible value, offset pulled back into the middle copy
    fn recenter(&mut self) {
        self.offset = self.centered_offset(self.selected);
    }
}
