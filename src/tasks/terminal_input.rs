//! Terminal input: mouse, keyboard and focus events mapped to app events

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::AppEvent;
use crate::{
    state::{picker_state::ITEM_HEIGHT, PickerId, PointerEvent, PointerKind, PointerPhase},
    ui::terminal::picker_at,
    utils::now_ms,
};

/// Turns raw terminal events into application events. Remembers which
/// picker a mouse drag started on so the whole gesture goes to it.
#[derive(Debug, Default)]
pub struct InputMapper {
    dragging: Option<PickerId>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, event: &Event, now_ms: i64) -> Option<AppEvent> {
        match event {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse, now_ms),
            Event::FocusGained => Some(AppEvent::Resume),
            Event::Resize(_, _) => Some(AppEvent::Redraw),
            _ => None,
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent, now_ms: i64) -> Option<AppEvent> {
        // One terminal row is one picker item
        let y = mouse.row as f64 * ITEM_HEIGHT;
        let pointer = |phase| PointerEvent {
            kind: PointerKind::Mouse,
            phase,
            y,
            time_ms: now_ms,
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let id = picker_at(mouse.column, mouse.row)?;
                self.dragging = Some(id);
                Some(AppEvent::Pointer(id, pointer(PointerPhase::Down)))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let id = self.dragging?;
                Some(AppEvent::Pointer(id, pointer(PointerPhase::Move)))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let id = self.dragging.take()?;
                Some(AppEvent::Pointer(id, pointer(PointerPhase::Up)))
            }
            _ => None,
        }
    }
}

fn map_key(key: &KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(AppEvent::Quit),
        KeyCode::Enter | KeyCode::Char('s') => Some(AppEvent::Start),
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(AppEvent::TogglePause),
        KeyCode::Char('r') => Some(AppEvent::Reset),
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
        _ => None,
    }
}

/// Read terminal events and forward them until the receiver goes away
pub async fn terminal_input_task(tx: mpsc::Sender<AppEvent>) {
    info!("Starting terminal input task");

    let mut stream = EventStream::new();
    let mut mapper = InputMapper::new();

    while let Some(result) = stream.next().await {
        match result {
            Ok(event) => {
                let Some(app_event) = mapper.map(&event, now_ms()) else {
                    continue;
                };
                debug!("Input {:?}", app_event);
                let quit = app_event == AppEvent::Quit;
                if tx.send(app_event).await.is_err() || quit {
                    break;
                }
            }
            Err(e) => {
                error!("Error reading terminal input: {}", e);
                break;
            }
        }
    }
}
