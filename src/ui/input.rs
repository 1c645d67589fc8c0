/// Keyboard input tracker.
///
/// Lane selection and weapon fire are discrete actions, so only fresh
/// presses matter — there is no held-key movement in a three-lane game.
/// Raw events are kept around for meta-key handling (Ctrl+C).

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

pub struct InputState {
    /// Keys pressed during the most recent drain_events() call.
    presses: Vec<KeyCode>,
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame, before
    /// the simulation tick.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key.code);
                }
                self.raw_events.push(key);
            }
        }
    }

    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
