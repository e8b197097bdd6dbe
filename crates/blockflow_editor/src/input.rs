// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui input adapter.
//!
//! Translates the pointer and keyboard state egui reports for a canvas
//! widget into [`PointerEvent`]s and [`EditEvent`]s relative to the canvas
//! origin.

use crate::gesture::{EditEvent, PointerEvent};
use crate::session::Editor;
use egui::{Event, InputState, Key, Pos2, Rect, Vec2};

/// Pointer events for one frame over a canvas occupying `canvas`
///
/// `hovered` says whether the canvas widget is under the pointer; presses
/// outside it are not reported. Moves and releases are always reported so a
/// gesture can finish outside the canvas.
pub fn pointer_events(input: &InputState, canvas: Rect, hovered: bool) -> Vec<PointerEvent> {
    let to_canvas = |p: Pos2| (p - canvas.min).to_pos2();
    let pointer = &input.pointer;
    let mut events = Vec::new();

    if pointer.primary_pressed() && hovered {
        if let Some(p) = pointer.press_origin().or_else(|| pointer.interact_pos()) {
            events.push(PointerEvent::Down(to_canvas(p)));
        }
    }
    if pointer.delta() != Vec2::ZERO {
        if let Some(p) = pointer.interact_pos() {
            events.push(PointerEvent::Move(to_canvas(p)));
        }
    }
    if pointer.primary_released() {
        if let Some(p) = pointer.interact_pos() {
            events.push(PointerEvent::Up(to_canvas(p)));
        }
    }
    events
}

/// Keyboard events for a focused param field
pub fn edit_events(input: &InputState) -> Vec<EditEvent> {
    input.events.iter().filter_map(edit_event).collect()
}

fn edit_event(event: &Event) -> Option<EditEvent> {
    match event {
        Event::Text(text) | Event::Paste(text) => Some(EditEvent::Insert(text.clone())),
        Event::Key {
            key, pressed: true, ..
        } => match key {
            Key::Backspace => Some(EditEvent::Backspace),
            Key::Enter => Some(EditEvent::Commit),
            Key::Escape => Some(EditEvent::Cancel),
            _ => None,
        },
        _ => None,
    }
}

impl Editor {
    /// Feed one frame of egui input for the canvas widget to the session
    pub fn handle_egui(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (pointer, keys) = ui.input(|i| {
            let keys = if self.is_editing() {
                edit_events(i)
            } else {
                Vec::new()
            };
            (pointer_events(i, response.rect, response.hovered()), keys)
        });
        for event in keys {
            self.edit(event);
        }
        for event in pointer {
            self.pointer(event);
        }
    }
}
