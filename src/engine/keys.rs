use std::cell::Cell;
use std::rc::Rc;

use super::{FloorEvent, FloorPlan};

/// Keys the floor plan reacts to, independent of the windowing backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloorKey {
    Delete,
    Backspace,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    DeleteSelection,
    ClearSelection,
    Nudge(i32, i32),
}

impl FloorKey {
    pub fn command(self) -> KeyCommand {
        match self {
            FloorKey::Delete | FloorKey::Backspace => KeyCommand::DeleteSelection,
            FloorKey::Escape => KeyCommand::ClearSelection,
            FloorKey::ArrowLeft => KeyCommand::Nudge(-1, 0),
            FloorKey::ArrowRight => KeyCommand::Nudge(1, 0),
            FloorKey::ArrowUp => KeyCommand::Nudge(0, -1),
            FloorKey::ArrowDown => KeyCommand::Nudge(0, 1),
        }
    }
}

/// Hands out keyboard subscriptions and counts the live ones, so a view
/// that forgets to let go shows up.
#[derive(Debug, Default)]
pub struct KeyboardHub {
    live: Rc<Cell<usize>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&self) -> KeyListener {
        self.live.set(self.live.get() + 1);
        tracing::debug!(live = self.live.get(), "keyboard listener attached");
        KeyListener {
            live: Some(Rc::clone(&self.live)),
        }
    }

    pub fn active_listeners(&self) -> usize {
        self.live.get()
    }
}

/// A keyboard subscription owned by one floor-plan view. Keys are only
/// translated while it is attached; dropping it detaches it.
#[derive(Debug)]
pub struct KeyListener {
    live: Option<Rc<Cell<usize>>>,
}

impl KeyListener {
    pub fn translate(&self, key: FloorKey) -> Option<KeyCommand> {
        self.live.as_ref().map(|_| key.command())
    }

    pub fn detach(&mut self) {
        if let Some(live) = self.live.take() {
            live.set(live.get().saturating_sub(1));
            tracing::debug!(live = live.get(), "keyboard listener detached");
        }
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.detach();
    }
}

impl FloorPlan {
    /// Routes a key press through `listener`. Returns whether the key was
    /// handled; a detached listener handles nothing.
    pub fn handle_key(&mut self, listener: &KeyListener, key: FloorKey) -> bool {
        match listener.translate(key) {
            Some(command) => self.apply_key(command),
            None => false,
        }
    }

    pub fn apply_key(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::DeleteSelection => {
                let Some(id) = self.selected else {
                    return false;
                };
                self.events.push(FloorEvent::DeleteRequested(id));
                true
            }
            KeyCommand::ClearSelection => {
                self.cancel_gesture();
                self.close_editor();
                self.select(None);
                true
            }
            KeyCommand::Nudge(dx, dy) => {
                if self.selected.is_none() {
                    return false;
                }
                if let Err(err) = self.nudge_selected(dx, dy) {
                    tracing::debug!(error = %err, "nudge refused");
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FloorConfig;
    use crate::engine::tests::{item, room_with};
    use crate::model::{GridPos, ItemId};

    #[test]
    fn listeners_are_counted_until_detached() {
        let hub = KeyboardHub::new();
        let mut first = hub.listen();
        let second = hub.listen();
        assert_eq!(hub.active_listeners(), 2);

        first.detach();
        first.detach();
        assert_eq!(hub.active_listeners(), 1);
        assert_eq!(first.translate(FloorKey::Escape), None);

        drop(second);
        assert_eq!(hub.active_listeners(), 0);
    }

    #[test]
    fn delete_requests_confirmation_for_selection() {
        let hub = KeyboardHub::new();
        let keys = hub.listen();
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        assert!(!plan.handle_key(&keys, FloorKey::Delete));

        plan.select(Some(ItemId(1)));
        plan.drain_events();
        assert!(plan.handle_key(&keys, FloorKey::Backspace));
        assert_eq!(plan.drain_events(), vec![FloorEvent::DeleteRequested(ItemId(1))]);
        assert!(plan.item(ItemId(1)).is_some());
    }

    #[test]
    fn escape_clears_selection_and_editor() {
        let keys = KeyboardHub::new().listen();
        let mut plan = FloorPlan::new(room_with(vec![item(1, 2, 2)]), FloorConfig::default());
        plan.double_activate(egui_center(2, 2));
        assert_eq!(plan.editing(), Some(ItemId(1)));
        plan.drain_events();

        assert!(plan.handle_key(&keys, FloorKey::Escape));
        assert_eq!(plan.selected(), None);
        assert_eq!(plan.editing(), None);
        assert_eq!(plan.drain_events(), vec![FloorEvent::SelectionChanged(None)]);
    }

    #[test]
    fn detached_listener_ignores_keys() {
        let hub = KeyboardHub::new();
        let mut keys = hub.listen();
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        keys.detach();
        assert!(!plan.handle_key(&keys, FloorKey::Escape));
        assert_eq!(plan.selected(), Some(ItemId(1)));
    }

    #[test]
    fn arrows_nudge_and_walls_are_silent() {
        let keys = KeyboardHub::new().listen();
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        plan.drain_events();

        assert!(plan.handle_key(&keys, FloorKey::ArrowLeft));
        assert!(plan.drain_events().is_empty());
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.position, GridPos::ORIGIN);

        assert!(plan.handle_key(&keys, FloorKey::ArrowDown));
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.position, GridPos::new(0, 1));
    }

    fn egui_center(x: i32, y: i32) -> eframe::egui::Pos2 {
        eframe::egui::pos2(60.0 + 40.0 * x as f32, 60.0 + 40.0 * y as f32)
    }
}
