//! Keyboard, pointer and touch mapping to direction and lifecycle intents

use crate::presenter::{action_enabled, ButtonId};
use macroquad::prelude::*;
use shared::{Direction, Lifecycle};
use std::collections::HashSet;

/// Keys the client reacts to. Everything else never reaches the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
    Escape,
}

const TRACKED_KEYS: [(KeyCode, KeyInput); 10] = [
    (KeyCode::Up, KeyInput::ArrowUp),
    (KeyCode::Down, KeyInput::ArrowDown),
    (KeyCode::Left, KeyInput::ArrowLeft),
    (KeyCode::Right, KeyInput::ArrowRight),
    (KeyCode::W, KeyInput::W),
    (KeyCode::A, KeyInput::A),
    (KeyCode::S, KeyInput::S),
    (KeyCode::D, KeyInput::D),
    (KeyCode::Space, KeyInput::Space),
    (KeyCode::Escape, KeyInput::Escape),
];

impl KeyInput {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            KeyInput::ArrowUp | KeyInput::W => Some(Direction::Up),
            KeyInput::ArrowDown | KeyInput::S => Some(Direction::Down),
            KeyInput::ArrowLeft | KeyInput::A => Some(Direction::Left),
            KeyInput::ArrowRight | KeyInput::D => Some(Direction::Right),
            KeyInput::Space | KeyInput::Escape => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    TogglePause,
    Resume,
    Restart,
    MainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Direction(Direction),
    Lifecycle(LifecycleAction),
}

/// Everything the controller saw during one frame, in arrival order.
#[derive(Debug, Default)]
pub struct FrameInput {
    pub keys: Vec<KeyInput>,
    pub presses: Vec<Vec2>,
}

/// Maps raw events to intents and drops those the current lifecycle does not allow.
pub struct InputController {
    prev_down: HashSet<KeyInput>,
}

impl InputController {
    pub fn new() -> Self {
        Self {
            prev_down: HashSet::new(),
        }
    }

    pub fn on_key(&self, key: KeyInput, lifecycle: Lifecycle) -> Option<Intent> {
        match key.direction() {
            Some(direction) => self.on_direction_button(direction, lifecycle),
            None if key == KeyInput::Space => match lifecycle {
                Lifecycle::Idle | Lifecycle::GameOver => {
                    Some(Intent::Lifecycle(LifecycleAction::Start))
                }
                Lifecycle::Paused => Some(Intent::Lifecycle(LifecycleAction::Resume)),
                Lifecycle::Playing => Some(Intent::Lifecycle(LifecycleAction::TogglePause)),
            },
            None => match lifecycle {
                Lifecycle::Playing => Some(Intent::Lifecycle(LifecycleAction::TogglePause)),
                Lifecycle::Paused => Some(Intent::Lifecycle(LifecycleAction::Resume)),
                Lifecycle::Idle | Lifecycle::GameOver => None,
            },
        }
    }

    pub fn on_direction_button(&self, direction: Direction, lifecycle: Lifecycle) -> Option<Intent> {
        (lifecycle == Lifecycle::Playing).then_some(Intent::Direction(direction))
    }

    pub fn on_lifecycle_button(
        &self,
        action: LifecycleAction,
        lifecycle: Lifecycle,
    ) -> Option<Intent> {
        action_enabled(action, lifecycle).then_some(Intent::Lifecycle(action))
    }

    pub fn on_button(&self, button: ButtonId, lifecycle: Lifecycle) -> Option<Intent> {
        match button {
            ButtonId::Pad(direction) => self.on_direction_button(direction, lifecycle),
            other => other
                .action()
                .and_then(|action| self.on_lifecycle_button(action, lifecycle)),
        }
    }

    /// Samples the keyboard and pointers for this frame.
    ///
    /// Keys are edge-triggered: a key held across frames is reported once.
    pub fn poll_frame(&mut self) -> FrameInput {
        let mut frame = FrameInput::default();

        frame.keys = self.key_edges(
            TRACKED_KEYS
                .iter()
                .map(|&(code, key)| (key, is_key_down(code), is_key_pressed(code))),
        );

        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            frame.presses.push(vec2(x, y));
        }
        for touch in touches() {
            if touch.phase == TouchPhase::Started {
                frame.presses.push(touch.position);
            }
        }

        frame
    }

    /// Folds one frame of `(key, down, pressed)` samples into newly pressed keys.
    ///
    /// `pressed` is latched by the window for the whole frame, so a tap released
    /// before the sample still counts.
    fn key_edges(
        &mut self,
        samples: impl Iterator<Item = (KeyInput, bool, bool)>,
    ) -> Vec<KeyInput> {
        let mut keys = Vec::new();
        let mut down = HashSet::new();
        for (key, is_down, pressed) in samples {
            if is_down {
                down.insert(key);
            }
            if pressed || (is_down && !self.prev_down.contains(&key)) {
                keys.push(key);
            }
        }
        self.prev_down = down;
        keys
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}
