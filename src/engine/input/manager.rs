// Input manager - turns window keyboard events into player input

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::player::{InputSnapshot, PlayerInput};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Routes keyboard events through the bindings into the player's input state
#[derive(Debug)]
pub struct InputManager {
    config: InputConfig,
    player: PlayerInput,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            // Key repeats carry no new information
            if event.state == ElementState::Pressed && event.repeat {
                return;
            }
            self.process_key(key_code, event.state == ElementState::Pressed);
        }
    }

    /// Apply a key press or release
    pub fn process_key(&mut self, key_code: KeyCode, pressed: bool) {
        let Some(action) = self.config.get_action(InputSource::key(key_code)) else {
            return;
        };
        if pressed {
            self.player.press(action);
        } else {
            self.player.release(action);
        }
    }

    /// Update the player input state for a new frame
    /// Call this once per frame after processing all events
    pub fn update(&mut self) {
        self.player.update();
    }

    /// Sample the movement signals for this frame
    pub fn snapshot(&self) -> InputSnapshot {
        self.player.snapshot()
    }

    /// Check if the menu key was pressed this frame
    pub fn menu_requested(&self) -> bool {
        self.player.just_pressed(Action::Menu)
    }

    /// Check if the pause key was pressed this frame
    pub fn pause_requested(&self) -> bool {
        self.player.just_pressed(Action::Pause)
    }

    /// Forget all held keys (e.g. when the window loses focus)
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::with_defaults())
    }
}
