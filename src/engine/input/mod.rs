// Input handling system
//
// Keyboard input for the local player, sampled once per frame into an
// `InputSnapshot` for the character.
//
// ## Architecture
//
// - `action`: Defines game actions and default key bindings
// - `config`: Binding table and remapping
// - `player`: Held/just-pressed state and the per-frame snapshot
// - `manager`: Feeds winit keyboard events through the bindings
//
// ## Usage Example
//
// ```rust
// let mut input = InputManager::default();
//
// // In your event loop, process keyboard events
// input.process_keyboard_event(&key_event);
//
// // Once per fixed update
// let snapshot = input.snapshot();
// input.update();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

// Re-export commonly used types
pub use manager::InputManager;
pub use player::InputSnapshot;
