// Character system
//
// This module contains everything related to the playable character:
// - State enumeration
// - Controller running the state machine once per frame
// - Tuning constants and body geometry
// - Animation clips and playback

pub mod animation;
pub mod controller;
pub mod state;
pub mod tuning;

// Re-export commonly used types
pub use animation::{character_library, AnimationLibrary, AnimationPlayer};
pub use controller::CharacterController;
pub use state::CharacterState;
pub use tuning::ControllerTuning;
