// Character tuning - fixed at construction, never changed afterwards

use std::time::Duration;

/// Movement constants and body geometry for the character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerTuning {
    // Movement
    /// Horizontal speed while a direction is held (units/second)
    pub walk_speed: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_velocity: f32,
    /// How long the jump keeps the character in the jumping state
    pub fall_delay: Duration,

    // Dimensions (sprite frame and physics box, in pixels)
    /// Sprite frame width
    pub frame_width: f32,
    /// Sprite frame height
    pub frame_height: f32,
    /// Physics box width
    pub body_width: f32,
    /// Physics box height
    pub body_height: f32,
    /// Offset of the physics box's top-left corner inside the frame
    pub body_offset: (f32, f32),
}

/// The standard tuning used by the character
pub const BASE_TUNING: ControllerTuning = ControllerTuning {
    walk_speed: 128.0,
    jump_velocity: -256.0,
    fall_delay: Duration::from_millis(500),

    frame_width: 16.0,
    frame_height: 32.0,
    body_width: 16.0,
    body_height: 24.0,
    body_offset: (0.0, 8.0),
};

impl Default for ControllerTuning {
    fn default() -> Self {
        BASE_TUNING
    }
}

impl ControllerTuning {
    /// Get the standard tuning
    pub fn standard() -> Self {
        BASE_TUNING
    }

    /// Offset of the physics box centre from the frame centre
    pub fn body_center_offset(&self) -> (f32, f32) {
        let x = self.body_offset.0 + self.body_width / 2.0 - self.frame_width / 2.0;
        let y = self.body_offset.1 + self.body_height / 2.0 - self.frame_height / 2.0;
        (x, y)
    }
}
