// Character states

/// The closed set of states a character can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterState {
    /// Standing still on the floor
    Standing,
    /// Moving horizontally on the floor
    Walking,
    /// Ducking on the floor
    Crouching,
    /// Rising after a jump
    Jumping,
    /// In the air without jump lift
    Falling,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::Standing
    }
}

impl CharacterState {
    pub const ALL: [CharacterState; 5] = [
        Self::Standing,
        Self::Walking,
        Self::Crouching,
        Self::Jumping,
        Self::Falling,
    ];

    /// Animation key played on entry to this state.
    /// Falling reuses the jump pose.
    pub fn animation_key(&self) -> &'static str {
        match self {
            Self::Standing => "stand",
            Self::Walking => "walk",
            Self::Crouching => "crouch",
            Self::Jumping | Self::Falling => "jump",
        }
    }
}

impl std::fmt::Display for CharacterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Standing => "standing",
            Self::Walking => "walking",
            Self::Crouching => "crouching",
            Self::Jumping => "jumping",
            Self::Falling => "falling",
        };
        f.write_str(name)
    }
}
