// Character animation system

use std::collections::HashMap;
use std::sync::Arc;

/// Animation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Animation already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Animation has no frames: {0}")]
    Empty(String),
}

/// Something that can play an animation by key
pub trait Animator {
    fn play(&mut self, key: &str);
}

/// A single animation clip: a contiguous range of sprite sheet frames
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Key the clip is played by (e.g., "stand", "walk")
    pub key: String,
    /// First sprite sheet frame of the clip
    pub first_frame: usize,
    /// Number of frames in the clip
    pub frame_count: usize,
    /// Frames per second; 0 holds the first frame forever
    pub fps: f32,
    /// Whether the clip restarts after its last frame
    pub looping: bool,
}

impl AnimationClip {
    /// Create a clip covering `first_frame..=last_frame`
    pub fn range(key: &str, first_frame: usize, last_frame: usize, fps: f32, looping: bool) -> Self {
        Self {
            key: key.to_string(),
            first_frame,
            frame_count: last_frame.saturating_sub(first_frame) + 1,
            fps,
            looping,
        }
    }

    /// Create a single-frame clip that never advances
    pub fn pose(key: &str, frame: usize) -> Self {
        Self::range(key, frame, frame, 0.0, false)
    }

    /// Create a looping clip
    pub fn looping(key: &str, first_frame: usize, last_frame: usize, fps: f32) -> Self {
        Self::range(key, first_frame, last_frame, fps, true)
    }

    /// Duration of each frame in seconds, or None for a static pose
    pub fn frame_duration(&self) -> Option<f32> {
        (self.fps > 0.0).then(|| 1.0 / self.fps)
    }
}

/// Shared, registered-once set of animation clips
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    clips: HashMap<String, AnimationClip>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip. Keys must be unique.
    pub fn register(&mut self, clip: AnimationClip) -> Result<(), AnimationError> {
        if clip.frame_count == 0 {
            return Err(AnimationError::Empty(clip.key));
        }
        if self.clips.contains_key(&clip.key) {
            return Err(AnimationError::AlreadyRegistered(clip.key));
        }
        self.clips.insert(clip.key.clone(), clip);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&AnimationClip> {
        self.clips.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.clips.contains_key(key)
    }
}

/// Register the character's four clips. Call once per library, not per character.
pub fn register_character_animations(library: &mut AnimationLibrary) -> Result<(), AnimationError> {
    library.register(AnimationClip::pose("stand", 0))?;
    library.register(AnimationClip::looping("walk", 0, 2, 12.0))?;
    library.register(AnimationClip::pose("jump", 2))?;
    library.register(AnimationClip::pose("crouch", 3))?;
    Ok(())
}

/// Build a library holding just the character clips
pub fn character_library() -> Result<Arc<AnimationLibrary>, AnimationError> {
    let mut library = AnimationLibrary::new();
    register_character_animations(&mut library)?;
    Ok(Arc::new(library))
}

/// Manages animation playback for one sprite
#[derive(Debug)]
pub struct AnimationPlayer {
    /// Clips available to this player
    library: Arc<AnimationLibrary>,
    /// Currently playing clip key (empty until the first play)
    current_animation: String,
    /// Frame index within the current clip
    current_frame: usize,
    /// Time elapsed in current frame
    frame_timer: f32,
    /// Whether the animation is advancing
    playing: bool,
    /// Whether the sprite should be flipped horizontally
    flip_horizontal: bool,
}

impl AnimationPlayer {
    pub fn new(library: Arc<AnimationLibrary>) -> Self {
        Self {
            library,
            current_animation: String::new(),
            current_frame: 0,
            frame_timer: 0.0,
            playing: false,
            flip_horizontal: false,
        }
    }

    /// Play an animation by key. Does nothing if it is already the current one.
    pub fn play(&mut self, key: &str) {
        if self.current_animation == key {
            return;
        }
        if !self.library.contains(key) {
            log::warn!("Unknown animation '{}', keeping '{}'", key, self.current_animation);
            return;
        }
        self.current_animation = key.to_string();
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.playing = true;
    }

    /// Set horizontal flip state
    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    /// Get horizontal flip state
    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    /// Advance the animation (called every frame)
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let Some(clip) = self.library.get(&self.current_animation) else {
            return;
        };
        let Some(frame_duration) = clip.frame_duration() else {
            return;
        };

        self.frame_timer += dt;

        while self.frame_timer >= frame_duration {
            self.frame_timer -= frame_duration;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = 0;
                } else {
                    // Stay on last frame
                    self.current_frame = clip.frame_count - 1;
                    self.playing = false;
                    break;
                }
            }
        }
    }

    /// Get the current animation key
    pub fn current_animation(&self) -> &str {
        &self.current_animation
    }

    /// Get the sprite sheet frame to draw, if anything is playing
    pub fn sheet_frame(&self) -> Option<usize> {
        self.current_clip()
            .map(|clip| clip.first_frame + self.current_frame.min(clip.frame_count - 1))
    }

    /// Get the clip info for the current animation
    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.library.get(&self.current_animation)
    }
}

impl Animator for AnimationPlayer {
    fn play(&mut self, key: &str) {
        AnimationPlayer::play(self, key);
    }
}
