/// Game loop timing and control system
///
/// Fixed timestep: the character and physics advance in equal steps no
/// matter how fast frames arrive, so jump heights and the jump's fall
/// timer come out the same on every machine.
use std::time::{Duration, Instant};

/// Target update rate (60 updates per second)
pub const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of fixed steps per frame to prevent spiral of death
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// FPS is averaged over this many frames
const FPS_WINDOW_SIZE: u64 = 60;

/// Game loop timing state
pub struct GameLoop {
    /// Time not yet consumed by fixed steps
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the game is paused
    paused: bool,

    /// Time covered by the current FPS window
    window_time: Duration,

    /// Frames counted in the current FPS window
    window_frames: u64,

    /// Current frame number
    frame_count: u64,

    /// Total fixed steps executed
    step_count: u64,

    /// Current FPS (updated once per window)
    current_fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            window_time: Duration::ZERO,
            window_frames: 0,
            frame_count: 0,
            step_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame using the wall clock, returns the number of fixed steps to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of elapsed time, returns the number of fixed steps to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        self.track_fps(frame_time);

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop time we could not catch up on rather than carrying it forever
        if steps == MAX_STEPS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Frame took {:?}, dropping {:?} of simulation time",
                frame_time,
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.step_count += steps as u64;
        steps
    }

    /// Length of one fixed step
    pub fn fixed_step(&self) -> Duration {
        FIXED_TIMESTEP_DURATION
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of fixed steps executed
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Game resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn track_fps(&mut self, frame_time: Duration) {
        self.window_time += frame_time;
        self.window_frames += 1;

        if self.window_frames >= FPS_WINDOW_SIZE {
            let secs = self.window_time.as_secs_f32();
            self.current_fps = if secs > 0.0 {
                self.window_frames as f32 / secs
            } else {
                0.0
            };
            self.window_time = Duration::ZERO;
            self.window_frames = 0;
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
