// Character controller: input and floor contact in, velocity and animation out

use glam::Vec2;

use crate::engine::input::InputSnapshot;
use crate::engine::physics::Body;
use crate::engine::timer::{TimerHandle, TimerService};

use super::animation::Animator;
use super::state::CharacterState;
use super::tuning::ControllerTuning;

/// What a single tick decided to do, besides setting velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Run the entry action of a state
    Enter(CharacterState),
    /// Mirror the character without changing state
    Flip,
}

/// Drives one character through standing, walking, crouching, jumping and falling
#[derive(Debug)]
pub struct CharacterController {
    tuning: ControllerTuning,
    state: CharacterState,
    previous_state: CharacterState,
    /// Seconds spent in the current state
    state_time: f32,
    /// True when mirrored to face left
    facing_left: bool,
    /// Timer that ends the jump's rise; at most one is live
    fall_timer: Option<TimerHandle>,
}

impl CharacterController {
    /// Create a standing character. Animations must already be registered.
    pub fn new(tuning: ControllerTuning, facing_left: bool) -> Self {
        Self {
            tuning,
            state: CharacterState::Standing,
            previous_state: CharacterState::Standing,
            state_time: 0.0,
            facing_left,
            fall_timer: None,
        }
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn previous_state(&self) -> CharacterState {
        self.previous_state
    }

    /// Get time spent in current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn is_facing_left(&self) -> bool {
        self.facing_left
    }

    /// Show the pose for the current state without running its entry action
    pub fn show_current_pose<A: Animator>(&self, animator: &mut A) {
        animator.play(self.state.animation_key());
    }

    /// Run one frame: set velocity and facing, then take at most one transition
    pub fn tick<B, A, T>(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        body: &mut B,
        animator: &mut A,
        timers: &mut T,
    ) where
        B: Body,
        A: Animator,
        T: TimerService,
    {
        self.state_time += dt;

        let velocity_x = input.direction() * self.tuning.walk_speed;

        // Left wins when both are held
        if input.left {
            self.facing_left = true;
        } else if input.right {
            self.facing_left = false;
        }

        match self.state {
            CharacterState::Standing | CharacterState::Crouching => body.set_velocity(Vec2::ZERO),
            CharacterState::Walking => body.set_velocity(Vec2::new(velocity_x, 0.0)),
            // Vertical motion is left to gravity
            CharacterState::Jumping | CharacterState::Falling => body.set_velocity_x(velocity_x),
        }

        match self.decide(input, body.on_floor()) {
            Some(Transition::Enter(next)) => self.enter(next, body, animator, timers),
            Some(Transition::Flip) => self.flip(),
            None => {}
        }
    }

    /// Pick the first transition whose condition holds, in priority order
    pub fn decide(&self, input: &InputSnapshot, on_floor: bool) -> Option<Transition> {
        let jumping = on_floor && input.jump;
        let walking = on_floor && input.wants_walk();
        let crouching = on_floor && input.down;
        let flipping = self.is_flipping(input);

        let transition = match self.state {
            CharacterState::Standing => {
                if jumping {
                    Transition::Enter(CharacterState::Jumping)
                } else if walking {
                    Transition::Enter(CharacterState::Walking)
                } else if crouching {
                    Transition::Enter(CharacterState::Crouching)
                } else if !on_floor {
                    Transition::Enter(CharacterState::Falling)
                } else if flipping {
                    Transition::Flip
                } else {
                    return None;
                }
            }
            CharacterState::Walking => {
                if jumping {
                    Transition::Enter(CharacterState::Jumping)
                } else if !on_floor {
                    Transition::Enter(CharacterState::Falling)
                } else if !walking {
                    Transition::Enter(CharacterState::Standing)
                } else if flipping {
                    Transition::Flip
                } else {
                    return None;
                }
            }
            CharacterState::Crouching => {
                if !crouching {
                    Transition::Enter(CharacterState::Standing)
                } else if flipping {
                    Transition::Flip
                } else {
                    return None;
                }
            }
            CharacterState::Jumping | CharacterState::Falling => {
                if on_floor {
                    Transition::Enter(CharacterState::Standing)
                } else if flipping {
                    Transition::Flip
                } else {
                    return None;
                }
            }
        };
        Some(transition)
    }

    /// Route a fired timer. Returns true if it was this character's fall timer.
    pub fn on_timer<A: Animator>(&mut self, handle: TimerHandle, animator: &mut A) -> bool {
        if self.fall_timer != Some(handle) {
            log::trace!("Ignoring timer {} (not ours)", handle.id());
            return false;
        }
        self.fall_timer = None;
        self.enter_falling(animator);
        true
    }

    /// Whether the held direction disagrees with where the character faces
    fn is_flipping(&self, input: &InputSnapshot) -> bool {
        let wanted = if input.left {
            Some(true)
        } else if input.right {
            Some(false)
        } else {
            None
        };
        wanted.is_some_and(|left| left != self.facing_left)
    }

    fn enter<B, A, T>(&mut self, next: CharacterState, body: &mut B, animator: &mut A, timers: &mut T)
    where
        B: Body,
        A: Animator,
        T: TimerService,
    {
        match next {
            CharacterState::Jumping => self.enter_jumping(body, animator, timers),
            CharacterState::Walking => {
                self.set_state(CharacterState::Walking);
                animator.play("walk");
            }
            CharacterState::Crouching => {
                self.set_state(CharacterState::Crouching);
                animator.play("crouch");
            }
            CharacterState::Falling => self.enter_falling(animator),
            CharacterState::Standing => self.enter_standing(animator, timers),
        }
    }

    fn enter_jumping<B, A, T>(&mut self, body: &mut B, animator: &mut A, timers: &mut T)
    where
        B: Body,
        A: Animator,
        T: TimerService,
    {
        self.set_state(CharacterState::Jumping);
        animator.play("jump");
        body.set_velocity_y(self.tuning.jump_velocity);

        // A leftover timer would later force a fall out of an unrelated state
        if let Some(stale) = self.fall_timer.take() {
            timers.cancel(stale);
        }
        self.fall_timer = Some(timers.schedule(self.tuning.fall_delay));
    }

    fn enter_falling<A: Animator>(&mut self, animator: &mut A) {
        self.set_state(CharacterState::Falling);
        animator.play("jump");
    }

    fn enter_standing<A: Animator, T: TimerService>(&mut self, animator: &mut A, timers: &mut T) {
        self.set_state(CharacterState::Standing);
        animator.play("stand");
        if let Some(handle) = self.fall_timer.take() {
            timers.cancel(handle);
        }
    }

    fn flip(&mut self) {
        self.facing_left = !self.facing_left;
        log::trace!("Character flipped, facing left: {}", self.facing_left);
    }

    fn set_state(&mut self, next: CharacterState) {
        log::debug!("Character {} -> {}", self.state, next);
        self.previous_state = self.state;
        self.state = next;
        self.state_time = 0.0;
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(ControllerTuning::standard(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::timer::TimerQueue;
    use approx::assert_relative_eq;
    use std::time::Duration;

    const FRAME: f32 = 1.0 / 60.0;

    #[derive(Debug, Default)]
    struct FakeBody {
        on_floor: bool,
        velocity: Vec2,
    }

    impl Body for FakeBody {
        fn on_floor(&self) -> bool {
            self.on_floor
        }

        fn velocity(&self) -> Vec2 {
            self.velocity
        }

        fn set_velocity(&mut self, velocity: Vec2) {
            self.velocity = velocity;
        }
    }

    #[derive(Debug, Default)]
    struct RecordingAnimator {
        plays: Vec<String>,
    }

    impl Animator for RecordingAnimator {
        fn play(&mut self, key: &str) {
            self.plays.push(key.to_string());
        }
    }

    struct Rig {
        controller: CharacterController,
        body: FakeBody,
        animator: RecordingAnimator,
        timers: TimerQueue,
    }

    impl Rig {
        fn on_floor() -> Self {
            Self {
                controller: CharacterController::default(),
                body: FakeBody {
                    on_floor: true,
                    velocity: Vec2::ZERO,
                },
                animator: RecordingAnimator::default(),
                timers: TimerQueue::new(),
            }
        }

        fn tick(&mut self, input: InputSnapshot) {
            self.controller.tick(
                FRAME,
                &input,
                &mut self.body,
                &mut self.animator,
                &mut self.timers,
            );
        }

        /// Let engine time pass and deliver any fired timers
        fn advance(&mut self, dt: Duration) {
            for handle in self.timers.advance(dt) {
                self.controller.on_timer(handle, &mut self.animator);
            }
        }

        fn last_play(&self) -> Option<&str> {
            self.animator.plays.last().map(String::as_str)
        }
    }

    fn none() -> InputSnapshot {
        InputSnapshot::default()
    }

    fn left() -> InputSnapshot {
        InputSnapshot {
            left: true,
            ..Default::default()
        }
    }

    fn right() -> InputSnapshot {
        InputSnapshot {
            right: true,
            ..Default::default()
        }
    }

    fn jump() -> InputSnapshot {
        InputSnapshot {
            jump: true,
            ..Default::default()
        }
    }

    fn down() -> InputSnapshot {
        InputSnapshot {
            down: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = CharacterController::default();
        assert_eq!(controller.state(), CharacterState::Standing);
        assert!(!controller.is_facing_left());
        assert_eq!(controller.fall_timer, None);
        assert_eq!(controller.tuning.walk_speed, 128.0);
    }

    #[test]
    fn test_initial_facing_from_orientation() {
        let controller = CharacterController::new(ControllerTuning::standard(), true);
        assert!(controller.is_facing_left());
    }

    #[test]
    fn test_show_current_pose() {
        let controller = CharacterController::default();
        let mut animator = RecordingAnimator::default();
        controller.show_current_pose(&mut animator);
        assert_eq!(animator.plays, vec!["stand"]);
    }

    #[test]
    fn test_jump_from_standing() {
        let mut rig = Rig::on_floor();
        rig.tick(jump());

        assert_eq!(rig.controller.state(), CharacterState::Jumping);
        assert_eq!(rig.body.velocity.y, -256.0);
        assert_eq!(rig.animator.plays, vec!["jump"]);

        let timer = rig.controller.fall_timer.expect("fall timer scheduled");
        assert_eq!(rig.timers.advance(Duration::from_millis(500)), vec![timer]);
    }

    #[test]
    fn test_jump_preempts_walk() {
        let mut rig = Rig::on_floor();
        rig.tick(InputSnapshot {
            jump: true,
            left: true,
            ..Default::default()
        });
        assert_eq!(rig.controller.state(), CharacterState::Jumping);
    }

    #[test]
    fn test_walk_preempts_crouch() {
        let mut rig = Rig::on_floor();
        rig.tick(InputSnapshot {
            right: true,
            down: true,
            ..Default::default()
        });
        assert_eq!(rig.controller.state(), CharacterState::Walking);
        assert_eq!(rig.last_play(), Some("walk"));
    }

    #[test]
    fn test_jump_requires_floor() {
        let mut rig = Rig::on_floor();
        rig.body.on_floor = false;
        rig.tick(jump());
        assert_eq!(rig.controller.state(), CharacterState::Falling);
        assert_eq!(rig.controller.fall_timer, None);
    }

    #[test]
    fn test_walking_velocity() {
        let mut rig = Rig::on_floor();
        rig.tick(right());
        assert_eq!(rig.controller.state(), CharacterState::Walking);

        rig.tick(right());
        assert_eq!(rig.body.velocity, Vec2::new(128.0, 0.0));

        rig.tick(left());
        assert_eq!(rig.body.velocity, Vec2::new(-128.0, 0.0));
        assert_eq!(rig.controller.state(), CharacterState::Walking);
    }

    #[test]
    fn test_both_directions_move_right_face_left() {
        let mut rig = Rig::on_floor();
        let both = InputSnapshot {
            left: true,
            right: true,
            ..Default::default()
        };
        rig.tick(both);
        rig.tick(both);

        assert_eq!(rig.controller.state(), CharacterState::Walking);
        assert_eq!(rig.body.velocity.x, 128.0);
        assert!(rig.controller.is_facing_left());
    }

    #[test]
    fn test_walking_stops_without_direction() {
        let mut rig = Rig::on_floor();
        rig.tick(right());
        rig.tick(none());
        assert_eq!(rig.controller.state(), CharacterState::Standing);
        assert_eq!(rig.last_play(), Some("stand"));

        rig.tick(none());
        assert_eq!(rig.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_walking_off_ledge_falls() {
        let mut rig = Rig::on_floor();
        rig.tick(right());
        rig.body.on_floor = false;
        rig.tick(right());

        assert_eq!(rig.controller.state(), CharacterState::Falling);
        assert_eq!(rig.last_play(), Some("jump"));
    }

    #[test]
    fn test_facing_follows_held_direction() {
        let mut rig = Rig::on_floor();

        rig.tick(left());
        assert!(rig.controller.is_facing_left());

        // Mid-walk reversal
        rig.tick(right());
        assert!(!rig.controller.is_facing_left());
        assert_eq!(rig.controller.state(), CharacterState::Walking);

        rig.tick(left());
        assert!(rig.controller.is_facing_left());

        // Neither held keeps the last facing
        rig.tick(none());
        rig.tick(none());
        assert!(rig.controller.is_facing_left());
    }

    #[test]
    fn test_facing_changes_while_crouching() {
        let mut rig = Rig::on_floor();
        rig.tick(down());
        assert_eq!(rig.controller.state(), CharacterState::Crouching);

        rig.tick(InputSnapshot {
            down: true,
            left: true,
            ..Default::default()
        });
        assert_eq!(rig.controller.state(), CharacterState::Crouching);
        assert!(rig.controller.is_facing_left());
        assert_eq!(rig.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_standing_is_idempotent() {
        let mut rig = Rig::on_floor();
        for _ in 0..120 {
            rig.tick(none());
        }
        assert_eq!(rig.controller.state(), CharacterState::Standing);
        assert!(rig.animator.plays.is_empty());
        assert_eq!(rig.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_standing_off_floor_falls() {
        let mut rig = Rig::on_floor();
        rig.body.on_floor = false;
        rig.tick(none());

        assert_eq!(rig.controller.state(), CharacterState::Falling);
        assert_eq!(rig.animator.plays, vec!["jump"]);
    }

    #[test]
    fn test_crouch_and_release() {
        let mut rig = Rig::on_floor();
        rig.tick(down());
        assert_eq!(rig.controller.state(), CharacterState::Crouching);
        assert_eq!(rig.last_play(), Some("crouch"));

        rig.tick(down());
        assert_eq!(rig.controller.state(), CharacterState::Crouching);

        rig.tick(none());
        assert_eq!(rig.controller.state(), CharacterState::Standing);
        assert_eq!(rig.last_play(), Some("stand"));
    }

    #[test]
    fn test_crouch_ignores_walk_and_jump() {
        let mut rig = Rig::on_floor();
        rig.tick(down());
        rig.tick(InputSnapshot {
            down: true,
            jump: true,
            right: true,
            ..Default::default()
        });
        assert_eq!(rig.controller.state(), CharacterState::Crouching);
        assert_eq!(rig.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_crouch_losing_floor_stands_then_falls() {
        let mut rig = Rig::on_floor();
        rig.tick(down());
        rig.body.on_floor = false;

        rig.tick(down());
        assert_eq!(rig.controller.state(), CharacterState::Standing);

        rig.tick(down());
        assert_eq!(rig.controller.state(), CharacterState::Falling);
    }

    #[test]
    fn test_air_control_keeps_vertical_velocity() {
        let mut rig = Rig::on_floor();
        rig.tick(jump());
        rig.body.on_floor = false;

        rig.tick(right());
        assert_eq!(rig.controller.state(), CharacterState::Jumping);
        assert_eq!(rig.body.velocity, Vec2::new(128.0, -256.0));
    }

    #[test]
    fn test_jump_turns_to_fall_after_delay() {
        let mut rig = Rig::on_floor();
        rig.tick(jump());
        rig.body.on_floor = false;

        rig.advance(Duration::from_millis(499));
        assert_eq!(rig.controller.state(), CharacterState::Jumping);

        rig.advance(Duration::from_millis(1));
        assert_eq!(rig.controller.state(), CharacterState::Falling);
        assert_eq!(rig.controller.previous_state(), CharacterState::Jumping);
        assert_eq!(rig.last_play(), Some("jump"));
        assert_eq!(rig.controller.fall_timer, None);
    }

    #[test]
    fn test_landing_stands_and_cancels_timer() {
        let mut rig = Rig::on_floor();
        rig.tick(jump());
        let timer = rig.controller.fall_timer.unwrap();

        rig.body.on_floor = false;
        rig.tick(none());
        rig.body.on_floor = true;
        rig.tick(none());

        assert_eq!(rig.controller.state(), CharacterState::Standing);
        assert_eq!(rig.last_play(), Some("stand"));
        assert_eq!(rig.controller.fall_timer, None);
        assert!(!rig.timers.cancel(timer));

        rig.advance(Duration::from_secs(1));
        assert_eq!(rig.controller.state(), CharacterState::Standing);
    }

    #[test]
    fn test_falling_lands_and_zeroes_velocity() {
        let mut rig = Rig::on_floor();
        rig.body.on_floor = false;
        rig.tick(none());
        assert_eq!(rig.controller.state(), CharacterState::Falling);

        rig.body.velocity = Vec2::new(0.0, 200.0);
        rig.body.on_floor = true;
        rig.tick(none());
        assert_eq!(rig.controller.state(), CharacterState::Standing);
        assert_eq!(rig.last_play(), Some("stand"));

        rig.tick(none());
        assert_eq!(rig.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_new_jump_replaces_old_timer() {
        let mut rig = Rig::on_floor();
        rig.tick(jump());
        let first = rig.controller.fall_timer.unwrap();

        // Land and jump again straight away
        rig.tick(none());
        rig.tick(jump());
        let second = rig.controller.fall_timer.unwrap();

        assert_ne!(first, second);
        assert!(!rig.timers.cancel(first));
        assert_eq!(rig.timers.advance(Duration::from_secs(1)), vec![second]);
    }

    #[test]
    fn test_foreign_timer_ignored() {
        let mut rig = Rig::on_floor();
        rig.tick(jump());
        let foreign = rig.timers.schedule(Duration::from_millis(1));

        assert!(!rig.controller.on_timer(foreign, &mut rig.animator));
        assert_eq!(rig.controller.state(), CharacterState::Jumping);
    }

    #[test]
    fn test_state_time() {
        let mut rig = Rig::on_floor();
        rig.tick(none());
        rig.tick(none());
        assert_relative_eq!(rig.controller.state_time(), 2.0 * FRAME);

        rig.tick(right());
        assert_eq!(rig.controller.state_time(), 0.0);

        rig.tick(right());
        assert_relative_eq!(rig.controller.state_time(), FRAME);
    }

    #[test]
    fn test_decide_priorities() {
        let controller = CharacterController::default();
        let everything = InputSnapshot {
            left: true,
            right: true,
            jump: true,
            down: true,
        };

        assert_eq!(
            controller.decide(&everything, true),
            Some(Transition::Enter(CharacterState::Jumping))
        );
        assert_eq!(
            controller.decide(&everything, false),
            Some(Transition::Enter(CharacterState::Falling))
        );
        assert_eq!(controller.decide(&none(), true), None);
    }

    #[test]
    fn test_decide_flip_on_mismatch() {
        let controller = CharacterController::default();
        assert_eq!(controller.decide(&none(), true), None);

        let mut airborne = CharacterController::default();
        airborne.set_state(CharacterState::Falling);
        assert_eq!(airborne.decide(&left(), false), Some(Transition::Flip));
        assert_eq!(airborne.decide(&right(), false), None);
    }

    #[test]
    fn test_scripted_run() {
        use CharacterState::*;

        let mut rig = Rig::on_floor();
        // (input, on floor, state after the tick)
        let script = [
            (none(), true, Standing),
            (right(), true, Walking),
            (right(), true, Walking),
            (jump(), true, Jumping),
            (right(), false, Jumping),
            (none(), false, Jumping),
            (none(), true, Standing),
            (down(), true, Crouching),
            (left(), true, Standing),
            (left(), true, Walking),
            (none(), false, Falling),
            (none(), true, Standing),
        ];

        for (frame, (input, on_floor, expected)) in script.into_iter().enumerate() {
            rig.body.on_floor = on_floor;
            rig.tick(input);
            assert_eq!(rig.controller.state(), expected, "frame {frame}");
        }

        assert_eq!(
            rig.animator.plays,
            vec!["walk", "jump", "stand", "crouch", "stand", "walk", "jump", "stand"]
        );
        assert!(rig.controller.is_facing_left());
        assert_eq!(rig.controller.fall_timer, None);
    }
}
