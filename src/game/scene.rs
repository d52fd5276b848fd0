// Scene: one character in a bounded world, advanced one fixed step at a time

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;

use crate::engine::input::InputSnapshot;
use crate::engine::physics::{
    body::presets, CharacterBody, FloorProbe, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::timer::TimerQueue;

use super::characters::{
    character_library, AnimationLibrary, AnimationPlayer, CharacterController,
    CharacterState, ControllerTuning,
};

/// World layout for a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Width of the bounded world in pixels
    pub width: f32,
    /// Height of the bounded world in pixels
    pub height: f32,
    /// Where the character's frame centre starts
    pub spawn: Vec2,
    /// Whether the character starts mirrored
    pub facing_left: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 240.0,
            spawn: Vec2::new(32.0, 200.0),
            facing_left: false,
        }
    }
}

/// Everything the character needs to run: physics, timers, animation
pub struct Scene {
    physics: PhysicsWorld,
    timers: TimerQueue,
    animation: AnimationPlayer,
    controller: CharacterController,
    body_handle: RigidBodyHandle,
    probe: FloorProbe,
}

impl Scene {
    /// Build a scene using a library that already holds the character clips
    pub fn new(
        config: SceneConfig,
        tuning: ControllerTuning,
        library: Arc<AnimationLibrary>,
    ) -> Result<Self> {
        for key in CharacterState::ALL.map(|state| state.animation_key()) {
            if !library.contains(key) {
                anyhow::bail!("Animation library is missing '{}'", key);
            }
        }

        let mut physics = PhysicsWorld::new();
        physics.add_bounds(config.width, config.height);

        let (offset_x, offset_y) = tuning.body_center_offset();
        let body_handle = physics.add_rigid_body(presets::player_body(config.spawn.x, config.spawn.y));
        physics.add_collider(
            presets::player_collider(tuning.body_width, tuning.body_height, offset_x, offset_y),
            body_handle,
        );
        let probe = FloorProbe::new(tuning.body_width, tuning.body_height, offset_x, offset_y);

        let controller = CharacterController::new(tuning, config.facing_left);
        let mut animation = AnimationPlayer::new(library);
        controller.show_current_pose(&mut animation);
        animation.set_flip_horizontal(controller.is_facing_left());

        log::info!(
            "Scene ready: {}x{} world, character at ({}, {})",
            config.width,
            config.height,
            config.spawn.x,
            config.spawn.y
        );

        Ok(Self {
            physics,
            timers: TimerQueue::new(),
            animation,
            controller,
            body_handle,
            probe,
        })
    }

    /// Build a scene with its own freshly registered character clips
    pub fn with_defaults(config: SceneConfig) -> Result<Self> {
        let library = character_library().context("registering character animations")?;
        Self::new(config, ControllerTuning::standard(), library)
    }

    /// Advance one fixed step: timers, character, physics, animation
    pub fn update(&mut self, dt: Duration, input: &InputSnapshot) {
        let dt_secs = dt.as_secs_f32();

        for handle in self.timers.advance(dt) {
            self.controller.on_timer(handle, &mut self.animation);
        }

        let mut body = CharacterBody::new(&mut self.physics, self.body_handle, self.probe);
        self.controller.tick(
            dt_secs,
            input,
            &mut body,
            &mut self.animation,
            &mut self.timers,
        );

        self.physics.set_timestep(dt_secs);
        self.physics.step();

        self.animation
            .set_flip_horizontal(self.controller.is_facing_left());
        self.animation.update(dt_secs);
    }

    pub fn state(&self) -> CharacterState {
        self.controller.state()
    }

    pub fn controller(&self) -> &CharacterController {
        &self.controller
    }

    pub fn animation(&self) -> &AnimationPlayer {
        &self.animation
    }

    /// Character position (frame centre)
    pub fn position(&self) -> Vec2 {
        self.physics
            .get_rigid_body(self.body_handle)
            .map(|body| Vec2::new(body.translation().x, body.translation().y))
            .unwrap_or(Vec2::ZERO)
    }

    /// Character velocity
    pub fn velocity(&self) -> Vec2 {
        self.physics
            .get_rigid_body(self.body_handle)
            .map(|body| Vec2::new(body.linvel().x, body.linvel().y))
            .unwrap_or(Vec2::ZERO)
    }
}
