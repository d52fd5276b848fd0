use super::collision::CollisionGroups;
use super::world::PhysicsWorld;
use glam::Vec2;
use rapier2d::prelude::*;

pub use rapier2d::prelude::RigidBodyHandle;

/// Something with a settable velocity that knows whether it rests on a floor
pub trait Body {
    /// Whether the body rests on a solid surface below it
    fn on_floor(&self) -> bool;

    /// Current linear velocity
    fn velocity(&self) -> Vec2;

    /// Replace both velocity components
    fn set_velocity(&mut self, velocity: Vec2);

    /// Replace the horizontal component, keeping the vertical one
    fn set_velocity_x(&mut self, x: f32) {
        let velocity = self.velocity();
        self.set_velocity(Vec2::new(x, velocity.y));
    }

    /// Replace the vertical component, keeping the horizontal one
    fn set_velocity_y(&mut self, y: f32) {
        let velocity = self.velocity();
        self.set_velocity(Vec2::new(velocity.x, y));
    }
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            gravity_scale: 1.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            gravity_scale: 0.0,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (useful for player characters)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for box colliders, optionally offset from their parent body
pub struct ColliderBuilder2D {
    half_extents: (Real, Real),
    offset: Vector<Real>,
    collision_groups: CollisionGroups,
    friction: Real,
    restitution: Real,
    density: Real,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self {
            half_extents: (half_width, half_height),
            offset: Vector::zeros(),
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Shift the collider's centre relative to its parent body
    pub fn offset(mut self, x: Real, y: Real) -> Self {
        self.offset = vector![x, y];
        self
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set density (mass will be calculated from shape area)
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        ColliderBuilder::cuboid(self.half_extents.0, self.half_extents.1)
            .translation(self.offset)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .build()
    }
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Create a player character body (dynamic, rotation locked, never sleeps)
    pub fn player_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .gravity_scale(1.0)
            .can_sleep(false)
            .build()
    }

    /// Create a player character collider (box, centre offset from the body origin)
    pub fn player_collider(width: Real, height: Real, offset_x: Real, offset_y: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .offset(offset_x, offset_y)
            .collision_groups(CollisionGroups::Player)
            .friction(0.0) // No friction for smooth movement
            .restitution(0.0)
            .density(1.0)
            .build()
    }

    /// Create a platform body (fixed/static)
    pub fn platform_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Create a platform collider (box shape)
    pub fn platform_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Platform)
            .friction(0.3)
            .restitution(0.0)
            .build()
    }
}

/// Where the floor probe rays start, relative to the body origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorProbe {
    /// Y of the collider's bottom edge
    pub bottom: Real,
    /// Half width of the collider
    pub half_width: Real,
    /// Horizontal centre of the collider
    pub center_x: Real,
}

impl FloorProbe {
    /// How far above the bottom edge the rays start
    const START_INSET: Real = 0.5;
    /// How far below the bottom edge a surface still counts as floor
    const REACH: Real = 1.0;
    /// Keep the outer rays off the collider's corners
    const EDGE_INSET: Real = 1.0;

    pub fn new(width: Real, height: Real, offset_x: Real, offset_y: Real) -> Self {
        Self {
            bottom: offset_y + height / 2.0,
            half_width: width / 2.0,
            center_x: offset_x,
        }
    }
}

/// A character's rigid body inside a physics world
pub struct CharacterBody<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
    probe: FloorProbe,
}

impl<'w> CharacterBody<'w> {
    pub fn new(world: &'w mut PhysicsWorld, handle: RigidBodyHandle, probe: FloorProbe) -> Self {
        Self {
            world,
            handle,
            probe,
        }
    }
}

impl Body for CharacterBody<'_> {
    fn on_floor(&self) -> bool {
        let Some(body) = self.world.get_rigid_body(self.handle) else {
            return false;
        };

        let position = body.translation();
        let y = position.y + self.probe.bottom - FloorProbe::START_INSET;
        let spread = self.probe.half_width - FloorProbe::EDGE_INSET;
        let filter = QueryFilter::default().exclude_rigid_body(self.handle);

        // Left edge, centre, right edge
        [-spread, 0.0, spread].into_iter().any(|dx| {
            let origin = vector![position.x + self.probe.center_x + dx, y];
            self.world
                .raycast(
                    origin,
                    vector![0.0, 1.0],
                    FloorProbe::START_INSET + FloorProbe::REACH,
                    true,
                    filter,
                )
                .is_some()
        })
    }

    fn velocity(&self) -> Vec2 {
        self.world
            .get_rigid_body(self.handle)
            .map(|body| {
                let vel = body.linvel();
                Vec2::new(vel.x, vel.y)
            })
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        if let Some(body) = self.world.get_rigid_body_mut(self.handle) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }
}
