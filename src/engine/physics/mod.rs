// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{Body, CharacterBody, FloorProbe, RigidBodyHandle};
pub use world::PhysicsWorld;
