// Game logic: the character and the scene that hosts it

pub mod characters;
pub mod scene;

pub use scene::{Scene, SceneConfig};
