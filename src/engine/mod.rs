// Engine modules: physics, input, timers, frame timing

pub mod game_loop;
pub mod input;
pub mod physics;
pub mod timer;
