use anyhow::Result;
use log::{debug, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod engine;
mod game;

use engine::game_loop::GameLoop;
use engine::input::InputManager;
use game::{Scene, SceneConfig};

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG overrides the Info default)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Mario controller...");

    let config = SceneConfig::default();
    let mut scene = Scene::with_defaults(config)?;
    let mut input = InputManager::default();
    let mut game_loop = GameLoop::new();
    let mut last_state = scene.state();
    let mut last_title = String::new();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Mario controller")
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.width as f64 * 2.0,
            config.height as f64 * 2.0,
        ))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");
    info!("Arrows or WASD to move, Up/W/Space to jump, Down/S to crouch, P to pause, Escape to quit");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                // Keys released while unfocused never reach us
                input.reset();
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                if input.menu_requested() {
                    info!("Escape pressed, shutting down...");
                    elwt.exit();
                    return;
                }

                if input.pause_requested() {
                    game_loop.toggle_pause();
                }

                // Held keys do not change between the steps of one frame
                let snapshot = input.snapshot();
                let steps = game_loop.begin_frame();
                for _ in 0..steps {
                    scene.update(game_loop.fixed_step(), &snapshot);
                }
                input.update();

                let state = scene.state();
                if state != last_state {
                    let position = scene.position();
                    let velocity = scene.velocity();
                    info!(
                        "{} -> {} at ({:.1}, {:.1}), velocity ({:.1}, {:.1}), playing '{}'",
                        scene.controller().previous_state(),
                        state,
                        position.x,
                        position.y,
                        velocity.x,
                        velocity.y,
                        scene.animation().current_animation()
                    );
                    last_state = state;
                }

                // No renderer: the title shows the pose that would be drawn
                let animation = scene.animation();
                let title = format!(
                    "Mario controller - {} [frame {}{}]{}",
                    state,
                    animation.sheet_frame().unwrap_or(0),
                    if animation.is_flipped_horizontal() { ", mirrored" } else { "" },
                    if game_loop.is_paused() { " (paused)" } else { "" }
                );
                if title != last_title {
                    window.set_title(&title);
                    last_title = title;
                }

                if game_loop.frame_count() % 300 == 0 {
                    debug!(
                        "{:.1} fps, {} frames, {} steps, {} for {:.2}s",
                        game_loop.fps(),
                        game_loop.frame_count(),
                        game_loop.step_count(),
                        state,
                        scene.controller().state_time()
                    );
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
