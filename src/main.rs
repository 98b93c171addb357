//! rehab2d - headless dual-loop 2D simulation
//!
//! Loads an arena, then runs the world tick and the frame pump on separate
//! threads until `debug.run_for_secs` elapses (or forever when it is 0).

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use rehab_core::{Entity, EntityKind, KinematicBody, Scene, SolidSprite, Vector2D, World};
use rehab_render::{FramePump, FramePumpSlot};

use rehab2d::config::AppConfig;
use rehab2d::systems::{LogPresenter, SimulationSystem};

/// Build the shot fired at the dummy once both loops are running
fn make_shot(floor_y: f64) -> Result<Entity, Box<dyn Error>> {
    let mut body = KinematicBody::at(62.0, 200.0, floor_y + 24.0)?.with_gravity(false);
    body.apply_impulse(&Vector2D::heading(6.0, 0.0));
    Ok(Entity::new(
        "shot",
        EntityKind::Projectile,
        body,
        Arc::new(SolidSprite::new(12, 12, 0xFFF0_D040)),
    ))
}

fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let scene = Scene::load(&config.scene.path)?;
    if (scene.width, scene.height) != (config.window.width, config.window.height) {
        log::warn!(
            "Arena '{}' is {}x{} but the surface is {}x{}",
            scene.name,
            scene.width,
            scene.height,
            config.window.width,
            config.window.height
        );
    }

    let mut world = World::new();
    scene.instantiate(&mut world)?;

    let presenter = LogPresenter::new(
        config.window.title.clone(),
        config.render.clear_color,
        config.render.fps as u64,
    );
    let mut slot = FramePumpSlot::new();
    slot.install(FramePump::with_config(config.pump_config(), presenter)?)?;
    slot.pump_mut()?.reload_layers(&world);
    let frames = slot.get()?;

    let simulation = SimulationSystem::new(&config.world, world.handles());
    let ticks = simulation.handle();

    let pump_thread = slot.start()?;
    let tick_thread = simulation.spawn()?;

    // Spawned after layers were loaded, so it reaches the pump via intake
    let (_, shot) = world.spawn(make_shot(config.world.floor_y)?);
    frames.add_drawable(shot.clone());
    ticks.add_entity(shot);

    match config.debug.run_for() {
        Some(duration) => {
            thread::sleep(duration);
            log::info!("Run time of {:?} elapsed, stopping", duration);
            ticks.stop();
            frames.stop();
        }
        None => log::info!("Running until the process is killed"),
    }

    match tick_thread.join() {
        Ok(simulation) => log::info!(
            "World tick finished with {} entities",
            simulation.entity_count()
        ),
        Err(_) => log::error!("World tick thread panicked"),
    }
    match pump_thread.join() {
        Ok(presenter) => log::info!(
            "Presented {} frames; last frame had {} drawn pixels",
            presenter.frames(),
            presenter.drawn_pixels()
        ),
        Err(_) => log::error!("Frame pump thread panicked"),
    }

    if let Some((_, dummy)) = world.get_by_name("dummy") {
        let dummy = dummy.read();
        log::info!(
            "Dummy ended at ({:.1}, {:.1}) moving at {:.2}",
            dummy.body.x(),
            dummy.body.y(),
            dummy.body.speed()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
