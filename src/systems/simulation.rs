//! World tick system
//!
//! Advances every entity once per tick on its own thread:
//! - Gravity (or coasting) impulses
//! - Floor clamping
//! - Impacts between overlapping movable entities

use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use rehab_core::{EntityKind, KinematicBody, SharedEntity, Vector2D};

use crate::config::WorldConfig;

/// What happened in one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickResult {
    /// Bodies that were pushed by gravity or kept coasting
    pub moved: usize,
    /// Bodies stopped at the floor
    pub landed: usize,
    /// New impacts resolved
    pub impacts: usize,
}

struct TickState {
    running: AtomicBool,
    stop_requested: AtomicBool,
    ticks: AtomicU64,
}

/// Cloneable handle to a running world tick
#[derive(Clone)]
pub struct TickHandle {
    intake: Sender<SharedEntity>,
    state: Arc<TickState>,
}

impl TickHandle {
    /// Hand a newly spawned entity to the tick loop
    pub fn add_entity(&self, entity: SharedEntity) {
        if self.intake.send(entity).is_err() {
            log::warn!("World tick is gone; new entity will not move");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    pub fn ticks(&self) -> u64 {
        self.state.ticks.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.state.stop_requested.store(true, Ordering::Release);
    }
}

/// Drives entity physics at a fixed tick rate
pub struct SimulationSystem {
    gravity: f64,
    floor_y: f64,
    interval: Duration,
    entities: Vec<SharedEntity>,
    contacts: HashSet<(usize, usize)>,
    intake: Receiver<SharedEntity>,
    handle: TickHandle,
}

impl SimulationSystem {
    /// Create a tick system for `entities`
    pub fn new(config: &WorldConfig, entities: Vec<SharedEntity>) -> Self {
        let tick_rate = config.tick_rate.max(1);
        let (intake_tx, intake_rx) = crossbeam_channel::unbounded();
        Self {
            gravity: config.gravity,
            floor_y: config.floor_y,
            interval: Duration::from_nanos(1_000_000_000 / tick_rate as u64),
            entities,
            contacts: HashSet::new(),
            intake: intake_rx,
            handle: TickHandle {
                intake: intake_tx,
                state: Arc::new(TickState {
                    running: AtomicBool::new(false),
                    stop_requested: AtomicBool::new(false),
                    ticks: AtomicU64::new(0),
                }),
            },
        }
    }

    pub fn handle(&self) -> TickHandle {
        self.handle.clone()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Seconds per tick
    pub fn dt(&self) -> f64 {
        self.interval.as_secs_f64()
    }

    /// Run one tick
    pub fn step(&mut self) -> TickResult {
        self.entities.extend(self.intake.try_iter());

        let dt = self.dt();
        // Velocities are in pixels per tick, so gravity adds g * dt^2 per tick
        let gravity = Vector2D::heading(0.0, self.gravity * dt * dt);
        let mut result = TickResult::default();

        for shared in &self.entities {
            let mut entity = shared.write();
            let (_, sprite_height) = entity.sprite.size();
            let body = &mut entity.body;

            // An impulse on a moving body only lengthens its current heading,
            // so gravity would speed up a sideways slide instead of bending it.
            // Only bodies at rest or already moving with gravity are pulled;
            // the rest coast.
            let (_, dy) = body.velocity().displacement();
            let pulled = body.speed() == 0.0 || dy * self.gravity > 0.0;
            if body.gravity_enabled() && pulled {
                body.apply_impulse(&gravity);
                result.moved += 1;
            } else if body.speed() > 0.0 {
                body.apply_impulse(&Vector2D::ZERO);
                result.moved += 1;
            }

            // Position is the top-left corner, so the bottom edge is y - height
            let rest_y = self.floor_y + sprite_height as f64;
            if body.gravity_enabled() && body.y() < rest_y {
                body.reposition(body.x(), rest_y, false);
                body.set_speed(0.0);
                result.landed += 1;
            }
        }

        result.impacts = self.resolve_impacts();
        self.handle.state.ticks.fetch_add(1, Ordering::Relaxed);
        result
    }

    fn resolve_impacts(&mut self) -> usize {
        struct Snapshot {
            kind: EntityKind,
            bounds: (f64, f64, f64, f64),
            body: KinematicBody,
        }

        let snapshots: Vec<Snapshot> = self
            .entities
            .iter()
            .map(|shared| {
                let entity = shared.read();
                let (w, h) = entity.sprite.size();
                let (x, y) = entity.position();
                Snapshot {
                    kind: entity.kind,
                    bounds: (x, y - h as f64, x + w as f64, y),
                    body: entity.body.clone(),
                }
            })
            .collect();

        let mut touching = HashSet::new();
        let mut impacts = 0;
        for i in 0..snapshots.len() {
            for j in (i + 1)..snapshots.len() {
                let (a, b) = (&snapshots[i], &snapshots[j]);
                if a.kind == EntityKind::Prop || b.kind == EntityKind::Prop {
                    continue;
                }
                if !overlaps(a.bounds, b.bounds) {
                    continue;
                }
                touching.insert((i, j));
                if self.contacts.contains(&(i, j)) {
                    continue;
                }
                if a.body.speed() == 0.0 && b.body.speed() == 0.0 {
                    continue;
                }

                // Each side is resolved against the other's pre-impact state
                let a_ok = strike(&self.entities[i], &a.body, &b.body);
                let b_ok = strike(&self.entities[j], &b.body, &a.body);
                if a_ok && b_ok {
                    impacts += 1;
                }
            }
        }
        self.contacts = touching;
        impacts
    }

    /// Loop [`SimulationSystem::step`] at the tick rate until stopped
    pub fn run(mut self) -> Self {
        let state = Arc::clone(&self.handle.state);
        state.running.store(true, Ordering::Release);
        log::info!(
            "World tick running at {:?} per tick with {} entities",
            self.interval,
            self.entities.len()
        );

        while !state.stop_requested.load(Ordering::Acquire) {
            let tick_start = Instant::now();
            let result = self.step();
            if result.impacts > 0 || result.landed > 0 {
                log::trace!("{:?}", result);
            }
            if let Some(remaining) = self.interval.checked_sub(tick_start.elapsed()) {
                thread::sleep(remaining);
            }
        }

        state.running.store(false, Ordering::Release);
        log::info!("World tick stopped after {} ticks", state.ticks.load(Ordering::Relaxed));
        self
    }

    /// Start [`SimulationSystem::run`] on a thread named `world-tick`
    pub fn spawn(self) -> io::Result<JoinHandle<Self>> {
        thread::Builder::new()
            .name("world-tick".to_string())
            .spawn(move || self.run())
    }
}

fn overlaps(a: (f64, f64, f64, f64), b: (f64, f64, f64, f64)) -> bool {
    a.0 < b.2 && b.0 < a.2 && a.1 < b.3 && b.1 < a.3
}

/// Update one side of an impact; returns false if the physics rejected it
fn strike(shared: &SharedEntity, own: &KinematicBody, other: &KinematicBody) -> bool {
    let mut entity = shared.write();
    if own.speed() > 0.0 {
        return match entity.body.resolve_impact(other) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Impact on '{}' ignored: {}", entity.name, e);
                false
            }
        };
    }

    // A body at rest has no heading of its own; it is pushed along the
    // striker's heading instead
    match rehab_physics::speed_after_impact(0.0, own.mass(), other.speed(), other.mass()) {
        Ok(speed) => {
            let mut push = other.velocity().unit_vector();
            push.multiply(speed);
            entity.body.apply_impulse(&push);
            true
        }
        Err(e) => {
            log::warn!("Impact on '{}' ignored: {}", entity.name, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehab_core::{Entity, SolidSprite};

    fn config() -> WorldConfig {
        WorldConfig {
            tick_rate: 60,
            gravity: -600.0,
            floor_y: 32.0,
        }
    }

    fn entity(name: &str, kind: EntityKind, x: f64, y: f64, gravity: bool) -> SharedEntity {
        Entity::new(
            name,
            kind,
            KinematicBody::at(62.0, x, y).unwrap().with_gravity(gravity),
            Arc::new(SolidSprite::new(32, 48, 0xFFFF_FFFF)),
        )
        .into_shared()
    }

    #[test]
    fn test_gravity_accelerates_downward() {
        let dummy = entity("dummy", EntityKind::Actor, 0.0, 400.0, true);
        let mut sim = SimulationSystem::new(&config(), vec![Arc::clone(&dummy)]);

        sim.step();
        let first_drop = 400.0 - dummy.read().body.y();
        sim.step();
        let second_drop = 400.0 - dummy.read().body.y() - first_drop;

        assert!(first_drop > 0.0);
        assert!(second_drop > first_drop);
        assert_eq!(dummy.read().body.x(), 0.0);
    }

    #[test]
    fn test_lands_on_floor() {
        let dummy = entity("dummy", EntityKind::Actor, 0.0, 81.0, true);
        let mut sim = SimulationSystem::new(&config(), vec![Arc::clone(&dummy)]);

        let mut landed = 0;
        for _ in 0..120 {
            landed += sim.step().landed;
        }
        assert!(landed > 0);

        let entity = dummy.read();
        // Bottom edge sits on the floor top
        assert_eq!(entity.body.y(), 32.0 + 48.0);
        assert_eq!(entity.body.speed(), 0.0);
    }

    #[test]
    fn test_sideways_slide_coasts_at_constant_speed() {
        let dummy = entity("dummy", EntityKind::Actor, 100.0, 80.0, true);
        dummy.write().body.apply_impulse(&Vector2D::heading(6.0, 0.0));
        let mut sim = SimulationSystem::new(&config(), vec![Arc::clone(&dummy)]);

        for _ in 0..10 {
            sim.step();
        }
        let dummy = dummy.read();
        assert!((dummy.body.speed() - 6.0).abs() < 1e-9);
        assert!((dummy.body.x() - 166.0).abs() < 1e-9);
        assert_eq!(dummy.body.y(), 80.0);
    }

    #[test]
    fn test_props_do_not_fall() {
        let floor = entity("floor", EntityKind::Prop, 0.0, 32.0, false);
        let mut sim = SimulationSystem::new(&config(), vec![Arc::clone(&floor)]);
        let result = sim.step();
        assert_eq!(result.moved, 0);
        assert_eq!(floor.read().position(), (0.0, 32.0));
    }

    #[test]
    fn test_projectile_coasts_and_hands_speed_to_dummy() {
        let dummy = entity("dummy", EntityKind::Actor, 100.0, 200.0, false);
        let shot = entity("shot", EntityKind::Projectile, 40.0, 200.0, false);
        shot.write()
            .body
            .apply_impulse(&Vector2D::heading(10.0, 0.0));

        let mut sim = SimulationSystem::new(&config(), vec![Arc::clone(&dummy)]);
        sim.handle().add_entity(Arc::clone(&shot));

        let mut impacts = 0;
        for _ in 0..10 {
            impacts += sim.step().impacts;
        }
        assert_eq!(sim.entity_count(), 2);
        assert_eq!(impacts, 1);

        // Equal masses: the shot stops and the dummy takes its speed
        assert_eq!(shot.read().body.speed(), 0.0);
        let dummy = dummy.read();
        assert!((dummy.body.speed() - 10.0).abs() < 1e-9);
        assert!(dummy.body.x() > 100.0);
        assert_eq!(dummy.body.y(), 200.0);
    }

    #[test]
    fn test_resting_overlap_is_not_an_impact() {
        let a = entity("a", EntityKind::Actor, 0.0, 200.0, false);
        let b = entity("b", EntityKind::Actor, 10.0, 200.0, false);
        let mut sim = SimulationSystem::new(&config(), vec![a, b]);
        assert_eq!(sim.step().impacts, 0);
    }

    #[test]
    fn test_run_until_stopped() {
        let sim = SimulationSystem::new(&config(), Vec::new());
        let handle = sim.handle();
        let thread = sim.spawn().unwrap();
        while handle.ticks() < 2 {
            thread::yield_now();
        }
        handle.stop();
        let sim = thread.join().unwrap();
        assert!(!handle.is_running());
        assert_eq!(sim.entity_count(), 0);
    }
}
