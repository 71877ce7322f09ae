//! Frame-driven simulation loop
//!
//! One `step` per animation frame: integrate, walls, pairwise collisions,
//! in that order and never interleaved per body. Input arrives as commands
//! that are applied between frames, never mid-step.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::BodyHandle;
use super::boundary::{clamp_positions, resolve_boundaries};
use super::collision::resolve_collisions;
use super::integrate::integrate;
use super::spawn::{SpawnParams, Spawner};
use super::world::World;
use crate::dt_factor;
use crate::error::{ConfigError, SpawnError};
use crate::settings::SimConfig;

/// Default seed when the config doesn't name one
pub const DEFAULT_SEED: u64 = 0x5eed_ba11;

/// An input event from outside the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Tap/click at a viewport point
    Spawn { x: f64, y: f64 },
    SetGravity(bool),
    ToggleGravity,
    Clear,
    Start,
    Stop,
}

/// What one `step` did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Time scale actually used (0 when stopped)
    pub dt_factor: f64,
    pub pair_checks: usize,
    pub contacts: usize,
    /// Contacts that were already separating and got no impulse
    pub separating: usize,
    /// Contacts with coincident centers, resolved with the fallback normal
    pub degenerate: usize,
    /// Commands applied at the start of this step
    pub commands_applied: usize,
}

/// World plus spawner plus the run/stop switch
#[derive(Debug, Clone)]
pub struct Simulation<R = Pcg32> {
    world: World,
    spawner: Spawner<R>,
    running: bool,
    pending: VecDeque<Command>,
    nominal_frame_ms: f64,
    max_dt_factor: f64,
    frame: u64,
}

impl Simulation<Pcg32> {
    /// Build from a config, seeding the spawner from `config.seed`
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Build from a config with a caller-supplied random source
    pub fn with_rng(config: &SimConfig, rng: R) -> Result<Self, ConfigError> {
        let world = World::from_config(config)?;
        log::info!(
            "Simulation created: {}x{}, cap {}, gravity {}",
            config.width,
            config.height,
            config.max_bodies,
            if config.gravity_enabled { "on" } else { "off" }
        );
        Ok(Self {
            world,
            spawner: Spawner::new(rng, SpawnParams::from(config)),
            running: true,
            pending: VecDeque::new(),
            nominal_frame_ms: config.nominal_frame_ms,
            max_dt_factor: config.max_dt_factor,
            frame: 0,
        })
    }

    /// Advance one frame of `elapsed_ms` wall-clock time.
    ///
    /// Pending commands are applied first. When stopped, nothing else happens.
    pub fn step(&mut self, elapsed_ms: f64) -> StepStats {
        let mut stats = StepStats {
            commands_applied: self.apply_pending(),
            ..Default::default()
        };

        if !self.running {
            return stats;
        }

        let dt = dt_factor(elapsed_ms, self.nominal_frame_ms, self.max_dt_factor);
        stats.dt_factor = dt;

        integrate(&mut self.world, dt);
        resolve_boundaries(&mut self.world);
        let collisions = resolve_collisions(&mut self.world);
        // Collision correction can push a body back through a wall
        clamp_positions(&mut self.world);

        stats.pair_checks = collisions.pair_checks;
        stats.contacts = collisions.contacts;
        stats.separating = collisions.separating;
        stats.degenerate = collisions.degenerate;
        self.frame += 1;

        log::trace!(
            "frame {}: dt={:.3} bodies={} pairs={} contacts={} degenerate={}",
            self.frame,
            dt,
            self.world.body_count(),
            stats.pair_checks,
            stats.contacts,
            stats.degenerate
        );

        stats
    }

    /// Queue a command for the next frame boundary
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(command) = self.pending.pop_front() {
            if let Err(e) = self.apply(command) {
                log::debug!("Dropped queued {command:?}: {e}");
            }
            applied += 1;
        }
        applied
    }

    /// Apply a command now. Only call between frames.
    pub fn apply(&mut self, command: Command) -> Result<(), SpawnError> {
        match command {
            Command::Spawn { x, y } => self.spawn_at(x, y).map(|_| ()),
            Command::SetGravity(enabled) => {
                self.set_gravity_enabled(enabled);
                Ok(())
            }
            Command::ToggleGravity => {
                self.toggle_gravity();
                Ok(())
            }
            Command::Clear => {
                self.clear();
                Ok(())
            }
            Command::Start => {
                self.start();
                Ok(())
            }
            Command::Stop => {
                self.stop();
                Ok(())
            }
        }
    }

    pub fn spawn_at(&mut self, x: f64, y: f64) -> Result<BodyHandle, SpawnError> {
        self.spawner.spawn_at(&mut self.world, x, y)
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.world.set_gravity_enabled(enabled);
        log::info!("Gravity {}", if enabled { "on" } else { "off" });
    }

    pub fn toggle_gravity(&mut self) -> bool {
        let enabled = self.world.toggle_gravity();
        log::info!("Gravity {}", if enabled { "on" } else { "off" });
        enabled
    }

    pub fn clear(&mut self) {
        let removed = self.world.body_count();
        self.world.clear();
        log::info!("Cleared {removed} bodies");
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Simulation started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("Simulation stopped");
        }
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for embedders that place bodies themselves
    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    /// Frames advanced so far (stopped frames don't count)
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::consts::NOMINAL_FRAME_MS;
    use crate::sim::{Body, Color};

    fn small_sim() -> Simulation {
        let config = SimConfig {
            seed: Some(12345),
            ..SimConfig::with_bounds(100.0, 100.0)
        };
        Simulation::from_config(&config).unwrap()
    }

    #[test]
    fn test_falls_and_rebounds_off_floor() {
        let mut sim = small_sim();
        sim.world_mut()
            .insert(Body::new(DVec2::new(50.0, 10.0), DVec2::ZERO, 10.0, Color::from_hue(0.0)))
            .unwrap();

        let mut hit = false;
        for _ in 0..200 {
            let before = sim.world().bodies()[0].clone();
            // Velocity at contact: gravity then damping, dt_factor = 1
            let contact_vy = (before.vel.y + 0.5) * 0.99;
            let unclamped_y = before.pos.y + contact_vy;

            sim.step(NOMINAL_FRAME_MS);
            let after = &sim.world().bodies()[0];

            if unclamped_y > 90.0 {
                assert_eq!(after.pos.y, 90.0);
                assert_eq!(after.vel.y, -contact_vy * 0.8);
                assert!(after.vel.y < 0.0);
                hit = true;
                break;
            }
            assert_eq!(after.vel.y, contact_vy);
        }
        assert!(hit, "body never reached the floor");
    }

    #[test]
    fn test_gravity_off_only_damps() {
        let mut sim = small_sim();
        sim.set_gravity_enabled(false);
        sim.world_mut()
            .insert(Body::new(DVec2::new(50.0, 50.0), DVec2::new(0.0, 1.0), 10.0, Color::from_hue(0.0)))
            .unwrap();
        sim.step(NOMINAL_FRAME_MS);
        assert_eq!(sim.world().bodies()[0].vel.y, 0.99);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut sim = small_sim();
        let stats = sim.step(5_000.0);
        assert_eq!(stats.dt_factor, 2.0);
    }

    #[test]
    fn test_queued_commands_apply_at_frame_boundary() {
        let mut sim = small_sim();
        sim.enqueue(Command::Spawn { x: 50.0, y: 50.0 });
        sim.enqueue(Command::ToggleGravity);
        assert_eq!(sim.body_count(), 0);
        assert_eq!(sim.pending_commands(), 2);

        let stats = sim.step(NOMINAL_FRAME_MS);
        assert_eq!(stats.commands_applied, 2);
        assert_eq!(sim.body_count(), 1);
        assert!(!sim.world().gravity_enabled());
        assert_eq!(sim.pending_commands(), 0);
    }

    #[test]
    fn test_queued_spawns_past_cap_are_dropped() {
        let config = SimConfig {
            max_bodies: 3,
            ..SimConfig::with_bounds(200.0, 200.0)
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        for _ in 0..5 {
            sim.enqueue(Command::Spawn { x: 100.0, y: 100.0 });
        }
        let stats = sim.step(NOMINAL_FRAME_MS);
        assert_eq!(stats.commands_applied, 5);
        assert_eq!(sim.body_count(), 3);
    }

    #[test]
    fn test_stop_freezes_world() {
        let mut sim = small_sim();
        sim.spawn_at(50.0, 50.0).unwrap();
        sim.apply(Command::Stop).unwrap();
        let before = sim.world().bodies().to_vec();

        let stats = sim.step(NOMINAL_FRAME_MS);
        assert_eq!(stats.dt_factor, 0.0);
        assert_eq!(sim.world().bodies(), before.as_slice());
        assert_eq!(sim.frame(), 0);

        sim.enqueue(Command::Start);
        sim.step(NOMINAL_FRAME_MS);
        assert!(sim.is_running());
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_clear_empties_world() {
        let mut sim = small_sim();
        sim.spawn_at(30.0, 30.0).unwrap();
        sim.spawn_at(70.0, 70.0).unwrap();
        sim.apply(Command::Clear).unwrap();
        assert_eq!(sim.body_count(), 0);
    }

    #[test]
    fn test_full_pit_reports_all_pairs_and_stays_contained() {
        let mut sim = Simulation::from_config(&SimConfig {
            seed: Some(7),
            ..Default::default()
        })
        .unwrap();
        for i in 0..50 {
            sim.spawn_at(30.0 + (i % 10) as f64 * 55.0, 30.0 + (i / 10) as f64 * 70.0)
                .unwrap();
        }
        assert!(sim.spawn_at(300.0, 200.0).is_err());

        for _ in 0..300 {
            let stats = sim.step(NOMINAL_FRAME_MS);
            assert_eq!(stats.pair_checks, 50 * 49 / 2);
            assert!(sim.world().contains_all(0.0));
        }
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let config = SimConfig {
            seed: Some(99999),
            ..Default::default()
        };
        let mut a = Simulation::from_config(&config).unwrap();
        let mut b = Simulation::from_config(&config).unwrap();
        for i in 0..20 {
            let (x, y) = (100.0 + i as f64 * 20.0, 100.0);
            a.spawn_at(x, y).unwrap();
            b.spawn_at(x, y).unwrap();
        }
        for frame in 0..120 {
            let elapsed = 10.0 + (frame % 7) as f64 * 3.0;
            a.step(elapsed);
            b.step(elapsed);
        }
        assert_eq!(a.world().bodies(), b.world().bodies());
    }
}
