//! Simulation core
//!
//! Pure and deterministic given its inputs:
//! - Time enters only as the `elapsed_ms` passed to `step`
//! - Randomness comes only from the spawner's injected RNG
//! - Bodies are always iterated in insertion order
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod integrate;
pub mod simulation;
pub mod spawn;
pub mod world;

pub use body::{Body, BodyHandle, Color, Material};
pub use boundary::{clamp_positions, resolve_boundaries};
pub use collision::{CollisionStats, Contact, Response, circle_contact, resolve_collisions, resolve_pair};
pub use integrate::integrate;
pub use simulation::{Command, DEFAULT_SEED, Simulation, StepStats};
pub use spawn::{SpawnParams, Spawner};
pub use world::World;
