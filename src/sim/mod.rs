//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One tick per rendered frame, movement in per-tick steps
//! - Projectile cadence from real elapsed time
//! - Stable iteration order (container order)
//! - Seeded RNG only

pub mod aabb;
pub mod collision;
pub mod field;
pub mod label;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;

pub use aabb::Aabb;
pub use collision::{CollisionPolicy, player_overlaps, projectile_hits};
pub use field::{FieldEvent, FieldInput, FieldState, Nudge, PowerUp, tick_field};
pub use label::{TextMesh, ValueLabel};
pub use physics::{BodyDesc, BodyHandle, BodyShape, PhysicsWorld, RapierWorld};
pub use snapshot::{FieldSnapshot, FrameSnapshot, build_field_snapshot, build_snapshot};
pub use state::{
    GameEvent, GameState, Obstacle, ObstacleKind, ObstacleSeed, Player, Projectile, Tint,
};
pub use tick::{TickInput, tick};
pub use timer::IntervalTimer;
