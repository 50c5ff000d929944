//! Field mode: collect torus power-ups in a physics-driven 3D field
//!
//! The player is a rigid body nudged sideways by key presses. Power-ups are
//! driven toward the camera by the physics world (gravity still applies) and
//! respawn somewhere random up the field once they fly past the camera or
//! get collected.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::physics::{BodyDesc, BodyHandle, BodyShape, PhysicsWorld};
use crate::consts::*;

/// Number of power-ups kept in the field
pub const POWER_UP_COUNT: usize = 5;
/// Speed at which power-ups are driven toward the camera (units/s)
pub const POWER_UP_SPEED: f32 = 9.0;
/// Power-ups past this Z have left the view
pub const CAMERA_Z: f32 = 11.0;
/// Center distance for a pickup
pub const COLLECT_DISTANCE: f32 = 1.0;
/// Lateral velocity change per key press
pub const NUDGE_IMPULSE: f32 = 3.0;
/// Respawn band ahead of the player
pub const SPAWN_Z_MIN: f32 = -60.0;
pub const SPAWN_Z_MAX: f32 = -30.0;
pub const SPAWN_HEIGHT: f32 = 3.0;
/// Torus bounding radius
pub const POWER_UP_RADIUS: f32 = 0.5;

/// Lateral nudge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Left,
    Right,
}

/// Input for a single field tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInput {
    pub nudge: Option<Nudge>,
    /// Put the player back at the origin
    pub reset: bool,
}

impl FieldInput {
    /// Map a `KeyboardEvent.key` value to an input, if it means anything
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Self {
                nudge: Some(Nudge::Left),
                reset: false,
            }),
            "ArrowRight" | "d" | "D" => Some(Self {
                nudge: Some(Nudge::Right),
                reset: false,
            }),
            "r" | "R" => Some(Self {
                nudge: None,
                reset: true,
            }),
            _ => None,
        }
    }

    /// Fold another key press into this frame's input
    pub fn merge(&mut self, other: FieldInput) {
        if other.nudge.is_some() {
            self.nudge = other.nudge;
        }
        self.reset |= other.reset;
    }
}

/// A torus power-up: physics body plus the transform copied from it
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub body: BodyHandle,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    PowerUpCollected { power_up_id: u32, score: u64 },
    PowerUpRecycled { power_up_id: u32 },
    PlayerReset,
}

/// Complete field game state
pub struct FieldState<W: PhysicsWorld> {
    pub world: W,
    pub player_body: BodyHandle,
    pub player_position: Vec3,
    pub power_ups: Vec<PowerUp>,
    pub score: u64,
    pub time_ticks: u64,
    rng: Pcg32,
    events: Vec<FieldEvent>,
    next_id: u32,
}

fn player_home() -> Vec3 {
    Vec3::new(0.0, PLAYER_Y, PLAYER_Z)
}

impl<W: PhysicsWorld> FieldState<W> {
    pub fn new(mut world: W, seed: u64) -> Self {
        let player_body = world.add_body(BodyDesc {
            position: player_home(),
            shape: BodyShape::Cuboid {
                half_extents: Vec3::splat(CUBE_SIZE / 2.0),
            },
            restitution: 0.0,
            friction: 0.3,
            spin: Vec3::ZERO,
            lock_rotations: true,
        });

        let mut state = Self {
            world,
            player_body,
            player_position: player_home(),
            power_ups: Vec::with_capacity(POWER_UP_COUNT),
            score: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };

        for _ in 0..POWER_UP_COUNT {
            let position = state.random_spawn();
            let body = state.world.add_body(BodyDesc {
                position,
                shape: BodyShape::Ball {
                    radius: POWER_UP_RADIUS,
                },
                restitution: 0.5,
                // Frictionless so the spin survives landing
                friction: 0.0,
                spin: Vec3::new(0.0, 2.0, 0.0),
                lock_rotations: false,
            });
            let id = state.next_id;
            state.next_id += 1;
            state.power_ups.push(PowerUp {
                id,
                body,
                position,
                rotation: Quat::IDENTITY,
            });
        }

        state
    }

    fn random_spawn(&mut self) -> Vec3 {
        Vec3::new(
            self.rng.random_range(-LANE_HALF_WIDTH..=LANE_HALF_WIDTH),
            SPAWN_HEIGHT,
            self.rng.random_range(SPAWN_Z_MIN..=SPAWN_Z_MAX),
        )
    }

    /// Move a power-up to a fresh random spot up the field
    fn recycle(&mut self, index: usize) {
        let position = self.random_spawn();
        let power_up = &mut self.power_ups[index];
        self.world.reset_body(power_up.body, position);
        power_up.position = position;
        power_up.rotation = Quat::IDENTITY;
    }

    pub fn drain_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Advance the field by one frame
pub fn tick_field<W: PhysicsWorld>(state: &mut FieldState<W>, input: &FieldInput, dt: f32) {
    state.time_ticks += 1;

    if input.reset {
        state.world.reset_body(state.player_body, player_home());
        state.events.push(FieldEvent::PlayerReset);
        log::info!("Player reset to origin");
    }
    if let Some(nudge) = input.nudge {
        let dx = match nudge {
            Nudge::Left => -NUDGE_IMPULSE,
            Nudge::Right => NUDGE_IMPULSE,
        };
        state
            .world
            .apply_impulse(state.player_body, Vec3::new(dx, 0.0, 0.0));
    }

    // Drive power-ups toward the camera, leave the other axes to the world
    for power_up in &state.power_ups {
        if let Some(mut v) = state.world.linear_velocity(power_up.body) {
            v.z = POWER_UP_SPEED;
            state.world.set_linear_velocity(power_up.body, v);
        }
    }

    state.world.step(dt);

    // Copy transforms back
    if let Some(pos) = state.world.translation(state.player_body) {
        state.player_position = pos;
    }
    for power_up in &mut state.power_ups {
        if let Some(pos) = state.world.translation(power_up.body) {
            power_up.position = pos;
        }
        if let Some(rot) = state.world.rotation(power_up.body) {
            power_up.rotation = rot;
        }
    }

    for index in 0..state.power_ups.len() {
        let power_up = &state.power_ups[index];
        let id = power_up.id;
        if power_up.position.distance(state.player_position) < COLLECT_DISTANCE {
            state.score += 1;
            log::debug!("Collected power-up {}, score {}", id, state.score);
            state.events.push(FieldEvent::PowerUpCollected {
                power_up_id: id,
                score: state.score,
            });
            state.recycle(index);
        } else if power_up.position.z > CAMERA_Z {
            state.events.push(FieldEvent::PowerUpRecycled { power_up_id: id });
            state.recycle(index);
        }
    }
}
