//! Per-frame simulation tick
//!
//! One call per rendered frame. Entity movement is per tick; the projectile
//! timer runs on the real elapsed time passed in as `dt`.

use super::collision::{player_overlaps, projectile_hits};
use super::state::{GameEvent, GameState, ObstacleKind};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired lateral position (from pointer/touch), unclamped
    pub target_x: Option<f32>,
}

/// Advance the game state by one frame. `dt` is the real elapsed time in seconds.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if let Some(x) = input.target_x {
        state.player.steer(x);
    }

    advance_obstacles(state);

    let fired = state.spawn_timer.advance(f64::from(dt) * 1000.0);
    for _ in 0..fired {
        state.spawn_projectile();
    }

    advance_projectiles(state);
}

/// Move obstacles toward the player, resolve player contact, recycle passed ones
fn advance_obstacles(state: &mut GameState) {
    let step = state.params.obstacle_step;
    let policy = state.params.collision;
    let player = &mut state.player;
    let player_z = player.position.z;

    let mut collected: Vec<(u32, u32)> = Vec::new();
    let mut walls_taken: Vec<u32> = Vec::new();

    for obstacle in &mut state.obstacles {
        obstacle.position.z += step;

        let touching = player_overlaps(
            policy,
            player.position,
            player.scale,
            obstacle.position,
            obstacle.extents(),
        );

        if touching {
            match obstacle.value() {
                Some(value) => {
                    collected.push((obstacle.id, value));
                    obstacle.recycle(player_z);
                }
                None => {
                    player.grow(WALL_GROWTH);
                    walls_taken.push(obstacle.id);
                    log::debug!("Wall {} taken, player scale {:.3}", obstacle.id, player.scale);
                }
            }
        } else if obstacle.position.z > player_z + PASS_MARGIN {
            obstacle.recycle(player_z);
        }
    }

    if !walls_taken.is_empty() {
        state.obstacles.retain(|o| !walls_taken.contains(&o.id));
        let scale = state.player.scale;
        for wall_id in walls_taken {
            state.push_event(GameEvent::WallCollected { wall_id, scale });
        }
    }

    for (obstacle_id, value) in collected {
        log::debug!("Player hit obstacle {} worth {}", obstacle_id, value);
        state.push_event(GameEvent::ObstacleCollected { obstacle_id, value });
        state.add_score(value);
    }
}

/// Move projectiles, bump the values of obstacles they strike, drop those
/// that struck anything, cull the rest
fn advance_projectiles(state: &mut GameState) {
    let cull_z = state.player.position.z - PROJECTILE_RANGE;

    let mut events = Vec::new();
    let mut keep = Vec::with_capacity(state.projectiles.len());

    for projectile in &mut state.projectiles {
        projectile.advance();

        let mut struck = false;
        for obstacle in &mut state.obstacles {
            if !projectile_hits(projectile.position, obstacle.position) {
                continue;
            }
            struck = true;
            match &mut obstacle.kind {
                ObstacleKind::Standard { label, .. } => {
                    let value = label.increment();
                    log::debug!(
                        "Projectile {} hit obstacle {}, value now {}",
                        projectile.id,
                        obstacle.id,
                        value
                    );
                    events.push(GameEvent::ProjectileHit {
                        projectile_id: projectile.id,
                        obstacle_id: obstacle.id,
                        value,
                    });
                }
                // Walls stop projectiles but carry no value
                ObstacleKind::Wall => events.push(GameEvent::ProjectileBlocked {
                    projectile_id: projectile.id,
                    wall_id: obstacle.id,
                }),
            }
        }

        if struck {
            keep.push(false);
        } else if projectile.position.z < cull_z {
            events.push(GameEvent::ProjectileExpired {
                projectile_id: projectile.id,
            });
            keep.push(false);
        } else {
            keep.push(true);
        }
    }

    let mut keep = keep.into_iter();
    state.projectiles.retain(|_| keep.next().unwrap_or(true));

    for event in events {
        state.push_event(event);
    }
}
