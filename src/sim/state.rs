//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; there are no
//! module-level globals. Obstacles only exist once the typeface has loaded.

use std::sync::Arc;

use glam::Vec3;
use serde::Serialize;

use super::collision::{CUBE_EXTENTS, WALL_EXTENTS};
use super::label::ValueLabel;
use super::timer::IntervalTimer;
use crate::assets::{AssetError, AssetState, Typeface};
use crate::clamp_to_lane;
use crate::consts::*;
use crate::settings::RulesetParams;

/// The player's cube
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    /// Uniform scale, grown by walls
    pub scale: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, PLAYER_Y, PLAYER_Z),
            scale: 1.0,
        }
    }
}

impl Player {
    /// Move toward a desired lateral position, clamped to the lane
    pub fn steer(&mut self, x: f32) {
        self.position.x = clamp_to_lane(x);
    }

    pub fn grow(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

/// Obstacle color family (preset values get their own color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tint {
    Red,
    Gold,
    Violet,
}

/// What an obstacle is
#[derive(Debug, Clone)]
pub enum ObstacleKind {
    /// Scored on contact, recycled ahead
    Standard { label: ValueLabel, tint: Tint },
    /// One-shot growth power-up, removed on contact
    Wall,
}

/// An obstacle entity on the conveyor
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub position: Vec3,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Local size for collision tests
    pub fn extents(&self) -> Vec3 {
        match self.kind {
            ObstacleKind::Standard { .. } => CUBE_EXTENTS,
            ObstacleKind::Wall => WALL_EXTENTS,
        }
    }

    /// Numeric value, if this obstacle carries one
    pub fn value(&self) -> Option<u32> {
        match &self.kind {
            ObstacleKind::Standard { label, .. } => Some(label.value()),
            ObstacleKind::Wall => None,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, ObstacleKind::Wall)
    }

    /// Send the obstacle back up the conveyor
    pub fn recycle(&mut self, player_z: f32) {
        self.position.z = player_z - RECYCLE_DISTANCE;
    }
}

/// Blueprint for an obstacle, built before the typeface is available
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleSeed {
    Standard { position: Vec3, value: u32, tint: Tint },
    Wall { position: Vec3 },
}

impl ObstacleSeed {
    pub fn position(&self) -> Vec3 {
        match self {
            ObstacleSeed::Standard { position, .. } | ObstacleSeed::Wall { position } => *position,
        }
    }
}

/// A player-fired projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
    /// Per-tick displacement
    pub velocity: Vec3,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }
}

/// Things that happened during a tick, for HUD, audio and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Obstacles were built from the loaded typeface
    TrackReady { obstacles: usize },
    /// The typeface failed to load; the track stays empty
    TrackFailed { reason: String },
    /// Score went up; the display needs refreshing
    ScoreChanged { score: u64 },
    /// Player ran into a standard obstacle
    ObstacleCollected { obstacle_id: u32, value: u32 },
    /// Player touched a wall and grew
    WallCollected { wall_id: u32, scale: f32 },
    ProjectileSpawned { projectile_id: u32 },
    /// Projectile struck an obstacle whose value is now `value`
    ProjectileHit {
        projectile_id: u32,
        obstacle_id: u32,
        value: u32,
    },
    /// Projectile ran into a wall and was destroyed; the wall is unchanged
    ProjectileBlocked { projectile_id: u32, wall_id: u32 },
    /// Projectile flew out of range
    ProjectileExpired { projectile_id: u32 },
}

/// Complete lane game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub params: RulesetParams,
    pub player: Player,
    /// Active obstacles, in creation order
    pub obstacles: Vec<Obstacle>,
    /// Active projectiles, in spawn order
    pub projectiles: Vec<Projectile>,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub assets: AssetState,
    pub spawn_timer: IntervalTimer,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(params: RulesetParams) -> Self {
        Self {
            params,
            player: Player::default(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            time_ticks: 0,
            assets: AssetState::Pending,
            spawn_timer: IntervalTimer::new(params.projectile_interval_ms),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Completion of the typeface load. Builds the obstacle layout on success;
    /// on failure the track stays empty and the game keeps running. Only the
    /// first call has any effect.
    pub fn on_font_loaded(&mut self, result: Result<Typeface, AssetError>) {
        if self.assets.is_settled() {
            log::warn!("Typeface already settled, ignoring duplicate load");
            return;
        }

        match result {
            Ok(font) => {
                let font = Arc::new(font);
                let layout = self.params.ruleset.layout();
                for seed in layout {
                    let obstacle = self.build_obstacle(seed, &font);
                    self.obstacles.push(obstacle);
                }
                self.assets = AssetState::Ready;
                log::info!(
                    "Track ready: {} obstacles ({})",
                    self.obstacles.len(),
                    self.params.ruleset.as_str()
                );
                let obstacles = self.obstacles.len();
                self.push_event(GameEvent::TrackReady { obstacles });
            }
            Err(e) => {
                log::error!("Typeface failed to load, track will be empty: {}", e);
                let reason = e.to_string();
                self.assets = AssetState::Failed(reason.clone());
                self.push_event(GameEvent::TrackFailed { reason });
            }
        }
    }

    fn build_obstacle(&mut self, seed: ObstacleSeed, font: &Arc<Typeface>) -> Obstacle {
        let id = self.next_entity_id();
        match seed {
            ObstacleSeed::Standard {
                position,
                value,
                tint,
            } => Obstacle {
                id,
                position,
                kind: ObstacleKind::Standard {
                    label: ValueLabel::new(value, Arc::clone(font)),
                    tint,
                },
            },
            ObstacleSeed::Wall { position } => Obstacle {
                id,
                position,
                kind: ObstacleKind::Wall,
            },
        }
    }

    /// Fire a projectile from the player's current position
    pub fn spawn_projectile(&mut self) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            position: self.player.position,
            velocity: Vec3::new(0.0, 0.0, -PROJECTILE_SPEED),
        });
        self.push_event(GameEvent::ProjectileSpawned { projectile_id: id });
        id
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn obstacle_mut(&mut self, id: u32) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }

    /// Overwrite a standard obstacle's value. Returns false for walls and for
    /// obstacles that are no longer on the track.
    pub fn set_obstacle_value(&mut self, id: u32, value: u32) -> bool {
        match self.obstacle_mut(id).map(|o| &mut o.kind) {
            Some(ObstacleKind::Standard { label, .. }) => {
                label.set_value(value);
                true
            }
            Some(ObstacleKind::Wall) | None => false,
        }
    }

    /// Add points; the score never goes down
    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points as u64);
        let score = self.score;
        self.push_event(GameEvent::ScoreChanged { score });
    }
}
