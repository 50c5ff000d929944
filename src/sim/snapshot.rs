//! Read-only frame views handed to the renderer
//!
//! The renderer owns meshes, materials and text geometry. It receives one of
//! these per frame and reconciles its scene graph against it by entity id.

use glam::{Quat, Vec3};
use serde::Serialize;

use super::field::FieldState;
use super::label::TextMesh;
use super::physics::PhysicsWorld;
use super::state::{GameState, ObstacleKind, Tint};
use crate::consts::PROJECTILE_RADIUS;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObstacleView {
    Standard {
        id: u32,
        position: Vec3,
        /// Collision size, what the renderer should draw
        size: Vec3,
        value: u32,
        tint: Tint,
        /// Renderer rebuilds text geometry when this changes
        label_revision: u32,
        front: TextMesh,
        top: TextMesh,
    },
    Wall {
        id: u32,
        position: Vec3,
        size: Vec3,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub position: Vec3,
    pub radius: f32,
}

/// Everything needed to draw one lane frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub score: u64,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub projectiles: Vec<ProjectileView>,
}

/// Build a snapshot of the lane game
pub fn build_snapshot(state: &GameState) -> FrameSnapshot {
    let obstacles = state
        .obstacles
        .iter()
        .map(|o| match &o.kind {
            ObstacleKind::Standard { label, tint } => ObstacleView::Standard {
                id: o.id,
                position: o.position,
                size: o.extents(),
                value: label.value(),
                tint: *tint,
                label_revision: label.revision(),
                front: label.front().clone(),
                top: label.top().clone(),
            },
            ObstacleKind::Wall => ObstacleView::Wall {
                id: o.id,
                position: o.position,
                size: o.extents(),
            },
        })
        .collect();

    let projectiles = state
        .projectiles
        .iter()
        .map(|p| ProjectileView {
            id: p.id,
            position: p.position,
            radius: PROJECTILE_RADIUS,
        })
        .collect();

    FrameSnapshot {
        tick: state.time_ticks,
        score: state.score,
        player: PlayerView {
            position: state.player.position,
            scale: state.player.scale,
        },
        obstacles,
        projectiles,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Everything needed to draw one field frame
#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    pub tick: u64,
    pub score: u64,
    pub player: Vec3,
    pub power_ups: Vec<PowerUpView>,
}

pub fn build_field_snapshot<W: PhysicsWorld>(state: &FieldState<W>) -> FieldSnapshot {
    FieldSnapshot {
        tick: state.time_ticks,
        score: state.score,
        player: state.player_position,
        power_ups: state
            .power_ups
            .iter()
            .map(|p| PowerUpView {
                id: p.id,
                position: p.position,
                rotation: p.rotation,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::test_typeface;
    use crate::settings::Ruleset;
    use crate::sim::collision::WALL_EXTENTS;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(Ruleset::BoundingBox.params());
        state.on_font_loaded(Ok(test_typeface()));
        state.spawn_projectile();

        let snap = build_snapshot(&state);
        assert_eq!(snap.obstacles.len(), state.obstacles.len());
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.player.scale, 1.0);

        let walls = snap
            .obstacles
            .iter()
            .filter(|o| matches!(o, ObstacleView::Wall { .. }))
            .count();
        assert_eq!(walls, 1);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut state = GameState::new(Ruleset::Classic.params());
        state.on_font_loaded(Ok(test_typeface()));
        let json = serde_json::to_value(build_snapshot(&state)).unwrap();

        let first = &json["obstacles"][0];
        assert_eq!(first["kind"], "standard");
        assert_eq!(first["value"], 2);
        assert_eq!(first["tint"], "red");
        assert_eq!(first["front"]["text"], "2");
        assert_eq!(first["size"], serde_json::json!([1.0, 1.0, 1.0]));
        assert_eq!(json["player"]["position"][1], 0.5);
    }

    #[test]
    fn test_wall_view_carries_collision_size() {
        let mut state = GameState::new(Ruleset::BoundingBox.params());
        state.on_font_loaded(Ok(test_typeface()));
        let json = serde_json::to_value(build_snapshot(&state)).unwrap();

        let wall = json["obstacles"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["kind"] == "wall")
            .unwrap();
        let size: Vec3 = serde_json::from_value(wall["size"].clone()).unwrap();
        assert_eq!(size, WALL_EXTENTS);
    }
}
