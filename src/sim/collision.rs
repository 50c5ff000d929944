//! Overlap tests between the player, obstacles and projectiles
//!
//! Two policies exist for the player. The bounding-box test accounts for the
//! player's growth from walls; the axis-distance test is what the earliest
//! variants shipped and ignores scale entirely.

use glam::Vec3;

use super::aabb::Aabb;
use crate::consts::*;

/// How the player is tested against obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// World-space box intersection, scale included
    #[default]
    BoundingBox,
    /// `|dx| < 1 && |dz| < 1`
    AxisDistance,
}

/// Local (unscaled) size of an obstacle or player cube
pub const CUBE_EXTENTS: Vec3 = Vec3::splat(CUBE_SIZE);

/// Local size of a wall power-up: wide, short and thin
pub const WALL_EXTENTS: Vec3 = Vec3::new(3.0, 1.0, 0.2);

/// Whether the player overlaps a shape centered at `other` with size `other_size`
pub fn player_overlaps(
    policy: CollisionPolicy,
    player_pos: Vec3,
    player_scale: f32,
    other: Vec3,
    other_size: Vec3,
) -> bool {
    match policy {
        CollisionPolicy::BoundingBox => {
            let player_box = Aabb::of_scaled_box(player_pos, CUBE_EXTENTS, player_scale);
            let other_box = Aabb::of_scaled_box(other, other_size, 1.0);
            player_box.intersects(&other_box)
        }
        CollisionPolicy::AxisDistance => {
            (other.x - player_pos.x).abs() < CUBE_SIZE && (other.z - player_pos.z).abs() < CUBE_SIZE
        }
    }
}

/// Center-distance hit test between a projectile and an obstacle
#[inline]
pub fn projectile_hits(projectile: Vec3, obstacle: Vec3) -> bool {
    projectile.distance(obstacle) < PROJECTILE_HIT_DISTANCE
}

/// First tick index (1-based) at which a point starting `gap` away and
/// closing at `closing_speed` per tick comes within `threshold`.
/// Returns `None` if it never closes.
pub fn ticks_until_contact(gap: f32, closing_speed: f32, threshold: f32) -> Option<u32> {
    if gap < threshold {
        return Some(0);
    }
    if closing_speed <= 0.0 {
        return None;
    }
    // Strictly below threshold: distance after n ticks = gap - n * speed
    let n = ((gap - threshold) / closing_speed).floor() + 1.0;
    Some(n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_respects_scale() {
        let player = Vec3::new(0.0, PLAYER_Y, 0.0);
        let obstacle = Vec3::new(1.1, PLAYER_Y, 0.0);
        assert!(!player_overlaps(CollisionPolicy::BoundingBox, player, 1.0, obstacle, CUBE_EXTENTS));
        assert!(player_overlaps(CollisionPolicy::BoundingBox, player, 1.25, obstacle, CUBE_EXTENTS));
    }

    #[test]
    fn test_axis_distance_ignores_scale() {
        let player = Vec3::new(0.0, PLAYER_Y, 0.0);
        let obstacle = Vec3::new(1.1, PLAYER_Y, 0.0);
        assert!(!player_overlaps(CollisionPolicy::AxisDistance, player, 3.0, obstacle, CUBE_EXTENTS));
        let near = Vec3::new(0.9, PLAYER_Y, -0.9);
        assert!(player_overlaps(CollisionPolicy::AxisDistance, player, 1.0, near, CUBE_EXTENTS));
    }

    #[test]
    fn test_wall_is_wide() {
        let player = Vec3::new(1.4, PLAYER_Y, 0.0);
        let wall = Vec3::new(0.0, PLAYER_Y, -0.5);
        assert!(player_overlaps(CollisionPolicy::BoundingBox, player, 1.0, wall, WALL_EXTENTS));
    }

    #[test]
    fn test_projectile_threshold() {
        let obstacle = Vec3::new(0.0, 0.5, -10.0);
        assert!(!projectile_hits(Vec3::new(0.0, 0.5, -9.0), obstacle));
        assert!(projectile_hits(Vec3::new(0.0, 0.5, -9.1), obstacle));
    }

    #[test]
    fn test_ticks_until_contact() {
        assert_eq!(ticks_until_contact(0.5, 1.0, 1.0), Some(0));
        assert_eq!(ticks_until_contact(5.0, 1.0, 1.0), Some(5));
        assert_eq!(ticks_until_contact(5.5, 1.0, 1.0), Some(5));
        assert_eq!(ticks_until_contact(5.0, 0.0, 1.0), None);
    }
}
