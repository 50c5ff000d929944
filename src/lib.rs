//! Lane Runner - an endless-conveyor arcade game core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (movement, collisions, scoring, lifecycle)
//! - `assets`: Typeface loading that gates obstacle creation
//! - `platform`: Browser/native output surfaces (score display)
//! - `settings`: Rulesets and persisted preferences

pub mod assets;
pub mod platform;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetState, Typeface};
pub use settings::{GameMode, Ruleset, RulesetParams, Settings};

/// Game configuration constants
pub mod consts {
    /// Half-width of the lane the player may occupy
    pub const LANE_HALF_WIDTH: f32 = 4.5;
    /// Width of the pointer mapping range (pointer spans -5..5)
    pub const POINTER_RANGE: f32 = 10.0;

    /// Player cube rests on the road surface
    pub const PLAYER_Y: f32 = 0.5;
    pub const PLAYER_Z: f32 = 0.0;
    /// Edge length of the player and obstacle cubes
    pub const CUBE_SIZE: f32 = 1.0;
    /// Scale multiplier applied by a wall power-up
    pub const WALL_GROWTH: f32 = 1.25;

    /// Obstacles are recycled this far ahead of the player
    pub const RECYCLE_DISTANCE: f32 = 60.0;
    /// An obstacle counts as passed once it is this far behind the player
    pub const PASS_MARGIN: f32 = 1.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 0.2;
    /// Per-tick projectile speed along -Z
    pub const PROJECTILE_SPEED: f32 = 1.0;
    /// Wall-clock spawn interval
    pub const PROJECTILE_INTERVAL_MS: f64 = 1000.0;
    /// Projectiles this far beyond the player are culled
    pub const PROJECTILE_RANGE: f32 = 100.0;
    /// Center distance below which a projectile hits an obstacle
    pub const PROJECTILE_HIT_DISTANCE: f32 = 1.0;

    /// Starting obstacle value
    pub const DEFAULT_OBSTACLE_VALUE: u32 = 2;

    /// Longest frame the host feeds into a single tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;
}

/// Map a pointer/touch X coordinate onto the lane (-5..5 before clamping)
#[inline]
pub fn pointer_to_lane_x(client_x: f32, viewport_width: f32) -> f32 {
    if viewport_width <= 0.0 {
        return 0.0;
    }
    (client_x / viewport_width) * consts::POINTER_RANGE - consts::POINTER_RANGE / 2.0
}

/// Clamp a desired lateral position into the lane
#[inline]
pub fn clamp_to_lane(x: f32) -> f32 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(-consts::LANE_HALF_WIDTH, consts::LANE_HALF_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pointer_mapping() {
        assert!((pointer_to_lane_x(0.0, 800.0) + 5.0).abs() < 1e-6);
        assert!((pointer_to_lane_x(400.0, 800.0)).abs() < 1e-6);
        assert!((pointer_to_lane_x(800.0, 800.0) - 5.0).abs() < 1e-6);
        assert_eq!(pointer_to_lane_x(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_to_lane(f32::NAN), 0.0);
        assert_eq!(clamp_to_lane(f32::INFINITY), consts::LANE_HALF_WIDTH);
        assert_eq!(clamp_to_lane(f32::NEG_INFINITY), -consts::LANE_HALF_WIDTH);
    }

    proptest! {
        #[test]
        fn clamp_stays_in_lane(x in proptest::num::f32::ANY) {
            let clamped = clamp_to_lane(x);
            prop_assert!(clamped >= -consts::LANE_HALF_WIDTH);
            prop_assert!(clamped <= consts::LANE_HALF_WIDTH);
        }
    }
}
