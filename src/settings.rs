//! Rulesets and persisted preferences
//!
//! Settings live in LocalStorage on the web, separately from anything the
//! simulation owns. Score is never persisted.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::DEFAULT_FONT_URL;
use crate::consts::*;
use crate::sim::{CollisionPolicy, ObstacleSeed, Tint};

/// Tuning presets. The game shipped in several near-identical variants that
/// differ only in speeds, preset values and the player hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Ruleset {
    /// Slow conveyor, axis-distance hit test, all obstacles start at 2
    Classic,
    /// Faster conveyor, preset 4/8 obstacle pairs
    Colored,
    /// Faster conveyor, bounding-box hit test, growth wall
    #[default]
    BoundingBox,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Classic => "classic",
            Ruleset::Colored => "colored",
            Ruleset::BoundingBox => "bounding-box",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Ruleset::Classic),
            "colored" | "coloured" => Some(Ruleset::Colored),
            "bounding-box" | "bbox" | "aabb" => Some(Ruleset::BoundingBox),
            _ => None,
        }
    }

    /// Per-tick obstacle advance
    pub fn obstacle_step(&self) -> f32 {
        match self {
            Ruleset::Classic => 0.1,
            Ruleset::Colored | Ruleset::BoundingBox => 0.15,
        }
    }

    /// Player vs. obstacle hit test
    pub fn collision_policy(&self) -> CollisionPolicy {
        match self {
            Ruleset::Classic | Ruleset::Colored => CollisionPolicy::AxisDistance,
            Ruleset::BoundingBox => CollisionPolicy::BoundingBox,
        }
    }

    /// Starting obstacle layout: three rows of pairs ahead of the player
    pub fn layout(&self) -> Vec<ObstacleSeed> {
        const START_Z: f32 = -50.0;
        const ROW_SPACING: f32 = 10.0;
        const COLUMN_OFFSET: f32 = 3.0;

        let mut seeds = Vec::with_capacity(7);
        for row in 0..3 {
            for col in 0..2 {
                let x = (col as f32 - 0.5) * COLUMN_OFFSET * 2.0;
                let z = START_Z + row as f32 * ROW_SPACING;
                let position = Vec3::new(x, PLAYER_Y, z);
                let seed = match self {
                    Ruleset::Colored if col == 0 => ObstacleSeed::Standard {
                        position,
                        value: 4,
                        tint: Tint::Gold,
                    },
                    Ruleset::Colored => ObstacleSeed::Standard {
                        position,
                        value: 8,
                        tint: Tint::Violet,
                    },
                    Ruleset::Classic | Ruleset::BoundingBox => ObstacleSeed::Standard {
                        position,
                        value: DEFAULT_OBSTACLE_VALUE,
                        tint: Tint::Red,
                    },
                };
                seeds.push(seed);
            }
        }

        if *self == Ruleset::BoundingBox {
            seeds.push(ObstacleSeed::Wall {
                position: Vec3::new(0.0, PLAYER_Y, START_Z - ROW_SPACING),
            });
        }

        seeds
    }

    pub fn params(&self) -> RulesetParams {
        RulesetParams {
            ruleset: *self,
            obstacle_step: self.obstacle_step(),
            collision: self.collision_policy(),
            projectile_interval_ms: PROJECTILE_INTERVAL_MS,
        }
    }
}

/// Which game the host runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Pointer-steered lane with labeled obstacles and projectiles
    #[default]
    Lane,
    /// Physics field with torus power-ups
    Field,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Lane => "lane",
            GameMode::Field => "field",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lane" => Some(GameMode::Lane),
            "field" | "physics" => Some(GameMode::Field),
            _ => None,
        }
    }
}

/// Resolved simulation tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulesetParams {
    pub ruleset: Ruleset,
    pub obstacle_step: f32,
    pub collision: CollisionPolicy,
    pub projectile_interval_ms: f64,
}

impl Default for RulesetParams {
    fn default() -> Self {
        Ruleset::default().params()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game to run
    pub mode: GameMode,
    /// Active ruleset
    pub ruleset: Ruleset,
    /// Projectile spawn period in milliseconds
    pub projectile_interval_ms: f64,
    /// Typeface location
    pub font_url: String,
    /// Log collision events at info level instead of debug
    pub verbose_collisions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            ruleset: Ruleset::default(),
            projectile_interval_ms: PROJECTILE_INTERVAL_MS,
            font_url: DEFAULT_FONT_URL.to_string(),
            verbose_collisions: false,
        }
    }
}

impl Settings {
    /// Create settings for a ruleset with everything else at defaults
    pub fn from_ruleset(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            ..Self::default()
        }
    }

    /// Parse settings, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Simulation tuning with the user's overrides applied
    pub fn params(&self) -> RulesetParams {
        let mut params = self.ruleset.params();
        if self.projectile_interval_ms > 0.0 {
            params.projectile_interval_ms = self.projectile_interval_ms;
        }
        params
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "lane_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruleset_names_round_trip() {
        for ruleset in [Ruleset::Classic, Ruleset::Colored, Ruleset::BoundingBox] {
            assert_eq!(Ruleset::from_str(ruleset.as_str()), Some(ruleset));
        }
        assert_eq!(Ruleset::from_str("AABB"), Some(Ruleset::BoundingBox));
        assert_eq!(Ruleset::from_str("nope"), None);
    }

    #[test]
    fn test_classic_layout_matches_grid() {
        let layout = Ruleset::Classic.layout();
        assert_eq!(layout.len(), 6);
        let xs: Vec<f32> = layout.iter().map(|s| s.position().x).collect();
        assert_eq!(xs, vec![-3.0, 3.0, -3.0, 3.0, -3.0, 3.0]);
        let zs: Vec<f32> = layout.iter().map(|s| s.position().z).collect();
        assert_eq!(zs, vec![-50.0, -50.0, -40.0, -40.0, -30.0, -30.0]);
    }

    #[test]
    fn test_bounding_box_layout_has_one_wall() {
        let walls = Ruleset::BoundingBox
            .layout()
            .into_iter()
            .filter(|s| matches!(s, ObstacleSeed::Wall { .. }))
            .count();
        assert_eq!(walls, 1);
        assert_eq!(Ruleset::BoundingBox.collision_policy(), CollisionPolicy::BoundingBox);
    }

    #[test]
    fn test_colored_presets() {
        let values: Vec<u32> = Ruleset::Colored
            .layout()
            .iter()
            .filter_map(|s| match s {
                ObstacleSeed::Standard { value, .. } => Some(*value),
                ObstacleSeed::Wall { .. } => None,
            })
            .collect();
        assert_eq!(values, vec![4, 8, 4, 8, 4, 8]);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings = Settings::from_json(r#"{"ruleset": "Classic"}"#).unwrap();
        assert_eq!(settings.ruleset, Ruleset::Classic);
        assert_eq!(settings.projectile_interval_ms, PROJECTILE_INTERVAL_MS);
        assert_eq!(settings.params().obstacle_step, 0.1);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(GameMode::from_str("FIELD"), Some(GameMode::Field));
        assert_eq!(GameMode::from_str(GameMode::Lane.as_str()), Some(GameMode::Lane));
        assert_eq!(GameMode::from_str("arcade"), None);
        let settings = Settings::from_json(r#"{"mode": "field"}"#).unwrap();
        assert_eq!(settings.mode, GameMode::Field);
        assert_eq!(settings.ruleset, Ruleset::BoundingBox);
    }

    #[test]
    fn test_non_positive_interval_ignored() {
        let mut settings = Settings::default();
        settings.projectile_interval_ms = 0.0;
        assert_eq!(settings.params().projectile_interval_ms, PROJECTILE_INTERVAL_MS);
        settings.projectile_interval_ms = 250.0;
        assert_eq!(settings.params().projectile_interval_ms, 250.0);
    }
}
