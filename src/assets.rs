//! Typeface asset loading
//!
//! Obstacles display their value as extruded text, so they cannot be built
//! until the typeface has arrived. The font is a three.js typeface JSON
//! document (`helvetiker_bold.typeface.json`); only glyph advances are read
//! here, outline triangulation belongs to the renderer.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Default typeface location relative to the page
pub const DEFAULT_FONT_URL: &str = "./public/font/helvetiker_bold.typeface.json";

/// Errors raised while loading the typeface
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("malformed typeface JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("typeface has no glyph for {0:?}")]
    MissingGlyph(char),
    #[error("failed to read typeface: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch typeface: {0}")]
    Fetch(String),
}

/// A single glyph entry. `ha` is the horizontal advance in font units.
#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    pub ha: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceDocument {
    glyphs: HashMap<String, Glyph>,
    #[serde(default)]
    family_name: String,
    #[serde(default = "default_resolution")]
    resolution: f32,
}

fn default_resolution() -> f32 {
    1000.0
}

/// Parsed typeface
#[derive(Debug, Clone)]
pub struct Typeface {
    pub family_name: String,
    /// Font units per em
    pub resolution: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Typeface {
    /// Parse a typeface document. Every ASCII digit must be present since
    /// obstacle labels are numbers.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let doc: TypefaceDocument = serde_json::from_str(json)?;

        let glyphs: HashMap<char, Glyph> = doc
            .glyphs
            .into_iter()
            .filter_map(|(key, glyph)| {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some((c, glyph)),
                    _ => None,
                }
            })
            .collect();

        if let Some(missing) = ('0'..='9').find(|c| !glyphs.contains_key(c)) {
            return Err(AssetError::MissingGlyph(missing));
        }

        let resolution = if doc.resolution > 0.0 {
            doc.resolution
        } else {
            default_resolution()
        };

        log::info!(
            "Loaded typeface '{}' ({} glyphs)",
            doc.family_name,
            glyphs.len()
        );

        Ok(Self {
            family_name: doc.family_name,
            resolution,
            glyphs,
        })
    }

    /// Read a typeface from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Fetch and parse a typeface over HTTP
    #[cfg(target_arch = "wasm32")]
    pub async fn fetch(url: &str) -> Result<Self, AssetError> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;

        fn js_err(v: JsValue) -> AssetError {
            AssetError::Fetch(format!("{:?}", v))
        }

        let window = web_sys::window().ok_or_else(|| AssetError::Fetch("no window".into()))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            return Err(AssetError::Fetch(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        let body = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let json = body
            .as_string()
            .ok_or_else(|| AssetError::Fetch("response body is not text".into()))?;
        Self::from_json(&json)
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Advance width of `text` at the given size, in world units
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scale = size / self.resolution;
        text.chars()
            .map(|c| match self.glyph(c) {
                Some(g) => g.ha,
                None => {
                    log::warn!("No glyph for {:?} in '{}'", c, self.family_name);
                    0.0
                }
            })
            .sum::<f32>()
            * scale
    }
}

/// Loading state of the typeface
#[derive(Debug, Clone, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

impl AssetState {
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready)
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, AssetState::Pending)
    }
}

/// Minimal typeface covering the digits, for tests
#[cfg(test)]
pub(crate) fn test_typeface() -> Typeface {
    let glyphs: Vec<String> = ('0'..='9')
        .map(|c| format!(r#""{c}": {{"ha": 556, "x_min": 30, "x_max": 520, "o": ""}}"#))
        .collect();
    let json = format!(
        r#"{{"familyName": "Test Sans", "resolution": 1000, "glyphs": {{{}}}}}"#,
        glyphs.join(",")
    );
    match Typeface::from_json(&json) {
        Ok(font) => font,
        Err(e) => panic!("test typeface must parse: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_measure() {
        let font = test_typeface();
        assert_eq!(font.family_name, "Test Sans");
        // Two digits at size 1.0: 2 * 556 / 1000
        assert!((font.measure("42", 1.0) - 1.112).abs() < 1e-4);
        assert!((font.measure("7", 0.8) - 0.4448).abs() < 1e-4);
    }

    #[test]
    fn test_missing_digit_rejected() {
        let json = r#"{"resolution": 1000, "glyphs": {"1": {"ha": 500}}}"#;
        let err = Typeface::from_json(json).unwrap_err();
        assert!(matches!(err, AssetError::MissingGlyph('0')));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Typeface::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AssetError::Parse(_)));
    }

    #[test]
    fn test_unknown_glyph_measures_zero() {
        let font = test_typeface();
        assert_eq!(font.measure("?", 1.0), 0.0);
    }
}
