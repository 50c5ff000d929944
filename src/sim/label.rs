//! Numeric value labels shown on obstacle faces
//!
//! A label owns the obstacle's value and the two text meshes that display it
//! (front face and top face). The value can only change through
//! [`ValueLabel::set_value`], which rebuilds both meshes, so what the player
//! sees never lags the number that gets scored.

use std::sync::Arc;

use glam::Vec3;
use serde::Serialize;

use crate::assets::Typeface;

/// Glyph size used for both faces
pub const LABEL_SIZE: f32 = 0.8;
/// Extrusion depth of the front-face text
pub const FRONT_DEPTH: f32 = 0.1;
/// Extrusion depth of the top-face text
pub const TOP_DEPTH: f32 = 0.05;
/// Label offsets relative to the obstacle center
pub const FRONT_OFFSET: Vec3 = Vec3::new(-0.3, -0.3, 0.5);
pub const TOP_OFFSET: Vec3 = Vec3::new(-0.3, 0.51, 0.4);
/// Labels are drawn slightly smaller than the face
pub const LABEL_SCALE: f32 = 0.95;

/// Text geometry request for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMesh {
    pub text: String,
    pub size: f32,
    pub depth: f32,
    /// Advance width in world units (before `LABEL_SCALE`)
    pub width: f32,
    pub offset: Vec3,
}

impl TextMesh {
    fn build(font: &Typeface, text: &str, depth: f32, offset: Vec3) -> Self {
        Self {
            text: text.to_string(),
            size: LABEL_SIZE,
            depth,
            width: font.measure(text, LABEL_SIZE),
            offset,
        }
    }
}

/// Value plus the meshes that display it
#[derive(Debug, Clone)]
pub struct ValueLabel {
    value: u32,
    front: TextMesh,
    top: TextMesh,
    /// Bumped every time the meshes are rebuilt
    revision: u32,
    font: Arc<Typeface>,
}

impl ValueLabel {
    pub fn new(value: u32, font: Arc<Typeface>) -> Self {
        let text = value.to_string();
        Self {
            value,
            front: TextMesh::build(&font, &text, FRONT_DEPTH, FRONT_OFFSET),
            top: TextMesh::build(&font, &text, TOP_DEPTH, TOP_OFFSET),
            revision: 0,
            font,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Text currently displayed (both faces show the same text)
    pub fn text(&self) -> &str {
        &self.front.text
    }

    pub fn front(&self) -> &TextMesh {
        &self.front
    }

    pub fn top(&self) -> &TextMesh {
        &self.top
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Change the value and regenerate both meshes
    pub fn set_value(&mut self, value: u32) {
        self.value = value;
        let text = value.to_string();
        self.front = TextMesh::build(&self.font, &text, FRONT_DEPTH, FRONT_OFFSET);
        self.top = TextMesh::build(&self.font, &text, TOP_DEPTH, TOP_OFFSET);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Projectile hit: one more point
    pub fn increment(&mut self) -> u32 {
        let next = self.value.saturating_add(1);
        self.set_value(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::test_typeface;

    #[test]
    fn test_text_tracks_value() {
        let mut label = ValueLabel::new(2, Arc::new(test_typeface()));
        assert_eq!(label.text(), "2");
        assert_eq!(label.revision(), 0);

        label.set_value(17);
        assert_eq!(label.value(), 17);
        assert_eq!(label.front().text, "17");
        assert_eq!(label.top().text, "17");
        assert_eq!(label.revision(), 1);
    }

    #[test]
    fn test_width_grows_with_digits() {
        let mut label = ValueLabel::new(9, Arc::new(test_typeface()));
        let narrow = label.front().width;
        assert_eq!(label.increment(), 10);
        assert!(label.front().width > narrow);
        assert_eq!(label.front().depth, FRONT_DEPTH);
        assert_eq!(label.top().depth, TOP_DEPTH);
    }
}
