//! Silhouette bounds
//!
//! Tokens are drawn as a glyph inside a square viewbox, but the glyph does
//! not fill the square. Walls collide against the glyph's real bounding box,
//! measured once from its SVG path data (via usvg) and stored as fractions of
//! the square.

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::error::ShapeError;

/// Heart glyph path, drawn in a [`HEART_VIEWBOX`]-sized square
pub const HEART_PATH: &str = "M256 472s-22.4-13.7-44.9-30.4C142.6 400.8 64 335.3 64 243.6 64 176.3 115.3 128 182.2 128c35.9 0 58.7 17.8 73.8 35.7C271.1 145.8 293.9 128 329.8 128 396.7 128 448 176.3 448 243.6c0 91.7-78.6 157.2-147.1 198C278.4 458.3 256 472 256 472z";
pub const HEART_VIEWBOX: f32 = 512.0;

/// Where the visible glyph sits inside its square, as fractions (0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for ShapeBounds {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Axis-aligned box of a body's visible glyph, in screen px
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeBox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ShapeBounds {
    /// The whole square
    pub const UNIT: Self = Self {
        min_x: 0.0,
        max_x: 1.0,
        min_y: 0.0,
        max_y: 1.0,
    };

    /// Measure the bounding box of `path` within a `viewbox_w` x `viewbox_h` viewbox
    pub fn measure(path: &str, viewbox_w: f32, viewbox_h: f32) -> Result<Self, ShapeError> {
        if !(viewbox_w.is_finite() && viewbox_h.is_finite() && viewbox_w > 0.0 && viewbox_h > 0.0)
        {
            return Err(ShapeError::InvalidViewbox {
                width: viewbox_w,
                height: viewbox_h,
            });
        }
        if path.trim().is_empty() {
            return Err(ShapeError::EmptyPath);
        }
        if path.contains(['"', '<', '&']) {
            return Err(ShapeError::Svg("path data contains markup".to_string()));
        }

        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><path d="{path}"/></svg>"#,
            w = viewbox_w,
            h = viewbox_h,
        );
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
            .map_err(|e| ShapeError::Svg(e.to_string()))?;

        // usvg drops paths with nothing to draw
        let root = tree.root();
        if root.children().is_empty() {
            return Err(ShapeError::Degenerate {
                width: 0.0,
                height: 0.0,
            });
        }
        let bbox = root.abs_bounding_box();
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(ShapeError::Degenerate {
                width: bbox.width(),
                height: bbox.height(),
            });
        }

        let bounds = Self {
            min_x: (bbox.left() / viewbox_w).clamp(0.0, 1.0),
            max_x: (bbox.right() / viewbox_w).clamp(0.0, 1.0),
            min_y: (bbox.top() / viewbox_h).clamp(0.0, 1.0),
            max_y: (bbox.bottom() / viewbox_h).clamp(0.0, 1.0),
        };
        // Entirely outside the viewbox collapses to an edge after clamping
        if bounds.min_x >= bounds.max_x || bounds.min_y >= bounds.max_y {
            return Err(ShapeError::Degenerate {
                width: (bounds.max_x - bounds.min_x) * viewbox_w,
                height: (bounds.max_y - bounds.min_y) * viewbox_h,
            });
        }
        Ok(bounds)
    }

    /// Like [`measure`](Self::measure), but falls back to the full square
    pub fn for_silhouette(path: &str, viewbox_w: f32, viewbox_h: f32) -> Self {
        match Self::measure(path, viewbox_w, viewbox_h) {
            Ok(bounds) => {
                log::debug!("Silhouette bounds: {:?}", bounds);
                bounds
            }
            Err(e) => {
                log::warn!("Could not measure silhouette ({}), using full square", e);
                Self::UNIT
            }
        }
    }

    /// Bounds of the built-in heart glyph
    pub fn heart() -> Self {
        Self::for_silhouette(HEART_PATH, HEART_VIEWBOX, HEART_VIEWBOX)
    }

    /// Screen-space box of the glyph for a body
    #[inline]
    pub fn box_for(&self, body: &Body) -> ShapeBox {
        let size = body.size();
        ShapeBox {
            left: body.pos.x + self.min_x * size,
            right: body.pos.x + self.max_x * size,
            top: body.pos.y + self.min_y * size,
            bottom: body.pos.y + self.max_y * size,
        }
    }
}
