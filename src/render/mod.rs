//! SVG output for emitted segments
//!
//! The engine emits model-space coordinates; the scale, centering, and
//! canvas size applied here are the renderer's own configuration and
//! never leak into the core.

use std::io::{self, Write};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::Segment;

/// Canvas transform and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Model units to canvas pixels.
    pub scale: f32,
    /// Canvas-space offset of the model origin.
    pub offset_x: f32,
    pub offset_y: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Background fill.
    pub background: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 19.0,
            offset_x: 0.0,
            offset_y: -100.0,
            canvas_width: 750.0,
            canvas_height: 750.0,
            background: [0, 0, 0],
        }
    }
}

impl RenderConfig {
    /// Map a model-space point to canvas coordinates.
    pub fn to_canvas(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.scale + self.offset_x + self.canvas_width / 2.0,
            p.y * self.scale - self.offset_y + self.canvas_height / 2.0,
        )
    }
}

/// Format a color as an SVG hex literal.
pub fn color_hex(color: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Write segments as an SVG document, one filled polygon per segment.
///
/// Corners run begin-left, end-left, end-right, begin-right; stroking
/// with the fill color closes hairline gaps between adjacent quads.
pub fn write_svg<W: Write>(
    out: &mut W,
    segments: &[Segment],
    config: &RenderConfig,
) -> io::Result<()> {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.canvas_width,
        h = config.canvas_height
    )?;
    writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        color_hex(config.background)
    )?;
    for segment in segments {
        let bl = config.to_canvas(segment.begin_left);
        let el = config.to_canvas(segment.end_left);
        let er = config.to_canvas(segment.end_right);
        let br = config.to_canvas(segment.begin_right);
        let fill = color_hex(segment.color);
        writeln!(
            out,
            r#"  <polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{fill}" stroke="{fill}" stroke-width="1"/>"#,
            bl.x, bl.y, el.x, el.y, er.x, er.y, br.x, br.y
        )?;
    }
    writeln!(out, "</svg>")
}
