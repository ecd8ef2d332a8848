/// Drawing surface abstraction.
/// A surface is owned by whoever created it; renderers only issue immediate-mode
/// draw commands against it and never resize it.
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use thiserror::Error;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Point, Rect, Stroke, Transform};
use tracing::warn;

/// Prefix of every exported image string
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// 2D immediate-mode drawing context with fixed pixel dimensions.
///
/// Colors are passed through as strings; a surface that cannot interpret
/// one skips that single draw call.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str);

    /// Stroke a straight line from `from` to `to`.
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: &str);

    /// Encode current contents as PNG bytes.
    fn encode_png(&self) -> Result<Vec<u8>, SurfaceError>;

    /// Current contents as a self-contained `data:` URI.
    fn to_data_url(&self) -> Result<String, SurfaceError> {
        let png = self.encode_png()?;
        Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png)))
    }

    fn save_png(&self, path: &Path) -> Result<(), SurfaceError> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}

/// Surface backed by a tiny-skia pixmap.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    /// Returns `None` when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn paint_for(color: &str) -> Option<Paint<'static>> {
        let Some(color) = parse_color(color) else {
            warn!("Ignoring draw call with invalid color '{}'", color);
            return None;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        Some(paint)
    }
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str) {
        let Some(paint) = Self::paint_for(color) else {
            return;
        };
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: &str) {
        let Some(paint) = Self::paint_for(color) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        // Zero-length lines produce no path
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }
}

/// Parse a CSS-style color string.
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a handful of named colors.
pub fn parse_color(color: &str) -> Option<Color> {
    let s = color.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize, n: usize| u8::from_str_radix(&hex[i..i + n], 16).ok();
        return match hex.len() {
            3 => {
                // #rgb expands each nibble: f -> ff
                let r = channel(0, 1)?;
                let g = channel(1, 1)?;
                let b = channel(2, 1)?;
                Some(Color::from_rgba8(r * 17, g * 17, b * 17, 255))
            }
            6 => Some(Color::from_rgba8(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                255,
            )),
            8 => Some(Color::from_rgba8(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)?,
            )),
            _ => None,
        };
    }

    let rgba = match s.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "transparent" => (0, 0, 0, 0),
        _ => return None,
    };
    Some(Color::from_rgba8(rgba.0, rgba.1, rgba.2, rgba.3))
}
