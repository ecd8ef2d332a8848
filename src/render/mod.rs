pub mod faces;
pub mod palette;
pub mod surface;

use chrono::{Local, NaiveTime};
use serde_json::{Map, Value};
use std::path::Path;

/// Common contract of every clock face.
///
/// A face owns its drawing surface. Built without one it is inert: every
/// method is a no-op returning an empty image or empty palette.
pub trait ClockFace {
    /// Redraw the face for the given wall-clock time.
    fn draw_clock_at(&mut self, time: NaiveTime);

    /// Redraw the face for the current local time.
    fn draw_clock(&mut self) {
        self.draw_clock_at(Local::now().time());
    }

    /// Surface contents as a PNG data URI, empty when inert.
    fn get_image_data(&self) -> String;

    /// Write surface contents to a PNG file. No-op when inert.
    fn save_png(&self, path: &Path) -> anyhow::Result<()>;

    /// Merge a role -> color mapping into the palette.
    fn set_colors(&mut self, colors: &Value);

    /// Snapshot of the palette.
    fn get_colors(&self) -> Map<String, Value>;

    /// Restore the face's default palette.
    fn reset_colors(&mut self);

    fn is_inert(&self) -> bool;
}
