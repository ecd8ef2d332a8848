/// Analog clock face.
/// Computes continuous arm progress from the time of day. Only the background
/// is painted on each draw; `draw_arm` is available for stroking arms.
use chrono::{NaiveTime, Timelike};
use serde_json::{Map, Value};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;
use tiny_skia::Point;
use tracing::{debug, trace};

use crate::render::ClockFace;
use crate::render::palette::{self, AnalogPalette, Palette};
use crate::render::surface::Surface;

/// How far each arm has travelled through its cycle, each in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmProgress {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl ArmProgress {
    /// Smaller units feed into larger ones, so arms sweep instead of stepping.
    pub fn at(time: &impl Timelike) -> Self {
        let second = time.second() as f64 / 60.0;
        let minute = time.minute() as f64 / 60.0 + second / 60.0;
        let hour = (time.hour() % 12) as f64 / 12.0 + minute / 12.0;
        Self {
            hour,
            minute,
            second,
        }
    }
}

/// Angle of an arm in radians; progress 0 points at 12 o'clock.
pub fn arm_angle(progress: f64) -> f32 {
    (TAU * progress - FRAC_PI_2) as f32
}

struct Face<S> {
    surface: S,
    center: Point,
    radius: f32,
    palette: AnalogPalette,
}

pub struct AnalogClock<S> {
    face: Option<Face<S>>,
}

impl<S: Surface> AnalogClock<S> {
    pub fn new(surface: Option<S>) -> Self {
        let face = surface.map(|surface| {
            let (w, h) = (surface.width() as f32, surface.height() as f32);
            let radius = w / 2.0;
            debug!("Analog clock {}x{}: radius {}", w, h, radius);
            Face {
                surface,
                center: Point::from_xy(w / 2.0, h / 2.0),
                radius,
                palette: AnalogPalette::default(),
            }
        });
        if face.is_none() {
            debug!("Analog clock created without a surface; drawing disabled");
        }
        Self { face }
    }

    pub fn surface(&self) -> Option<&S> {
        self.face.as_ref().map(|f| &f.surface)
    }

    pub fn palette(&self) -> Option<&AnalogPalette> {
        self.face.as_ref().map(|f| &f.palette)
    }

    pub fn center(&self) -> Option<Point> {
        self.face.as_ref().map(|f| f.center)
    }

    pub fn radius(&self) -> Option<f32> {
        self.face.as_ref().map(|f| f.radius)
    }

    /// Stroke one arm from the center outward.
    ///
    /// `length` is a fraction of the clock radius. Returns the arm's end point,
    /// or `None` when there is no surface.
    pub fn draw_arm(
        &mut self,
        progress: f64,
        thickness: f32,
        length: f32,
        color: &str,
    ) -> Option<Point> {
        let face = self.face.as_mut()?;
        let angle = arm_angle(progress);
        let reach = length * face.radius;
        let end = Point::from_xy(
            face.center.x + reach * angle.cos(),
            face.center.y + reach * angle.sin(),
        );
        face.surface.stroke_line(face.center, end, thickness, color);
        Some(end)
    }
}

impl<S: Surface> ClockFace for AnalogClock<S> {
    fn draw_clock_at(&mut self, time: NaiveTime) {
        let Some(face) = self.face.as_mut() else {
            return;
        };

        let progress = ArmProgress::at(&time);
        trace!(
            "Analog progress h={:.4} m={:.4} s={:.4}",
            progress.hour, progress.minute, progress.second
        );

        let (w, h) = (face.surface.width() as f32, face.surface.height() as f32);
        face.surface
            .fill_rect(0.0, 0.0, w, h, &face.palette.background);
    }

    fn get_image_data(&self) -> String {
        super::image_data(self.surface())
    }

    fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        super::write_png(self.surface(), path)
    }

    fn set_colors(&mut self, colors: &Value) {
        if let Some(face) = self.face.as_mut() {
            palette::merge_json(&mut face.palette, colors);
        }
    }

    fn get_colors(&self) -> Map<String, Value> {
        self.palette().map(Palette::to_map).unwrap_or_default()
    }

    fn reset_colors(&mut self) {
        if let Some(face) = self.face.as_mut() {
            face.palette = AnalogPalette::default();
        }
    }

    fn is_inert(&self) -> bool {
        self.face.is_none()
    }
}
