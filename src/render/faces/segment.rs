/// Seven-segment digital clock face.
/// Draws HH MM as four glyphs of stroked line segments with a blinking
/// two-dot separator between the hour and minute groups.
use chrono::{NaiveTime, Timelike};
use serde_json::{Map, Value};
use std::path::Path;
use tiny_skia::Point;
use tracing::{debug, trace};

use crate::render::ClockFace;
use crate::render::palette::{self, DigitalPalette, Palette};
use crate::render::surface::Surface;

/// Stroke thickness of every segment, in pixels
pub const LINE_WIDTH: f32 = 4.0;

//     top
//     ---
// ul |   | ur
//     ---  middle
// ll |   | lr
//     ---
//    bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Top,
    UpperLeft,
    UpperRight,
    Middle,
    LowerLeft,
    LowerRight,
    Bottom,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::Top,
        Segment::UpperLeft,
        Segment::UpperRight,
        Segment::Middle,
        Segment::LowerLeft,
        Segment::LowerRight,
        Segment::Bottom,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of lit segments for one glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentSet(u8);

impl SegmentSet {
    pub const fn of(segments: &[Segment]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < segments.len() {
            bits |= segments[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Standard seven-segment pattern for a decimal digit.
    pub fn for_digit(digit: u8) -> Option<Self> {
        DIGIT_PATTERNS.get(digit as usize).copied()
    }

    pub fn contains(self, segment: Segment) -> bool {
        self.0 & segment.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Segment> {
        Segment::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

use Segment::*;

const DIGIT_PATTERNS: [SegmentSet; 10] = [
    SegmentSet::of(&[Top, UpperLeft, UpperRight, LowerLeft, LowerRight, Bottom]),
    SegmentSet::of(&[UpperRight, LowerRight]),
    SegmentSet::of(&[Top, UpperRight, Middle, LowerLeft, Bottom]),
    SegmentSet::of(&[Top, UpperRight, Middle, LowerRight, Bottom]),
    SegmentSet::of(&[UpperLeft, UpperRight, Middle, LowerRight]),
    SegmentSet::of(&[Top, UpperLeft, Middle, LowerRight, Bottom]),
    SegmentSet::of(&[Top, UpperLeft, Middle, LowerLeft, LowerRight, Bottom]),
    SegmentSet::of(&[Top, UpperRight, LowerRight]),
    SegmentSet::of(&[Top, UpperLeft, UpperRight, Middle, LowerLeft, LowerRight, Bottom]),
    SegmentSet::of(&[Top, UpperLeft, UpperRight, Middle, LowerRight, Bottom]),
];

/// Digit cell layout, derived once from the canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentGeometry {
    pub digit_width: f32,
    pub digit_height: f32,
    pub line_width: f32,
    /// Horizontal gap between digit cells (and around the separator)
    pub spacing: f32,
    /// Segment endpoints relative to the cell's top-left corner, in `Segment::ALL` order
    lines: [(Point, Point); 7],
    /// Top-left corners of the separator dots, relative to the cursor after the hour group
    separator: [Point; 2],
}

impl SegmentGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let l = LINE_WIDTH;
        let w = width as f32 / 5.0 - l * 2.0;
        let h = height as f32 / 2.0 - l * 2.0;
        let p = Point::from_xy;

        let lines = [
            (p(l, l / 2.0), p(l + w, l / 2.0)),
            (p(l / 2.0, l), p(l / 2.0, h / 2.0 + l / 2.0)),
            (
                p(3.0 * l / 2.0 + w, l),
                p(3.0 * l / 2.0 + w, h / 2.0 + l / 2.0),
            ),
            (p(l, h / 2.0 + l), p(l + w, h / 2.0 + l)),
            (
                p(l / 2.0, h / 2.0 + 3.0 * l / 2.0),
                p(l / 2.0, h + l / 2.0),
            ),
            (
                p(3.0 * l / 2.0 + w, h / 2.0 + 3.0 * l / 2.0),
                p(3.0 * l / 2.0 + w, h + l / 2.0),
            ),
            (p(l / 2.0, h + l), p(l + w, h + l)),
        ];

        Self {
            digit_width: w,
            digit_height: h,
            line_width: l,
            spacing: width as f32 / 20.0 + l,
            lines,
            separator: [
                p(l / 2.0, h / 4.0 + l / 2.0),
                p(l / 2.0, 3.0 * h / 4.0 + 3.0 * l / 2.0),
            ],
        }
    }

    pub fn line(&self, segment: Segment) -> (Point, Point) {
        self.lines[segment as usize]
    }

    pub fn separator(&self) -> &[Point; 2] {
        &self.separator
    }
}

/// Hour and minute as four decimal digits, e.g. 09:41 -> [0, 9, 4, 1]
pub fn digits_for(time: &impl Timelike) -> [u8; 4] {
    let (h, m) = (time.hour() as u8, time.minute() as u8);
    [h / 10, h % 10, m / 10, m % 10]
}

/// Zero-padded "HHMM" string for a time
pub fn digit_string(time: &NaiveTime) -> String {
    time.format("%H%M").to_string()
}

/// The separator is lit on odd seconds, so it blinks once per second.
pub fn separator_lit(second: u32) -> bool {
    second % 2 == 1
}

struct Face<S> {
    surface: S,
    geometry: SegmentGeometry,
    palette: DigitalPalette,
}

pub struct SegmentClock<S> {
    face: Option<Face<S>>,
}

impl<S: Surface> SegmentClock<S> {
    pub fn new(surface: Option<S>) -> Self {
        let face = surface.map(|surface| {
            let geometry = SegmentGeometry::new(surface.width(), surface.height());
            debug!(
                "Segment clock {}x{}: digit {}x{}, spacing {}",
                surface.width(),
                surface.height(),
                geometry.digit_width,
                geometry.digit_height,
                geometry.spacing
            );
            Face {
                surface,
                geometry,
                palette: DigitalPalette::default(),
            }
        });
        if face.is_none() {
            debug!("Segment clock created without a surface; drawing disabled");
        }
        Self { face }
    }

    pub fn surface(&self) -> Option<&S> {
        self.face.as_ref().map(|f| &f.surface)
    }

    pub fn geometry(&self) -> Option<&SegmentGeometry> {
        self.face.as_ref().map(|f| &f.geometry)
    }

    pub fn palette(&self) -> Option<&DigitalPalette> {
        self.face.as_ref().map(|f| &f.palette)
    }
}

impl<S: Surface> ClockFace for SegmentClock<S> {
    fn draw_clock_at(&mut self, time: NaiveTime) {
        let Some(Face {
            surface,
            geometry: g,
            palette,
        }) = self.face.as_mut()
        else {
            return;
        };

        trace!("Drawing segment clock {}", digit_string(&time));

        let (width, height) = (surface.width() as f32, surface.height() as f32);
        surface.fill_rect(0.0, 0.0, width, height, &palette.background);

        let l = g.line_width;
        let dy = (height - g.digit_height) / 2.0;
        let mut dx = l;
        let at = |pt: Point, dx: f32| Point::from_xy(pt.x + dx, pt.y + dy);

        for (i, digit) in digits_for(&time).into_iter().enumerate() {
            let lit = SegmentSet::for_digit(digit).unwrap_or_default();
            for segment in Segment::ALL {
                let color = if lit.contains(segment) {
                    &palette.line_on
                } else {
                    &palette.line_off
                };
                let (from, to) = g.line(segment);
                surface.stroke_line(at(from, dx), at(to, dx), l, color);
            }
            dx += g.digit_width + g.spacing;

            if i == 1 {
                let color = if separator_lit(time.second()) {
                    &palette.line_on
                } else {
                    &palette.line_off
                };
                for dot in g.separator() {
                    let corner = at(*dot, dx);
                    surface.fill_rect(corner.x, corner.y, l, l, color);
                }
                dx += g.spacing;
            }
        }
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
            face.palette = DigitalPalette::default();
        }
    }

    fn is_inert(&self) -> bool {
        self.face.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::PixmapSurface;
    use crate::render::surface::testing::{DrawOp, RecordingSurface};
    use serde_json::json;

    const ON: &str = "#FF0000";
    const OFF: &str = "#5A0000";

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn recording_clock() -> SegmentClock<RecordingSurface> {
        SegmentClock::new(Some(RecordingSurface::new(144, 144)))
    }

    fn ops(clock: &SegmentClock<RecordingSurface>) -> &[DrawOp] {
        &clock.surface().unwrap().ops
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_digit_patterns() {
        let expected: [&[Segment]; 10] = [
            &[Top, UpperLeft, UpperRight, LowerLeft, LowerRight, Bottom],
            &[UpperRight, LowerRight],
            &[Top, UpperRight, Middle, LowerLeft, Bottom],
            &[Top, UpperRight, Middle, LowerRight, Bottom],
            &[UpperLeft, UpperRight, Middle, LowerRight],
            &[Top, UpperLeft, Middle, LowerRight, Bottom],
            &[Top, UpperLeft, Middle, LowerLeft, LowerRight, Bottom],
            &[Top, UpperRight, LowerRight],
            &Segment::ALL,
            &[Top, UpperLeft, UpperRight, Middle, LowerRight, Bottom],
        ];
        for (digit, segments) in expected.iter().enumerate() {
            let set = SegmentSet::for_digit(digit as u8).unwrap();
            assert_eq!(set.iter().collect::<Vec<_>>(), segments.to_vec(), "digit {digit}");
        }
        assert_eq!(SegmentSet::for_digit(1).unwrap().len(), 2);
        assert_eq!(SegmentSet::for_digit(8).unwrap().len(), 7);
        assert!(SegmentSet::for_digit(10).is_none());
    }

    #[test]
    fn test_geometry_from_canvas() {
        let g = SegmentGeometry::new(144, 144);
        assert!(close(g.digit_width, 20.8));
        assert!(close(g.digit_height, 64.0));
        assert!(close(g.spacing, 11.2));
        let (from, to) = g.line(Top);
        assert_eq!((from.x, from.y), (4.0, 2.0));
        assert!(close(to.x, 24.8));
        let (from, to) = g.line(LowerRight);
        assert!(close(from.x, 26.8));
        assert_eq!((from.y, to.y), (38.0, 66.0));
        assert_eq!(g.separator()[0], Point::from_xy(2.0, 18.0));
        assert_eq!(g.separator()[1], Point::from_xy(2.0, 54.0));
    }

    #[test]
    fn test_digit_string() {
        assert_eq!(digit_string(&at(9, 41, 13)), "0941");
        assert_eq!(digits_for(&at(9, 41, 13)), [0, 9, 4, 1]);
        assert_eq!(digits_for(&at(23, 5, 0)), [2, 3, 0, 5]);
        assert_eq!(digit_string(&at(0, 0, 0)), "0000");
    }

    #[test]
    fn test_separator_blinks_with_second_parity() {
        for s in 0..60 {
            assert_eq!(separator_lit(s), s % 2 == 1, "second {s}");
        }
    }

    #[test]
    fn test_draw_sequence() {
        let mut clock = recording_clock();
        clock.draw_clock_at(at(9, 41, 13));
        let ops = ops(&clock);
        assert_eq!(ops.len(), 1 + 4 * 7 + 2);
        assert_eq!(
            ops[0],
            DrawOp::FillRect {
                x: 0.0,
                y: 0.0,
                w: 144.0,
                h: 144.0,
                color: "#200000".to_string()
            }
        );

        // Digit 0: everything but the middle segment is lit
        for (i, segment) in Segment::ALL.iter().enumerate() {
            let DrawOp::StrokeLine { color, width, .. } = &ops[1 + i] else {
                panic!("expected stroke");
            };
            let expected = if *segment == Middle { OFF } else { ON };
            assert_eq!(color, expected);
            assert_eq!(*width, LINE_WIDTH);
        }

        // Second digit's top segment starts one cell plus spacing to the right
        let DrawOp::StrokeLine { from, .. } = &ops[8] else {
            panic!("expected stroke");
        };
        assert!(close(from.x, 4.0 + 32.0 + 4.0));
        assert!(close(from.y, 40.0 + 2.0));
    }

    #[test]
    fn test_separator_ops() {
        let mut clock = recording_clock();
        clock.draw_clock_at(at(9, 41, 13));
        let DrawOp::FillRect { x, y, w, h, color } = &ops(&clock)[15] else {
            panic!("expected separator fill");
        };
        assert!(close(*x, 70.0));
        assert!(close(*y, 58.0));
        assert_eq!((*w, *h), (LINE_WIDTH, LINE_WIDTH));
        assert_eq!(color, ON);

        let mut clock = recording_clock();
        clock.draw_clock_at(at(9, 41, 14));
        let DrawOp::FillRect { color, .. } = &ops(&clock)[16] else {
            panic!("expected separator fill");
        };
        assert_eq!(color, OFF);
    }

    #[test]
    fn test_minute_digits_follow_separator() {
        let mut clock = recording_clock();
        clock.draw_clock_at(at(9, 41, 13));
        // Third digit is 4: top segment off, upper-left on
        let strokes: Vec<_> = ops(&clock)[17..24]
            .iter()
            .map(|op| match op {
                DrawOp::StrokeLine { color, .. } => color.as_str(),
                _ => panic!("expected stroke"),
            })
            .collect();
        assert_eq!(strokes, [OFF, ON, ON, ON, OFF, ON, OFF]);
    }

    #[test]
    fn test_draw_is_idempotent() {
        let mut clock = SegmentClock::new(PixmapSurface::new(144, 144));
        clock.draw_clock_at(at(12, 34, 56));
        let first = clock.surface().unwrap().pixmap().data().to_vec();
        clock.draw_clock_at(at(12, 34, 56));
        assert_eq!(clock.surface().unwrap().pixmap().data(), &first[..]);
        assert_eq!(clock.get_image_data(), clock.get_image_data());
    }

    #[test]
    fn test_draw_paints_background_and_segments() {
        let mut clock = SegmentClock::new(PixmapSurface::new(144, 144));
        clock.draw_clock_at(at(8, 8, 1));
        let pixmap = clock.surface().unwrap().pixmap();
        let corner = pixmap.pixel(0, 0).unwrap();
        assert_eq!((corner.red(), corner.alpha()), (0x20, 255));
        // Middle of the first digit's top segment
        let lit = pixmap.pixel(14, 42).unwrap();
        assert_eq!(lit.red(), 0xFF);
    }

    #[test]
    fn test_image_data_before_draw_is_blank_png() {
        let clock = SegmentClock::new(PixmapSurface::new(72, 72));
        assert!(clock.get_image_data().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_set_and_reset_colors() {
        let mut clock = recording_clock();
        clock.set_colors(&json!({"lineOn": "#00FF00"}));
        let colors = clock.get_colors();
        assert_eq!(colors["lineOn"], "#00FF00");
        assert_eq!(colors["lineOff"], OFF);
        assert_eq!(colors["background"], "#200000");

        let before = clock.get_colors();
        clock.set_colors(&json!("not an object"));
        assert_eq!(clock.get_colors(), before);

        clock.draw_clock_at(at(11, 11, 11));
        let DrawOp::StrokeLine { color, .. } = &ops(&clock)[3] else {
            panic!("expected stroke");
        };
        assert_eq!(color, "#00FF00");

        clock.reset_colors();
        assert_eq!(
            Value::Object(clock.get_colors()),
            json!({"background": "#200000", "lineOn": ON, "lineOff": OFF})
        );
    }

    #[test]
    fn test_inert_without_surface() {
        let mut clock: SegmentClock<PixmapSurface> = SegmentClock::new(None);
        assert!(clock.is_inert());
        clock.draw_clock();
        clock.set_colors(&json!({"lineOn": "#00FF00"}));
        clock.reset_colors();
        assert_eq!(clock.get_image_data(), "");
        assert!(clock.get_colors().is_empty());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.png");
        clock.save_png(&path).unwrap();
        assert!(!path.exists());
    }
}
