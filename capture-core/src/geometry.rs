//! Page-space geometry shared by the locator and the serializer.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// A bounding client rect, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub left: f64,
    /// Top edge.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub top: f64,
    /// Width.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub width: f64,
    /// Height.
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub height: f64,
}

impl Rect {
    /// Create a rect from its edges and size.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A 2D point as stored on polygon/polyline objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    #[serde(default)]
    pub x: f64,
    /// Y coordinate.
    #[serde(default)]
    pub y: f64,
}

/// A vertex in whole pixels, as emitted in the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

impl PixelPoint {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// The design area's top-left corner expressed in canvas coordinates.
///
/// Serialized elements are positioned relative to this origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaOrigin {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

impl AreaOrigin {
    /// The identity origin.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0 };

    /// Create an origin.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin of `area` as seen from a canvas drawn at `canvas`.
    #[must_use]
    pub fn between(area: &Rect, canvas: &Rect) -> Self {
        Self {
            x: area.left - canvas.left,
            y: area.top - canvas.top,
        }
    }
}

/// Integer pixel size of the area the design was made on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSize {
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
}

impl AreaSize {
    /// Create a size.
    #[must_use]
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Round a rect's size to whole pixels.
    #[must_use]
    pub fn of_rect(rect: &Rect) -> Self {
        Self {
            width: round_px(rect.width),
            height: round_px(rect.height),
        }
    }
}

/// Round to a whole pixel, halves towards positive infinity.
///
/// Non-finite input rounds to 0; out-of-range values saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_px(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_between_letterboxed_canvas() {
        let area = Rect::new(10.0, 20.0, 500.0, 500.0);
        let canvas = Rect::new(60.0, 50.0, 400.0, 400.0);
        let origin = AreaOrigin::between(&area, &canvas);
        assert!((origin.x + 50.0).abs() < f64::EPSILON);
        assert!((origin.y + 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn round_px_handles_non_finite() {
        assert_eq!(round_px(2.5), 3);
        assert_eq!(round_px(-2.5), -2);
        assert_eq!(round_px(-2.6), -3);
        assert_eq!(round_px(f64::NAN), 0);
        assert_eq!(round_px(f64::INFINITY), 0);
    }

    #[test]
    fn rect_reads_numeric_strings() {
        let rect: Rect =
            serde_json::from_str(r#"{"left":"10","top":20.5,"width":"wide","height":null}"#)
                .expect("should parse leniently");
        assert_eq!(rect, Rect::new(10.0, 20.5, 0.0, 0.0));
    }

    #[test]
    fn area_size_rounds_rect() {
        let size = AreaSize::of_rect(&Rect::new(0.0, 0.0, 499.6, 300.4));
        assert_eq!(size, AreaSize::new(500, 300));
    }
}
