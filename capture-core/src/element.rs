//! Design elements - the flattened records sent to the backend.
//!
//! Every element carries the same base geometry (`x`, `y`, `width`, `height`,
//! `scaleX`, `scaleY`, `angle`) next to a type-specific payload selected by
//! its `type` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::classify;
use crate::geometry::{round_px, AreaOrigin, PixelPoint, Point};
use crate::object::CanvasObject;

/// Default paint for fills and text.
pub const DEFAULT_FILL: &str = "#000000";
/// Default font family for text.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Default font size for text, in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Type-specific payload for element types this crate understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// A raster or SVG image.
    Image {
        /// Image source URL or data URI.
        src: String,
        /// Image filters as exported by the canvas library.
        filters: Value,
    },

    /// A text object (`text`, `i-text` or `textbox`).
    #[serde(rename_all = "camelCase")]
    Text {
        /// Text content.
        text: String,
        /// Font family.
        font_family: String,
        /// Font size, rounded to whole pixels.
        font_size: i64,
        /// Fill paint.
        fill: Value,
        /// Font weight.
        font_weight: Value,
        /// Font style.
        font_style: String,
        /// Text alignment.
        text_align: String,
    },

    /// A rectangle, optionally with rounded corners.
    #[serde(rename_all = "camelCase")]
    Rectangle {
        /// Fill paint.
        fill: Value,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
        /// Horizontal corner radius.
        rx: f64,
        /// Vertical corner radius.
        ry: f64,
    },

    /// A circle.
    #[serde(rename_all = "camelCase")]
    Circle {
        /// Radius, rounded.
        radius: i64,
        /// Fill paint.
        fill: Value,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
    },

    /// An ellipse.
    #[serde(rename_all = "camelCase")]
    Ellipse {
        /// Horizontal radius, rounded.
        rx: i64,
        /// Vertical radius, rounded.
        ry: i64,
        /// Fill paint.
        fill: Value,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
    },

    /// A straight line.
    #[serde(rename_all = "camelCase")]
    Line {
        /// Start X, rounded.
        x1: i64,
        /// Start Y, rounded.
        y1: i64,
        /// End X, rounded.
        x2: i64,
        /// End Y, rounded.
        y2: i64,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
    },

    /// A closed polygon.
    #[serde(rename_all = "camelCase")]
    Polygon {
        /// Vertices in the same frame as `x`/`y`, rounded.
        points: Vec<PixelPoint>,
        /// Fill paint.
        fill: Value,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
    },

    /// An open polyline.
    #[serde(rename_all = "camelCase")]
    Polyline {
        /// Vertices in the same frame as `x`/`y`, rounded.
        points: Vec<PixelPoint>,
        /// Fill paint.
        fill: Value,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
    },

    /// A free-form path.
    #[serde(rename_all = "camelCase")]
    Path {
        /// Path commands as exported by the canvas library.
        path: Value,
        /// Fill paint.
        fill: Value,
        /// Stroke paint.
        stroke: Value,
        /// Stroke width.
        stroke_width: f64,
    },

    /// A group of nested elements.
    Group {
        /// Child elements, bottom first.
        objects: Vec<DesignElement>,
    },
}

/// Diagnostic tag carried by pass-through records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalObject {
    /// The type name the canvas library reported, if any.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

/// Record for an object type this crate does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passthrough {
    /// The reported type name, or `unknown`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Diagnostic tag.
    #[serde(rename = "_originalObject")]
    pub original_object: OriginalObject,
}

/// Element payload: a recognized shape or a pass-through record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementKind {
    /// A recognized type.
    Shape(Shape),
    /// An unrecognized type, carried through with base geometry only.
    Passthrough(Passthrough),
}

impl ElementKind {
    /// The `type` value this payload serializes with.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Shape(shape) => match shape {
                Shape::Image { .. } => "image",
                Shape::Text { .. } => "text",
                Shape::Rectangle { .. } => "rectangle",
                Shape::Circle { .. } => "circle",
                Shape::Ellipse { .. } => "ellipse",
                Shape::Line { .. } => "line",
                Shape::Polygon { .. } => "polygon",
                Shape::Polyline { .. } => "polyline",
                Shape::Path { .. } => "path",
                Shape::Group { .. } => "group",
            },
            Self::Passthrough(p) => &p.type_name,
        }
    }
}

/// A serialized design object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    /// Type tag and type-specific payload.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Left edge relative to the design area, rounded.
    pub x: i64,
    /// Top edge relative to the design area, rounded.
    pub y: i64,
    /// Scaled width, rounded.
    pub width: i64,
    /// Scaled height, rounded.
    pub height: i64,
    /// Raw horizontal scale.
    #[serde(rename = "scaleX")]
    pub scale_x: f64,
    /// Raw vertical scale.
    #[serde(rename = "scaleY")]
    pub scale_y: f64,
    /// Raw rotation in degrees.
    pub angle: f64,
}

impl DesignElement {
    /// Serialize one canvas object relative to `origin`.
    ///
    /// Groups recurse into their children. Children are classified like
    /// top-level objects, and are positioned with the identity origin because
    /// the canvas library stores them in group-local coordinates.
    #[must_use]
    pub fn from_object(obj: &CanvasObject, origin: AreaOrigin) -> Self {
        let scale_x = obj.scale_x.unwrap_or(1.0);
        let scale_y = obj.scale_y.unwrap_or(1.0);
        Self {
            kind: element_kind(obj, origin),
            x: round_px(obj.left.unwrap_or(0.0) - origin.x),
            y: round_px(obj.top.unwrap_or(0.0) - origin.y),
            width: round_px(obj.width.unwrap_or(0.0) * scale_x),
            height: round_px(obj.height.unwrap_or(0.0) * scale_y),
            scale_x,
            scale_y,
            angle: obj.angle.unwrap_or(0.0),
        }
    }

    /// The element's `type` value.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Child elements when this is a group.
    #[must_use]
    pub fn children(&self) -> &[DesignElement] {
        match &self.kind {
            ElementKind::Shape(Shape::Group { objects }) => objects,
            _ => &[],
        }
    }
}

/// Serialize an optional object; `None` in, `None` out.
///
/// Classification is the caller's job: this serializes whatever it is given.
#[must_use]
pub fn serialize_object(obj: Option<&CanvasObject>, origin: AreaOrigin) -> Option<DesignElement> {
    obj.map(|o| DesignElement::from_object(o, origin))
}

fn paint(value: Option<&Value>, default: &str) -> Value {
    value
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::String(default.to_string()))
}

fn text_or(value: Option<&String>, default: &str) -> String {
    value.cloned().unwrap_or_else(|| default.to_string())
}

fn shift_points(points: Option<&[Point]>, origin: AreaOrigin) -> Vec<PixelPoint> {
    points
        .unwrap_or_default()
        .iter()
        .map(|p| PixelPoint::new(round_px(p.x - origin.x), round_px(p.y - origin.y)))
        .collect()
}

fn element_kind(obj: &CanvasObject, origin: AreaOrigin) -> ElementKind {
    let fill = || paint(obj.fill.as_ref(), DEFAULT_FILL);
    let stroke = || paint(obj.stroke.as_ref(), "");
    let stroke_width = obj.stroke_width.unwrap_or(0.0);

    let shape = match obj.type_name() {
        Some("image") => Shape::Image {
            src: text_or(obj.src.as_ref(), ""),
            filters: obj
                .filters
                .clone()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        },
        Some("text" | "i-text" | "textbox") => Shape::Text {
            text: text_or(obj.text.as_ref(), ""),
            font_family: text_or(obj.font_family.as_ref(), DEFAULT_FONT_FAMILY),
            font_size: round_px(obj.font_size.unwrap_or(DEFAULT_FONT_SIZE)),
            fill: fill(),
            font_weight: paint(obj.font_weight.as_ref(), "normal"),
            font_style: text_or(obj.font_style.as_ref(), "normal"),
            text_align: text_or(obj.text_align.as_ref(), "left"),
        },
        Some("rect") => Shape::Rectangle {
            fill: fill(),
            stroke: stroke(),
            stroke_width,
            rx: obj.rx.unwrap_or(0.0),
            ry: obj.ry.unwrap_or(0.0),
        },
        Some("circle") => Shape::Circle {
            radius: round_px(obj.radius.unwrap_or(0.0)),
            fill: fill(),
            stroke: stroke(),
            stroke_width,
        },
        Some("ellipse") => Shape::Ellipse {
            rx: round_px(obj.rx.unwrap_or(0.0)),
            ry: round_px(obj.ry.unwrap_or(0.0)),
            fill: fill(),
            stroke: stroke(),
            stroke_width,
        },
        Some("line") => Shape::Line {
            x1: round_px(obj.x1.unwrap_or(0.0) - origin.x),
            y1: round_px(obj.y1.unwrap_or(0.0) - origin.y),
            x2: round_px(obj.x2.unwrap_or(0.0) - origin.x),
            y2: round_px(obj.y2.unwrap_or(0.0) - origin.y),
            stroke: paint(obj.stroke.as_ref(), DEFAULT_FILL),
            stroke_width: obj.stroke_width.unwrap_or(1.0),
        },
        Some("polygon") => Shape::Polygon {
            points: shift_points(obj.points.as_deref(), origin),
            fill: fill(),
            stroke: stroke(),
            stroke_width,
        },
        Some("polyline") => Shape::Polyline {
            points: shift_points(obj.points.as_deref(), origin),
            fill: fill(),
            stroke: stroke(),
            stroke_width,
        },
        Some("path") => Shape::Path {
            path: obj
                .path
                .clone()
                .unwrap_or_else(|| Value::String(String::new())),
            fill: fill(),
            stroke: stroke(),
            stroke_width,
        },
        Some("group") => Shape::Group {
            objects: obj
                .children()
                .iter()
                .filter(|child| classify(child).is_design())
                .map(|child| DesignElement::from_object(child, AreaOrigin::IDENTITY))
                .collect(),
        },
        other => {
            tracing::debug!("Unknown object type: {}", other.unwrap_or("<none>"));
            return ElementKind::Passthrough(Passthrough {
                type_name: other.unwrap_or("unknown").to_string(),
                original_object: OriginalObject {
                    type_name: other.map(str::to_string),
                },
            });
        }
    };
    ElementKind::Shape(shape)
}
