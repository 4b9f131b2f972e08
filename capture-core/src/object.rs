//! Canvas objects as the canvas library exports them.
//!
//! These types mirror fabric.js `toObject()` output (camelCase keys). They are
//! read-only inputs: nothing in this crate mutates a [`CanvasObject`].
//!
//! Deserialization is deliberately forgiving. A field holding the wrong JSON
//! type is read as missing instead of failing the whole canvas, so one
//! malformed object never prevents the rest from being captured.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::Point;
use crate::lenient;
use crate::CaptureResult;

/// Explicit role tag attached by the code that builds canvas objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectRole {
    /// User design content.
    Design,
    /// Template or mockup art behind the design.
    Background,
    /// Internal marker (safe zones, guides, handles).
    System,
}

/// A single graphic primitive on a canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    /// Primitive type name (`rect`, `i-text`, `image`, ...).
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub object_type: Option<String>,

    /// Left edge in canvas pixels.
    #[serde(default, deserialize_with = "lenient::number")]
    pub left: Option<f64>,
    /// Top edge in canvas pixels.
    #[serde(default, deserialize_with = "lenient::number")]
    pub top: Option<f64>,
    /// Unscaled width.
    #[serde(default, deserialize_with = "lenient::number")]
    pub width: Option<f64>,
    /// Unscaled height.
    #[serde(default, deserialize_with = "lenient::number")]
    pub height: Option<f64>,
    /// Horizontal scale factor.
    #[serde(default, deserialize_with = "lenient::number")]
    pub scale_x: Option<f64>,
    /// Vertical scale factor.
    #[serde(default, deserialize_with = "lenient::number")]
    pub scale_y: Option<f64>,
    /// Rotation in degrees.
    #[serde(default, deserialize_with = "lenient::number")]
    pub angle: Option<f64>,

    /// Visibility flag.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub visible: Option<bool>,
    /// Set on objects the canvas library must never export.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub exclude_from_export: Option<bool>,
    /// Set on the product view image behind the design.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_view_image: Option<bool>,
    /// Set on template background art.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_template_background: Option<bool>,
    /// Generic background flag.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_background: Option<bool>,
    /// Explicit role, when the creating code attached one.
    #[serde(default, deserialize_with = "lenient::value")]
    pub role: Option<ObjectRole>,

    /// Image source URL or data URI.
    #[serde(default, deserialize_with = "lenient::string")]
    pub src: Option<String>,
    /// Image filters, passed through untouched.
    #[serde(default)]
    pub filters: Option<Value>,

    /// Text content.
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: Option<String>,
    /// Font family.
    #[serde(default, deserialize_with = "lenient::string")]
    pub font_family: Option<String>,
    /// Font size in pixels.
    #[serde(default, deserialize_with = "lenient::number")]
    pub font_size: Option<f64>,
    /// Font weight (`"bold"` or a number such as `700`).
    #[serde(default)]
    pub font_weight: Option<Value>,
    /// Font style.
    #[serde(default, deserialize_with = "lenient::string")]
    pub font_style: Option<String>,
    /// Text alignment.
    #[serde(default, deserialize_with = "lenient::string")]
    pub text_align: Option<String>,

    /// Fill paint: a color string or a gradient/pattern object.
    #[serde(default)]
    pub fill: Option<Value>,
    /// Stroke paint.
    #[serde(default)]
    pub stroke: Option<Value>,
    /// Stroke width.
    #[serde(default, deserialize_with = "lenient::number")]
    pub stroke_width: Option<f64>,
    /// Horizontal corner/ellipse radius.
    #[serde(default, deserialize_with = "lenient::number")]
    pub rx: Option<f64>,
    /// Vertical corner/ellipse radius.
    #[serde(default, deserialize_with = "lenient::number")]
    pub ry: Option<f64>,
    /// Circle radius.
    #[serde(default, deserialize_with = "lenient::number")]
    pub radius: Option<f64>,

    /// Line start X.
    #[serde(default, deserialize_with = "lenient::number")]
    pub x1: Option<f64>,
    /// Line start Y.
    #[serde(default, deserialize_with = "lenient::number")]
    pub y1: Option<f64>,
    /// Line end X.
    #[serde(default, deserialize_with = "lenient::number")]
    pub x2: Option<f64>,
    /// Line end Y.
    #[serde(default, deserialize_with = "lenient::number")]
    pub y2: Option<f64>,

    /// Polygon/polyline vertices.
    #[serde(default, deserialize_with = "lenient::points")]
    pub points: Option<Vec<Point>>,
    /// Path command list.
    #[serde(default)]
    pub path: Option<Value>,

    /// Children of a group, bottom first.
    #[serde(default, deserialize_with = "lenient::list")]
    pub objects: Vec<CanvasObject>,
}

impl CanvasObject {
    /// Create an object of the given primitive type.
    #[must_use]
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: Some(object_type.into()),
            ..Self::default()
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, left: f64, top: f64) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
    }

    /// Set the unscaled size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the scale factors.
    #[must_use]
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = Some(scale_x);
        self.scale_y = Some(scale_y);
        self
    }

    /// Set the explicit role.
    #[must_use]
    pub fn with_role(mut self, role: ObjectRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Append a child (for groups).
    #[must_use]
    pub fn with_child(mut self, child: CanvasObject) -> Self {
        self.objects.push(child);
        self
    }

    /// The primitive type name, if any.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    /// Children of a group, bottom first. Empty for non-groups.
    #[must_use]
    pub fn children(&self) -> &[CanvasObject] {
        &self.objects
    }

    /// Parse a single object from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object.
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A canvas-library instance attached to a `<canvas>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FabricCanvas {
    /// Backing-store width in pixels.
    #[serde(default, deserialize_with = "lenient::number")]
    pub width: Option<f64>,
    /// Backing-store height in pixels.
    #[serde(default, deserialize_with = "lenient::number")]
    pub height: Option<f64>,
    /// DOM id of the `<canvas>` node this instance draws into.
    #[serde(default, deserialize_with = "lenient::string")]
    pub element: Option<String>,
    /// Objects in stacking order, bottom first.
    #[serde(default, deserialize_with = "lenient::list")]
    pub objects: Vec<CanvasObject>,
}

impl FabricCanvas {
    /// Create an empty canvas of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            element: None,
            objects: Vec::new(),
        }
    }

    /// Add an object on top of the stack.
    #[must_use]
    pub fn with_object(mut self, object: CanvasObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Bind to a `<canvas>` node id.
    #[must_use]
    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.element = Some(id.into());
        self
    }

    /// All objects in native stacking order.
    #[must_use]
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    /// Parse a canvas from its JSON export.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object.
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
