//! The design-data payload posted to the backend as `design_data`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::DesignElement;
use crate::geometry::AreaSize;
use crate::CaptureResult;

/// Deterministic facts about how a payload was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureInfo {
    /// Name of the capture system.
    pub system: String,
    /// Crate version.
    pub version: String,
    /// Locate strategy that found the canvas, if one did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub located_by: Option<String>,
    /// Objects on the canvas, top level only.
    #[serde(default)]
    pub canvas_objects_count: usize,
    /// Elements in the payload, top level only.
    #[serde(default)]
    pub processed_elements_count: usize,
    /// Top-level objects skipped as background.
    #[serde(default)]
    pub skipped_background_count: usize,
    /// Top-level objects skipped as excluded.
    #[serde(default)]
    pub skipped_excluded_count: usize,
}

/// Canonical design-data payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignData {
    /// Template/view the design was made on.
    pub template_view_id: String,
    /// Size of the design area the coordinates refer to.
    pub designed_on_area_px: AreaSize,
    /// Design elements in stacking order, bottom first.
    pub elements: Vec<DesignElement>,
    /// Set when capture failed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    /// Diagnostic message accompanying `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Capture diagnostics.
    #[serde(default)]
    pub capture_info: CaptureInfo,
}

impl DesignData {
    /// Build the error-shaped payload returned when no canvas is found.
    #[must_use]
    pub fn failure(
        template_view_id: impl Into<String>,
        message: impl Into<String>,
        capture_info: CaptureInfo,
    ) -> Self {
        Self {
            template_view_id: template_view_id.into(),
            designed_on_area_px: AreaSize::default(),
            elements: Vec::new(),
            error: true,
            message: Some(message.into()),
            capture_info,
        }
    }

    /// Whether capture failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error
    }

    /// Count of top-level elements per `type`.
    #[must_use]
    pub fn type_histogram(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for element in &self.elements {
            *counts.entry(element.type_name()).or_insert(0) += 1;
        }
        counts
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CaptureResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a design-data payload.
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AreaOrigin;
    use crate::object::CanvasObject;

    fn sample() -> DesignData {
        let origin = AreaOrigin::IDENTITY;
        DesignData {
            template_view_id: "12".to_string(),
            designed_on_area_px: AreaSize::new(500, 400),
            elements: vec![
                DesignElement::from_object(&CanvasObject::new("image"), origin),
                DesignElement::from_object(&CanvasObject::new("i-text"), origin),
                DesignElement::from_object(&CanvasObject::new("text"), origin),
            ],
            error: false,
            message: None,
            capture_info: CaptureInfo::default(),
        }
    }

    #[test]
    fn success_payload_omits_error_fields() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert!(value.get("error").is_none());
        assert!(value.get("message").is_none());
        assert_eq!(value["designed_on_area_px"]["width"], 500);
        assert_eq!(value["template_view_id"], "12");
    }

    #[test]
    fn failure_payload_shape() {
        let data = DesignData::failure("1", "No fabric canvas found", CaptureInfo::default());
        let value = serde_json::to_value(&data).expect("serialize");
        assert_eq!(value["error"], true);
        assert_eq!(value["elements"], serde_json::json!([]));
        assert_eq!(value["designed_on_area_px"]["width"], 0);
        assert_eq!(value["designed_on_area_px"]["height"], 0);
        assert!(data.is_error());
    }

    #[test]
    fn histogram_counts_types() {
        let doc = sample();
        let histogram = doc.type_histogram();
        assert_eq!(histogram.get("text"), Some(&2));
        assert_eq!(histogram.get("image"), Some(&1));
    }

    #[test]
    fn json_roundtrip() {
        let data = sample();
        let json = data.to_json().expect("serialize");
        let back = DesignData::from_json(&json).expect("deserialize");
        assert_eq!(back, data);
    }
}
