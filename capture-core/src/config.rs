//! Capture configuration.
//!
//! Every DOM selector, global name and fallback the capture path consults
//! lives here, so deployments with a different theme markup can adjust
//! discovery without touching the pipeline.

use serde::{Deserialize, Serialize};

use crate::geometry::AreaSize;
use crate::selector::parse_list;
use crate::{CaptureError, CaptureResult};

/// How canvas coordinates are mapped into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformPolicy {
    /// Positions are relative to the design-area container's top-left corner.
    #[default]
    AreaRelative,
    /// Positions are raw canvas coordinates.
    Direct,
}

/// Where to read a template view id from on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMarker {
    /// Selector for the marker element.
    pub selector: String,
    /// Attribute holding the id.
    pub attribute: String,
}

impl TemplateMarker {
    /// Create a marker source.
    #[must_use]
    pub fn new(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attribute: attribute.into(),
        }
    }
}

/// Configuration for design-data capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Global names tried, in order, for a registered canvas.
    pub global_canvas_names: Vec<String>,
    /// Containers whose `<canvas>` descendants count as the designer's own.
    pub designer_container_selector: String,
    /// Design-area container selectors, in priority order.
    pub design_area_selectors: Vec<String>,
    /// Template view id markers, in priority order.
    pub template_markers: Vec<TemplateMarker>,
    /// URL query parameters consulted for the template view id, in order.
    pub template_query_params: Vec<String>,
    /// Template view id used when nothing on the page names one.
    pub default_template_view_id: String,
    /// Area size used when neither a container nor canvas size is known.
    pub fallback_area: AreaSize,
    /// Coordinate mapping.
    pub transform_policy: TransformPolicy,
    /// System name reported in `capture_info`.
    pub system_name: String,
    /// AJAX action name sent with a design submission.
    pub ajax_action: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            global_canvas_names: [
                "designerWidgetInstance",
                "fabricCanvas",
                "canvas",
                "designerCanvas",
                "mainCanvas",
            ]
            .map(String::from)
            .to_vec(),
            designer_container_selector:
                ".octo-print-designer, .designer-canvas-container, .canvas-container".to_string(),
            design_area_selectors: [
                "#mockup_design_area",
                ".mockup_design_area",
                ".mockup-design-area",
                "[data-mockup-area]",
                ".designer-canvas-container",
                ".canvas-container",
            ]
            .map(String::from)
            .to_vec(),
            template_markers: vec![
                TemplateMarker::new(".template-item.active", "data-template-id"),
                TemplateMarker::new("[data-template-id].active", "data-template-id"),
                TemplateMarker::new("[data-template-id]", "data-template-id"),
                TemplateMarker::new(r#"input[name="template_view_id"]"#, "value"),
            ],
            template_query_params: ["template_view_id", "template_id", "post"]
                .map(String::from)
                .to_vec(),
            default_template_view_id: "1".to_string(),
            fallback_area: AreaSize::new(800, 600),
            transform_policy: TransformPolicy::AreaRelative,
            system_name: "YPrintCoordinateCapture".to_string(),
            ajax_action: crate::submission::DEFAULT_ACTION.to_string(),
        }
    }
}

impl CaptureConfig {
    /// Parse a config from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the resulting config
    /// fails [`CaptureConfig::validate`].
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the coordinate mapping.
    #[must_use]
    pub fn with_transform_policy(mut self, policy: TransformPolicy) -> Self {
        self.transform_policy = policy;
        self
    }

    /// Set the default template view id.
    #[must_use]
    pub fn with_default_template_view_id(mut self, id: impl Into<String>) -> Self {
        self.default_template_view_id = id.into();
        self
    }

    /// Replace the design-area selectors.
    #[must_use]
    pub fn with_design_area_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.design_area_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the global canvas names.
    #[must_use]
    pub fn with_global_canvas_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_canvas_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Check that every selector parses and the fallbacks are usable.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidSelector`] for an unparsable selector and
    /// [`CaptureError::InvalidConfig`] for a negative fallback size, an
    /// empty default template view id or an empty AJAX action.
    pub fn validate(&self) -> CaptureResult<()> {
        parse_list(&self.designer_container_selector)?;
        for selector in &self.design_area_selectors {
            parse_list(selector)?;
        }
        for marker in &self.template_markers {
            parse_list(&marker.selector)?;
        }
        if self.fallback_area.width < 0 || self.fallback_area.height < 0 {
            return Err(CaptureError::InvalidConfig(format!(
                "fallback_area must be non-negative, got {}x{}",
                self.fallback_area.width, self.fallback_area.height
            )));
        }
        if self.default_template_view_id.is_empty() {
            return Err(CaptureError::InvalidConfig(
                "default_template_view_id must not be empty".to_string(),
            ));
        }
        if self.ajax_action.is_empty() {
            return Err(CaptureError::InvalidConfig(
                "ajax_action must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
