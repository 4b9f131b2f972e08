//! Design-data assembly: locate, classify, serialize.

use crate::classify::{classify, Classification};
use crate::config::CaptureConfig;
use crate::document::{CaptureInfo, DesignData};
use crate::element::DesignElement;
use crate::locate::Locator;
use crate::page::Page;
use crate::template::TemplateResolver;
use crate::VERSION;

/// Produces [`DesignData`] payloads from a page.
///
/// Holds no per-call state, so one assembler can serve any number of
/// concurrent captures.
#[derive(Debug)]
pub struct DesignDataAssembler {
    locator: Locator,
    templates: TemplateResolver,
    system_name: String,
}

impl Default for DesignDataAssembler {
    fn default() -> Self {
        Self::new(&CaptureConfig::default())
    }
}

impl DesignDataAssembler {
    /// Create an assembler with the default locate chain.
    #[must_use]
    pub fn new(config: &CaptureConfig) -> Self {
        Self::with_locator(Locator::from_config(config), config)
    }

    /// Create an assembler with a custom locator.
    #[must_use]
    pub fn with_locator(locator: Locator, config: &CaptureConfig) -> Self {
        Self {
            locator,
            templates: TemplateResolver::from_config(config),
            system_name: config.system_name.clone(),
        }
    }

    /// Capture the current design on `page`.
    ///
    /// Never fails: when no canvas can be found the returned payload has
    /// `error` set, no elements and a `0x0` area.
    #[must_use]
    pub fn generate_design_data(&self, page: &dyn Page) -> DesignData {
        let mut info = CaptureInfo {
            system: self.system_name.clone(),
            version: VERSION.to_string(),
            ..CaptureInfo::default()
        };

        let located = match self.locator.locate(page) {
            Ok(located) => located,
            Err(e) => {
                tracing::warn!("Design data capture failed: {e}");
                return DesignData::failure(self.templates.default_id(), e.to_string(), info);
            }
        };
        info.located_by = Some(located.strategy.clone());

        let objects = located.canvas.objects();
        info.canvas_objects_count = objects.len();
        tracing::debug!("Processing {} canvas objects", objects.len());

        let mut elements = Vec::with_capacity(objects.len());
        for (index, obj) in objects.iter().enumerate() {
            match classify(obj) {
                Classification::Design => {
                    elements.push(DesignElement::from_object(obj, located.origin));
                }
                Classification::Background => {
                    tracing::trace!("Skipping background object {index}");
                    info.skipped_background_count += 1;
                }
                Classification::Excluded => {
                    tracing::trace!("Skipping excluded object {index}");
                    info.skipped_excluded_count += 1;
                }
            }
        }
        info.processed_elements_count = elements.len();

        let data = DesignData {
            template_view_id: self.templates.resolve(page),
            designed_on_area_px: located.area,
            elements,
            error: false,
            message: None,
            capture_info: info,
        };

        tracing::debug!(
            "Design data captured: {}x{}, {} elements, types {:?}",
            data.designed_on_area_px.width,
            data.designed_on_area_px.height,
            data.elements.len(),
            data.type_histogram()
        );
        data
    }
}

/// Capture the current design on `page` with the default configuration.
#[must_use]
pub fn generate_design_data(page: &dyn Page) -> DesignData {
    DesignDataAssembler::default().generate_design_data(page)
}
