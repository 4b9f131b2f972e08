//! WebAssembly bindings for capture-core.
//!
//! The page-side glue serializes the designer's state into a
//! [`PageSnapshot`] JSON document and hands it to [`WasmCapture`].

use wasm_bindgen::prelude::*;

use crate::{classify, CanvasObject, CaptureConfig, DesignDataAssembler, PageSnapshot};

/// Initialize the capture WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Capture instance for WASM.
#[wasm_bindgen]
pub struct WasmCapture {
    assembler: DesignDataAssembler,
}

impl Default for WasmCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmCapture {
    /// Create a capture instance with the default configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            assembler: DesignDataAssembler::default(),
        }
    }

    /// Create a capture instance from a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error string if the config is malformed or invalid.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmCapture, String> {
        let config = CaptureConfig::from_json(config_json).map_err(|e| e.to_string())?;
        Ok(Self {
            assembler: DesignDataAssembler::new(&config),
        })
    }

    /// Capture design data from a page snapshot and return it as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the snapshot cannot be parsed.
    #[wasm_bindgen(js_name = generateDesignData)]
    pub fn generate_design_data(&self, page_json: &str) -> Result<String, String> {
        let page = PageSnapshot::from_json(page_json).map_err(|e| e.to_string())?;
        self.assembler
            .generate_design_data(&page)
            .to_json()
            .map_err(|e| e.to_string())
    }

    /// Classify a single fabric object: `design`, `background` or `excluded`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the object JSON is malformed.
    #[wasm_bindgen(js_name = classifyObject)]
    pub fn classify_object(&self, object_json: &str) -> Result<String, String> {
        let obj = CanvasObject::from_json(object_json).map_err(|e| e.to_string())?;
        Ok(classify(&obj).as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_payload_from_snapshot() {
        let capture = WasmCapture::new();
        let json = capture
            .generate_design_data(
                r#"{"globals":{"fabricCanvas":{"width":300,"height":200,"objects":[{"type":"rect","left":5,"top":6}]}}}"#,
            )
            .expect("should capture");
        assert!(json.contains(r#""type":"rectangle""#));
        assert!(!json.contains(r#""error""#));
    }

    #[test]
    fn classifies_objects() {
        let capture = WasmCapture::new();
        assert_eq!(
            capture
                .classify_object(r#"{"type":"image","isViewImage":true}"#)
                .expect("should classify"),
            "background"
        );
        assert!(capture.classify_object("not json").is_err());
    }

    #[test]
    fn rejects_bad_config() {
        assert!(WasmCapture::with_config(r#"{"design_area_selectors":[".a,"]}"#).is_err());
    }
}
