//! Save-request form encoding.

use crate::config::CaptureConfig;
use crate::document::DesignData;
use crate::CaptureResult;

/// AJAX action used when none is configured.
pub const DEFAULT_ACTION: &str = "save_design";

/// A design ready to be posted to the storefront's save endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSubmission {
    /// AJAX action name.
    pub action: String,
    /// Template the design belongs to.
    pub template_id: String,
    /// User-facing design name.
    pub name: String,
    /// Request nonce issued by the storefront.
    pub nonce: String,
    /// Captured payload.
    pub design_data: DesignData,
}

impl DesignSubmission {
    /// Create a submission with the default action.
    #[must_use]
    pub fn new(
        template_id: impl Into<String>,
        name: impl Into<String>,
        nonce: impl Into<String>,
        design_data: DesignData,
    ) -> Self {
        Self {
            action: DEFAULT_ACTION.to_string(),
            template_id: template_id.into(),
            name: name.into(),
            nonce: nonce.into(),
            design_data,
        }
    }

    /// Create a submission for `design_data`, taking the template id from
    /// the payload and the action from `config`.
    #[must_use]
    pub fn from_capture(
        config: &CaptureConfig,
        name: impl Into<String>,
        nonce: impl Into<String>,
        design_data: DesignData,
    ) -> Self {
        let template_id = design_data.template_view_id.clone();
        Self::new(template_id, name, nonce, design_data).with_action(config.ajax_action.clone())
    }

    /// Override the AJAX action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Ordered form fields for a URL-encoded POST body.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn form_fields(&self) -> CaptureResult<Vec<(&'static str, String)>> {
        Ok(vec![
            ("action", self.action.clone()),
            ("nonce", self.nonce.clone()),
            ("template_id", self.template_id.clone()),
            ("name", self.name.clone()),
            ("design_data", self.design_data.to_json()?),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CaptureInfo;

    fn payload() -> DesignData {
        DesignData::failure("4", "No fabric canvas found (tried: none)", CaptureInfo::default())
    }

    #[test]
    fn fields_are_ordered() {
        let submission = DesignSubmission::new("4", "My shirt", "abc123", payload());
        let fields = submission.form_fields().expect("should encode");
        let keys: Vec<_> = fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["action", "nonce", "template_id", "name", "design_data"]);
        assert_eq!(fields[0].1, "save_design");
        assert_eq!(fields[1].1, "abc123");
        assert_eq!(fields[3].1, "My shirt");
    }

    #[test]
    fn design_data_field_round_trips() {
        let data = payload();
        let fields = DesignSubmission::new("4", "n", "x", data.clone())
            .form_fields()
            .expect("should encode");
        let decoded = DesignData::from_json(&fields[4].1).expect("should decode");
        assert_eq!(decoded, data);
    }

    #[test]
    fn from_capture_uses_config_action_and_payload_template() {
        let config = CaptureConfig {
            ajax_action: "yprint_save_design".to_string(),
            ..CaptureConfig::default()
        };
        let submission = DesignSubmission::from_capture(&config, "n", "x", payload());
        assert_eq!(submission.action, "yprint_save_design");
        assert_eq!(submission.template_id, "4");
    }
}
