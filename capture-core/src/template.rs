//! Template view id resolution.

use crate::config::{CaptureConfig, TemplateMarker};
use crate::page::Page;
use crate::selector::parse_list;

/// Resolves which template/view a design belongs to.
///
/// Sources are consulted in order: active DOM markers, URL query parameters,
/// then the configured default. Empty values count as missing.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    markers: Vec<TemplateMarker>,
    query_params: Vec<String>,
    default_id: String,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::from_config(&CaptureConfig::default())
    }
}

impl TemplateResolver {
    /// Build from config; unparsable marker selectors are skipped.
    #[must_use]
    pub fn from_config(config: &CaptureConfig) -> Self {
        let markers = config
            .template_markers
            .iter()
            .filter_map(|marker| match parse_list(&marker.selector) {
                Ok(_) => Some(marker.clone()),
                Err(e) => {
                    tracing::warn!("Ignoring template marker: {e}");
                    None
                }
            })
            .collect();
        Self {
            markers,
            query_params: config.template_query_params.clone(),
            default_id: config.default_template_view_id.clone(),
        }
    }

    /// The id used when the page names none.
    #[must_use]
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Resolve the template view id for `page`.
    #[must_use]
    pub fn resolve(&self, page: &dyn Page) -> String {
        let from_marker = self.markers.iter().find_map(|marker| {
            page.query_selector_all(&marker.selector).into_iter().find_map(|n| {
                n.node
                    .attribute(&marker.attribute)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
        });
        if let Some(id) = from_marker {
            tracing::trace!("Template view id from marker: {id}");
            return id;
        }

        let from_query = self
            .query_params
            .iter()
            .find_map(|name| page.query_param(name).filter(|v| !v.is_empty()));
        if let Some(id) = from_query {
            tracing::trace!("Template view id from query: {id}");
            return id;
        }

        self.default_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{DomNode, PageSnapshot};

    #[test]
    fn active_template_item_wins() {
        let page = PageSnapshot::new()
            .with_location("?template_id=99")
            .with_node(DomNode::new("li").with_attribute("data-template-id", "5"))
            .with_node(
                DomNode::new("li")
                    .with_class("template-item")
                    .with_class("active")
                    .with_attribute("data-template-id", "7"),
            );
        assert_eq!(TemplateResolver::default().resolve(&page), "7");
    }

    #[test]
    fn any_data_template_id_beats_query() {
        let page = PageSnapshot::new()
            .with_location("?template_id=99")
            .with_node(DomNode::new("div").with_attribute("data-template-id", "5"));
        assert_eq!(TemplateResolver::default().resolve(&page), "5");
    }

    #[test]
    fn hidden_input_value() {
        let page = PageSnapshot::new().with_node(
            DomNode::new("input")
                .with_attribute("name", "template_view_id")
                .with_attribute("value", "3-front"),
        );
        assert_eq!(TemplateResolver::default().resolve(&page), "3-front");
    }

    #[test]
    fn empty_marker_falls_through_to_query() {
        let page = PageSnapshot::new()
            .with_location("https://shop.test/?post=&template_id=42")
            .with_node(DomNode::new("div").with_attribute("data-template-id", ""));
        assert_eq!(TemplateResolver::default().resolve(&page), "42");
    }

    #[test]
    fn default_when_nothing_matches() {
        let resolver = TemplateResolver::default();
        assert_eq!(resolver.resolve(&PageSnapshot::new()), "1");
        assert_eq!(resolver.default_id(), "1");

        let config = CaptureConfig::default().with_default_template_view_id("front");
        assert_eq!(
            TemplateResolver::from_config(&config).resolve(&PageSnapshot::new()),
            "front"
        );
    }
}
