//! CSS selector matching over page snapshots.
//!
//! Parsing and matching are done by `simplecss`; this module adapts
//! [`NodeRef`] to its [`Element`] trait and handles comma-separated lists,
//! which `simplecss` stops at.

use simplecss::{AttributeOperator, Element, PseudoClass, Selector};

use crate::page::NodeRef;
use crate::{CaptureError, CaptureResult};

/// Parse a comma-separated selector list.
///
/// # Errors
///
/// Returns [`CaptureError::InvalidSelector`] if the list or any entry in it
/// is empty or cannot be parsed.
pub fn parse_list(source: &str) -> CaptureResult<Vec<Selector<'_>>> {
    source
        .split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid(source, "empty selector"));
            }
            Selector::parse(part).ok_or_else(|| invalid(source, part))
        })
        .collect()
}

/// Parse a selector list, logging and matching nothing when it is invalid.
pub(crate) fn parse_logged(source: &str) -> Vec<Selector<'_>> {
    parse_list(source).unwrap_or_else(|e| {
        tracing::warn!("Ignoring selector: {e}");
        Vec::new()
    })
}

/// Whether `node` matches any selector in `selectors`.
#[must_use]
pub fn matches_any(selectors: &[Selector<'_>], node: &NodeRef<'_>) -> bool {
    selectors.iter().any(|selector| selector.matches(node))
}

fn invalid(source: &str, part: &str) -> CaptureError {
    CaptureError::InvalidSelector(format!("{source:?}: cannot parse {part:?}"))
}

impl Element for NodeRef<'_> {
    fn parent_element(&self) -> Option<Self> {
        let (parent, rest) = self.ancestors.split_last()?;
        Some(NodeRef {
            node: parent,
            ancestors: rest.to_vec(),
        })
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let parent = self.ancestors.last()?;
        let index = parent
            .children
            .iter()
            .position(|child| std::ptr::eq(child, self.node))?;
        let previous = parent.children.get(index.checked_sub(1)?)?;
        Some(NodeRef {
            node: previous,
            ancestors: self.ancestors.clone(),
        })
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.node.tag.eq_ignore_ascii_case(local_name)
    }

    fn attribute_matches(&self, local_name: &str, operator: AttributeOperator) -> bool {
        match local_name {
            "class" if !self.node.classes.is_empty() => {
                operator.matches(&self.node.classes.join(" "))
            }
            _ => self
                .node
                .attribute(local_name)
                .is_some_and(|value| operator.matches(value)),
        }
    }

    fn pseudo_class_matches(&self, class: PseudoClass) -> bool {
        match class {
            PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // A snapshot carries no interaction or history state.
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{DomNode, Page, PageSnapshot};

    fn page() -> PageSnapshot {
        PageSnapshot::new().with_node(
            DomNode::new("div")
                .with_class("octo-print-designer")
                .with_child(
                    DomNode::new("section").with_child(
                        DomNode::new("div")
                            .with_class("canvas-wrapper")
                            .with_class("active"),
                    ),
                )
                .with_child(
                    DomNode::new("input")
                        .with_class("hidden")
                        .with_attribute("name", "template_view_id"),
                ),
        )
    }

    fn count(page: &PageSnapshot, selector: &str) -> usize {
        page.query_selector_all(selector).len()
    }

    #[test]
    fn matches_id_class_and_attributes() {
        let page = page();
        assert_eq!(count(&page, r#"input.hidden[name="template_view_id"]"#), 1);
        assert_eq!(count(&page, "input[name=other]"), 0);
        assert_eq!(count(&page, "[name]"), 1);

        let page = PageSnapshot::new().with_node(DomNode::new("div").with_id("mockup_design_area"));
        assert_eq!(count(&page, "#mockup_design_area"), 1);
    }

    #[test]
    fn compound_requires_every_class() {
        let page = page();
        assert_eq!(count(&page, ".canvas-wrapper.active"), 1);
        assert_eq!(count(&page, ".canvas-wrapper.selected"), 0);
    }

    #[test]
    fn combinators_walk_ancestors() {
        let page = page();
        assert_eq!(count(&page, ".octo-print-designer .canvas-wrapper"), 1);
        assert_eq!(count(&page, ".octo-print-designer > .canvas-wrapper"), 0);
        assert_eq!(count(&page, "section > .canvas-wrapper"), 1);
        assert_eq!(count(&page, "section + input"), 1);
        assert_eq!(count(&page, "input:first-child"), 0);
    }

    #[test]
    fn comma_list_matches_any() {
        let page = page();
        assert_eq!(count(&page, ".nope, .canvas-wrapper"), 1);
        assert_eq!(count(&page, "section, input"), 2);
    }

    #[test]
    fn rejects_unparsable_lists() {
        assert!(parse_list("").is_err());
        assert!(parse_list(".a,").is_err());
        assert!(parse_list("[name").is_err());
        assert!(parse_list(".template-item.active, [data-template-id]").is_ok());
    }

    #[test]
    fn invalid_list_matches_nothing() {
        assert_eq!(count(&page(), ".a,"), 0);
    }
}
