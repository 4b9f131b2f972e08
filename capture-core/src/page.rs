//! The page the designer runs in, as the capture core sees it.
//!
//! [`Page`] is the seam between the pure capture logic and the browser. The
//! storefront shim serializes `document`/`window` state into a
//! [`PageSnapshot`]; tests build snapshots directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use simplecss::Element;
use url::Url;

use crate::geometry::Rect;
use crate::lenient;
use crate::object::FabricCanvas;
use crate::selector::{matches_any, parse_logged};
use crate::CaptureResult;

/// A DOM node together with its ancestors, outermost first.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    /// The node.
    pub node: &'a DomNode,
    /// Ancestors from the document root down to the direct parent.
    pub ancestors: Vec<&'a DomNode>,
}

impl NodeRef<'_> {
    /// Whether the node matches any entry of the selector list.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        matches_any(&parse_logged(selector), self)
    }

    /// Whether the node or any ancestor matches the selector list (DOM `closest`).
    #[must_use]
    pub fn has_closest(&self, selector: &str) -> bool {
        let selectors = parse_logged(selector);
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if matches_any(&selectors, &node) {
                return true;
            }
            current = node.parent_element();
        }
        false
    }

    /// Whether `other` is this node or one of its ancestors.
    #[must_use]
    pub fn is_within(&self, other: &DomNode) -> bool {
        std::ptr::eq(self.node, other) || self.ancestors.iter().any(|a| std::ptr::eq(*a, other))
    }

    /// Whether both nodes hang off the same parent (or both sit at the top level).
    #[must_use]
    pub fn is_sibling_of(&self, other: &NodeRef<'_>) -> bool {
        match (self.ancestors.last(), other.ancestors.last()) {
            (Some(a), Some(b)) => std::ptr::eq(*a, *b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Read access to the page hosting the designer.
pub trait Page {
    /// The designer instance handed over by the designer's ready event.
    fn designer(&self) -> Option<&DesignerInstance>;

    /// A canvas previously registered under a global name.
    fn global_canvas(&self, name: &str) -> Option<&FabricCanvas>;

    /// Every element node in document order.
    fn nodes(&self) -> Vec<NodeRef<'_>>;

    /// Value of a query parameter in the page URL.
    fn query_param(&self, name: &str) -> Option<String>;

    /// First node matching the selector list, in document order.
    ///
    /// An unparsable list matches nothing.
    fn query_selector(&self, selector: &str) -> Option<NodeRef<'_>> {
        let selectors = parse_logged(selector);
        self.nodes()
            .into_iter()
            .find(|n| matches_any(&selectors, n))
    }

    /// All nodes matching the selector list, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<NodeRef<'_>> {
        let selectors = parse_logged(selector);
        self.nodes()
            .into_iter()
            .filter(|n| matches_any(&selectors, n))
            .collect()
    }

    /// Node with the given id.
    fn element_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.nodes()
            .into_iter()
            .find(|n| n.node.id.as_deref() == Some(id))
    }
}

/// A designer widget instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignerInstance {
    /// Canvas exposed as `fabricCanvas`.
    #[serde(default, deserialize_with = "lenient::canvas")]
    pub fabric_canvas: Option<FabricCanvas>,
    /// Canvas exposed as `canvas`.
    #[serde(default, deserialize_with = "lenient::canvas")]
    pub canvas: Option<FabricCanvas>,
}

impl DesignerInstance {
    /// Wrap a canvas as the designer's `fabricCanvas`.
    #[must_use]
    pub fn with_canvas(canvas: FabricCanvas) -> Self {
        Self {
            fabric_canvas: Some(canvas),
            canvas: None,
        }
    }

    /// The designer's canvas, preferring `fabricCanvas`.
    #[must_use]
    pub fn canvas(&self) -> Option<&FabricCanvas> {
        self.fabric_canvas.as_ref().or(self.canvas.as_ref())
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    /// Lowercase tag name.
    #[serde(default = "DomNode::default_tag")]
    pub tag: String,
    /// Element id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Class list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Attributes, including `data-*` and `value`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// `getBoundingClientRect()` result.
    #[serde(
        default,
        deserialize_with = "lenient::value",
        skip_serializing_if = "Option::is_none"
    )]
    pub rect: Option<Rect>,
    /// Canvas-library instance attached to a `<canvas>` node.
    #[serde(
        default,
        deserialize_with = "lenient::canvas",
        skip_serializing_if = "Option::is_none"
    )]
    pub fabric: Option<FabricCanvas>,
    /// Child elements.
    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<DomNode>,
}

impl DomNode {
    fn default_tag() -> String {
        "div".to_string()
    }

    /// Create a node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            rect: None,
            fabric: None,
            children: Vec::new(),
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the bounding rect.
    #[must_use]
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Attach a canvas-library instance.
    #[must_use]
    pub fn with_fabric(mut self, canvas: FabricCanvas) -> Self {
        self.fabric = Some(canvas);
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value, if present; `id` reads the id field.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            _ => self.attributes.get(name).map(String::as_str),
        }
    }
}

/// A serialized view of the page, built by the storefront shim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Designer instance from the ready event.
    #[serde(
        default,
        deserialize_with = "lenient::value",
        skip_serializing_if = "Option::is_none"
    )]
    pub designer: Option<DesignerInstance>,
    /// Canvases reachable through `window` globals.
    #[serde(
        default,
        deserialize_with = "registry",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub globals: BTreeMap<String, FabricCanvas>,
    /// Top-level element nodes (children of `<body>`).
    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub document: Vec<DomNode>,
    /// `window.location.href`, or just its search part.
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
}

impl PageSnapshot {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the designer instance.
    #[must_use]
    pub fn with_designer(mut self, designer: DesignerInstance) -> Self {
        self.designer = Some(designer);
        self
    }

    /// Register a global canvas.
    #[must_use]
    pub fn with_global(mut self, name: impl Into<String>, canvas: FabricCanvas) -> Self {
        self.globals.insert(name.into(), canvas);
        self
    }

    /// Append a top-level node.
    #[must_use]
    pub fn with_node(mut self, node: DomNode) -> Self {
        self.document.push(node);
        self
    }

    /// Set the page location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or not a snapshot object.
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn url(&self) -> Option<Url> {
        let location = self.location.as_deref()?;
        Url::parse(location)
            .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(location)))
            .ok()
    }
}

impl Page for PageSnapshot {
    fn designer(&self) -> Option<&DesignerInstance> {
        self.designer.as_ref()
    }

    fn global_canvas(&self, name: &str) -> Option<&FabricCanvas> {
        self.globals.get(name)
    }

    fn nodes(&self) -> Vec<NodeRef<'_>> {
        fn walk<'a>(
            node: &'a DomNode,
            ancestors: &mut Vec<&'a DomNode>,
            out: &mut Vec<NodeRef<'a>>,
        ) {
            out.push(NodeRef {
                node,
                ancestors: ancestors.clone(),
            });
            ancestors.push(node);
            for child in &node.children {
                walk(child, ancestors, out);
            }
            ancestors.pop();
        }

        let mut out = Vec::new();
        let mut ancestors = Vec::new();
        for root in &self.document {
            walk(root, &mut ancestors, &mut out);
        }
        out
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.url()?
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Keep only globals that expose canvas objects, unwrapping designer widgets.
fn registry<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, FabricCanvas>, D::Error> {
    let raw = BTreeMap::<String, Value>::deserialize(d)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| {
            let candidate = ["fabricCanvas", "canvas"]
                .iter()
                .find_map(|key| value.get(key).filter(|v| v.get("objects").is_some()))
                .unwrap_or(&value);
            if !candidate.get("objects").is_some_and(Value::is_array) {
                return None;
            }
            let canvas = serde_json::from_value(candidate.clone()).ok()?;
            Some((name, canvas))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> PageSnapshot {
        PageSnapshot::new().with_node(
            DomNode::new("div")
                .with_class("octo-print-designer")
                .with_child(
                    DomNode::new("div")
                        .with_id("mockup_design_area")
                        .with_child(DomNode::new("canvas").with_id("c1")),
                ),
        )
    }

    #[test]
    fn nodes_are_in_document_order_with_ancestors() {
        let page = sample_page();
        let nodes = page.nodes();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].node.tag, "canvas");
        assert_eq!(nodes[2].ancestors.len(), 2);
        assert_eq!(nodes[2].ancestors[1].id.as_deref(), Some("mockup_design_area"));
    }

    #[test]
    fn closest_finds_ancestor() {
        let page = sample_page();
        let canvas = page.element_by_id("c1").expect("canvas present");
        assert!(canvas.has_closest(".octo-print-designer"));
        assert!(canvas.has_closest(".nope, #mockup_design_area"));
        assert!(!canvas.has_closest(".designer-workspace"));
    }

    #[test]
    fn query_params_from_href_or_search() {
        let page = PageSnapshot::new()
            .with_location("https://shop.test/designer?template_id=42&x=a%20b");
        assert_eq!(page.query_param("template_id").as_deref(), Some("42"));
        assert_eq!(page.query_param("x").as_deref(), Some("a b"));
        assert_eq!(page.query_param("missing"), None);

        let page = PageSnapshot::new().with_location("?post=7");
        assert_eq!(page.query_param("post").as_deref(), Some("7"));
    }

    #[test]
    fn globals_keep_only_canvas_like_values() {
        let page: PageSnapshot = serde_json::from_value(json!({
            "globals": {
                "fabricCanvas": {"width": 400, "objects": []},
                "designerWidgetInstance": {"fabricCanvas": {"objects": [{"type": "rect"}]}},
                "canvas": {"width": 10},
                "currentTemplateId": "12"
            }
        }))
        .expect("should parse");

        assert!(page.global_canvas("fabricCanvas").is_some());
        assert_eq!(
            page.global_canvas("designerWidgetInstance")
                .map(|c| c.objects().len()),
            Some(1)
        );
        assert!(page.global_canvas("canvas").is_none());
        assert!(page.global_canvas("currentTemplateId").is_none());
    }

    #[test]
    fn wrong_typed_fields_do_not_fail_the_snapshot() {
        let page = PageSnapshot::from_json(
            r#"{
                "designer": {"fabricCanvas": {"objects": [{"type": "rect"}]}, "canvas": "HTMLCanvasElement"},
                "document": [
                    {"tag": "canvas", "fabric": "[object Object]", "rect": {"left": "10", "top": 5}},
                    "text node",
                    {"tag": "div", "id": "mockup_design_area", "rect": "n/a", "children": [7]}
                ],
                "location": {"href": "https://shop.test/"}
            }"#,
        )
        .expect("snapshot should still parse");

        let designer = page.designer().expect("designer kept");
        assert_eq!(designer.canvas().map(|c| c.objects().len()), Some(1));
        assert!(designer.canvas.is_none());

        assert_eq!(page.document.len(), 2);
        assert!(page.document[0].fabric.is_none());
        assert_eq!(page.document[0].rect, Some(Rect::new(10.0, 5.0, 0.0, 0.0)));
        assert!(page.document[1].rect.is_none());
        assert!(page.document[1].children.is_empty());
        assert!(page.location.is_none());
    }

    #[test]
    fn designer_prefers_fabric_canvas() {
        let designer = DesignerInstance {
            fabric_canvas: Some(FabricCanvas::new(1.0, 1.0)),
            canvas: Some(FabricCanvas::new(2.0, 2.0)),
        };
        assert_eq!(designer.canvas().and_then(|c| c.width), Some(1.0));
    }
}
