//! Canvas and design-area discovery.
//!
//! A [`Locator`] runs an ordered chain of [`LocateStrategy`] implementations
//! and stops at the first one that yields a canvas. It then measures the
//! design-area container that the end user perceives as the print area.
//!
//! ```text
//! DesignerInstanceStrategy → GlobalRegistryStrategy → DomScanStrategy
//!            │ first hit
//!            ▼
//!   design area container ─► AreaSize + AreaOrigin
//! ```

use crate::config::{CaptureConfig, TransformPolicy};
use crate::geometry::{round_px, AreaOrigin, AreaSize, Rect};
use crate::object::FabricCanvas;
use crate::page::{NodeRef, Page};
use crate::selector::parse_list;
use crate::{CaptureError, CaptureResult};

/// A canvas found by a strategy, with the DOM node it draws into if known.
#[derive(Debug, Clone)]
pub struct Discovered<'a> {
    /// The canvas instance.
    pub canvas: &'a FabricCanvas,
    /// The `<canvas>` node, when the strategy found the canvas through the DOM.
    pub node: Option<NodeRef<'a>>,
}

impl<'a> Discovered<'a> {
    /// A canvas with no known DOM node.
    #[must_use]
    pub fn detached(canvas: &'a FabricCanvas) -> Self {
        Self { canvas, node: None }
    }
}

/// One way of finding the active canvas.
pub trait LocateStrategy: std::fmt::Debug + Send + Sync {
    /// Short name reported in diagnostics.
    fn name(&self) -> &str;

    /// Try to find a canvas on `page`.
    fn discover<'a>(&self, page: &'a dyn Page) -> Option<Discovered<'a>>;
}

/// The designer instance handed over explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignerInstanceStrategy;

impl LocateStrategy for DesignerInstanceStrategy {
    fn name(&self) -> &str {
        "designer_instance"
    }

    fn discover<'a>(&self, page: &'a dyn Page) -> Option<Discovered<'a>> {
        page.designer()?.canvas().map(Discovered::detached)
    }
}

/// Canvases registered under global names.
#[derive(Debug, Clone, Default)]
pub struct GlobalRegistryStrategy {
    names: Vec<String>,
}

impl GlobalRegistryStrategy {
    /// Try `names` in order.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl LocateStrategy for GlobalRegistryStrategy {
    fn name(&self) -> &str {
        "global_registry"
    }

    fn discover<'a>(&self, page: &'a dyn Page) -> Option<Discovered<'a>> {
        self.names.iter().find_map(|name| {
            let canvas = page.global_canvas(name)?;
            tracing::debug!("Found canvas in global {name}");
            Some(Discovered::detached(canvas))
        })
    }
}

/// `<canvas>` nodes carrying an attached canvas instance.
///
/// A canvas inside a designer container wins over the first one in document
/// order.
#[derive(Debug, Clone, Default)]
pub struct DomScanStrategy {
    designer_container: Option<String>,
}

impl DomScanStrategy {
    /// Prefer canvases inside the `designer_container` selector list, if given.
    #[must_use]
    pub fn new(designer_container: Option<String>) -> Self {
        Self { designer_container }
    }
}

impl LocateStrategy for DomScanStrategy {
    fn name(&self) -> &str {
        "dom_scan"
    }

    fn discover<'a>(&self, page: &'a dyn Page) -> Option<Discovered<'a>> {
        let candidates: Vec<_> = page
            .nodes()
            .into_iter()
            .filter(|n| n.node.tag == "canvas" && n.node.fabric.is_some())
            .collect();
        tracing::debug!("Found {} canvas elements with an instance", candidates.len());

        let preferred = self.designer_container.as_ref().and_then(|container| {
            candidates
                .iter()
                .position(|n| n.has_closest(container))
        });
        let node = candidates.into_iter().nth(preferred.unwrap_or(0))?;
        let canvas = node.node.fabric.as_ref()?;
        Some(Discovered {
            canvas,
            node: Some(node),
        })
    }
}

/// Result of a successful locate.
#[derive(Debug, Clone)]
pub struct LocatedCanvas<'a> {
    /// The active canvas.
    pub canvas: &'a FabricCanvas,
    /// Name of the strategy that found it.
    pub strategy: String,
    /// Bounding rect of the `<canvas>` node, when known.
    pub canvas_rect: Option<Rect>,
    /// Bounding rect of the design-area container, when found.
    pub area_rect: Option<Rect>,
    /// Size of the design area in whole pixels.
    pub area: AreaSize,
    /// Design-area origin in canvas coordinates.
    pub origin: AreaOrigin,
}

/// Ordered discovery chain plus design-area measurement.
#[derive(Debug)]
pub struct Locator {
    strategies: Vec<Box<dyn LocateStrategy>>,
    area_selectors: Vec<String>,
    fallback_area: AreaSize,
    policy: TransformPolicy,
}

impl Default for Locator {
    fn default() -> Self {
        Self::from_config(&CaptureConfig::default())
    }
}

impl Locator {
    /// Build the default chain from a config.
    ///
    /// Unparsable selectors are skipped; use [`CaptureConfig::validate`] to
    /// reject them up front.
    #[must_use]
    pub fn from_config(config: &CaptureConfig) -> Self {
        let container = checked(&config.designer_container_selector);
        Self::with_strategies(
            vec![
                Box::new(DesignerInstanceStrategy),
                Box::new(GlobalRegistryStrategy::new(config.global_canvas_names.clone())),
                Box::new(DomScanStrategy::new(container)),
            ],
            config,
        )
    }

    /// Build with a custom strategy chain.
    #[must_use]
    pub fn with_strategies(
        strategies: Vec<Box<dyn LocateStrategy>>,
        config: &CaptureConfig,
    ) -> Self {
        Self {
            strategies,
            area_selectors: config
                .design_area_selectors
                .iter()
                .filter_map(|s| checked(s))
                .collect(),
            fallback_area: config.fallback_area,
            policy: config.transform_policy,
        }
    }

    /// Names of the strategies, in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Find the active canvas and measure its design area.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CanvasNotFound`] when no strategy finds a canvas.
    pub fn locate<'a>(&self, page: &'a dyn Page) -> CaptureResult<LocatedCanvas<'a>> {
        let (strategy, found) = self
            .strategies
            .iter()
            .find_map(|s| s.discover(page).map(|found| (s.name().to_string(), found)))
            .ok_or_else(|| CaptureError::CanvasNotFound(self.strategy_names().join(", ")))?;
        tracing::debug!("Canvas located via {strategy}");

        let canvas_node = found.node.or_else(|| canvas_node_by_id(page, found.canvas));
        let canvas_rect = canvas_node.as_ref().and_then(|n| n.node.rect);
        let area_rect = self.area_rect(page, canvas_node.as_ref());

        let area = match area_rect {
            Some(rect) => AreaSize::of_rect(&rect),
            None => {
                tracing::debug!("Design area not found, using canvas dimensions");
                AreaSize::new(
                    found.canvas.width.map_or(self.fallback_area.width, round_px),
                    found.canvas.height.map_or(self.fallback_area.height, round_px),
                )
            }
        };

        let origin = match (self.policy, area_rect, canvas_rect) {
            (TransformPolicy::AreaRelative, Some(area), Some(canvas)) => {
                AreaOrigin::between(&area, &canvas)
            }
            _ => AreaOrigin::IDENTITY,
        };

        Ok(LocatedCanvas {
            canvas: found.canvas,
            strategy,
            canvas_rect,
            area_rect,
            area,
            origin,
        })
    }

    /// The design-area container's rect.
    ///
    /// Containers wrapping the located canvas, or sitting next to it, win over
    /// the first match elsewhere on the page.
    fn area_rect(&self, page: &dyn Page, canvas: Option<&NodeRef<'_>>) -> Option<Rect> {
        let candidates: Vec<Vec<NodeRef<'_>>> = self
            .area_selectors
            .iter()
            .map(|selector| {
                page.query_selector_all(selector)
                    .into_iter()
                    .filter(|n| n.node.rect.is_some())
                    .collect()
            })
            .collect();

        let related = canvas.and_then(|canvas| {
            candidates.iter().flatten().find(|n| {
                !std::ptr::eq(n.node, canvas.node)
                    && (canvas.is_within(n.node) || n.is_sibling_of(canvas))
            })
        });
        let chosen = related.or_else(|| candidates.iter().flatten().next())?;
        tracing::debug!("Design area found: {}", chosen.node.tag);
        chosen.node.rect
    }
}

fn canvas_node_by_id<'a>(page: &'a dyn Page, canvas: &FabricCanvas) -> Option<NodeRef<'a>> {
    let id = canvas.element.as_deref()?;
    page.element_by_id(id)
}

fn checked(selector: &str) -> Option<String> {
    match parse_list(selector) {
        Ok(_) => Some(selector.to_string()),
        Err(e) => {
            tracing::warn!("Ignoring selector: {e}");
            None
        }
    }
}
