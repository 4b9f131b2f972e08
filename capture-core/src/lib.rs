//! # Capture Core
//!
//! Design-data capture for a fabric.js based print designer.
//! Compiles to WASM so the same pipeline runs in the page and in tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               capture-core.wasm             │
//! ├─────────────────────────────────────────────┤
//! │  Page model      │  Locate                  │
//! │  - Snapshot      │  - Designer instance     │
//! │  - Selectors     │  - Global registry       │
//! │  - Ready gate    │  - DOM scan + area       │
//! ├─────────────────────────────────────────────┤
//! │  Classify        │  Serialize + Assemble    │
//! │  - Design        │  - DesignElement         │
//! │  - Background    │  - DesignData            │
//! │  - Excluded      │  - Submission fields     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assemble;
pub mod classify;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod gate;
pub mod geometry;
pub(crate) mod lenient;
pub mod locate;
pub mod object;
pub mod page;
pub mod selector;
pub mod submission;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use assemble::{generate_design_data, DesignDataAssembler};
pub use classify::{classify, Classification};
pub use config::{CaptureConfig, TemplateMarker, TransformPolicy};
pub use document::{CaptureInfo, DesignData};
pub use element::{serialize_object, DesignElement, ElementKind, Shape};
pub use error::{CaptureError, CaptureResult};
pub use gate::{ReadyGate, ReadyWaiter};
pub use geometry::{AreaOrigin, AreaSize, PixelPoint, Point, Rect};
pub use locate::{
    DesignerInstanceStrategy, DomScanStrategy, GlobalRegistryStrategy, LocateStrategy,
    LocatedCanvas, Locator,
};
pub use object::{CanvasObject, FabricCanvas, ObjectRole};
pub use page::{DesignerInstance, DomNode, NodeRef, Page, PageSnapshot};
pub use selector::{matches_any, parse_list};
pub use submission::DesignSubmission;
pub use template::TemplateResolver;

/// Capture core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
