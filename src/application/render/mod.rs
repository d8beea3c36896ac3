//! Rendering of editor documents into presentation trees.
//!
//! The pipeline is pure: a finished document and its collaborators go in, a
//! deterministic presentation tree, HTML, outline and metrics come out. It
//! performs no I/O and holds no state between calls.

mod classes;
pub mod converters;
mod registry;
mod service;
mod types;
mod walker;

pub use classes::ClassNames;
pub use registry::{BlockConverter, ConverterRegistry, NodeConverter, default_registry};
pub use service::{DocumentRenderService, render_service};
pub use types::{
    AttributeValue, ContentMetrics, Element, HeadingOutline, PresentationNode, RenderError,
    RenderOptions, RenderOutput, RenderRequest, RenderService,
};
pub use walker::{Degradation, TreeWalker};

pub(crate) use service::{METRIC_RENDER_DOCUMENTS_TOTAL, METRIC_RENDER_MS};
pub(crate) use walker::METRIC_RENDER_DEGRADED_TOTAL;
