//! Open mapping from node kinds and block types to converters.

use std::{collections::HashMap, fmt, sync::Arc};

use once_cell::sync::Lazy;

use crate::domain::document::{BlockNode, Node, NodeKind};

use super::{
    converters,
    types::{PresentationNode, RenderError},
    walker::TreeWalker,
};

/// Turns one node into presentation output. Converters recurse through the
/// walker they are handed.
pub trait NodeConverter: Send + Sync {
    fn convert(&self, node: &Node, walker: &TreeWalker<'_>)
    -> Result<PresentationNode, RenderError>;
}

/// Renders one block subtype. Block fields are opaque to everything else.
pub trait BlockConverter: Send + Sync {
    fn convert(
        &self,
        block: &BlockNode,
        walker: &TreeWalker<'_>,
    ) -> Result<PresentationNode, RenderError>;
}

impl<F> NodeConverter for F
where
    F: Fn(&Node, &TreeWalker<'_>) -> Result<PresentationNode, RenderError> + Send + Sync,
{
    fn convert(
        &self,
        node: &Node,
        walker: &TreeWalker<'_>,
    ) -> Result<PresentationNode, RenderError> {
        self(node, walker)
    }
}

impl<F> BlockConverter for F
where
    F: Fn(&BlockNode, &TreeWalker<'_>) -> Result<PresentationNode, RenderError> + Send + Sync,
{
    fn convert(
        &self,
        block: &BlockNode,
        walker: &TreeWalker<'_>,
    ) -> Result<PresentationNode, RenderError> {
        self(block, walker)
    }
}

#[derive(Clone)]
pub struct ConverterRegistry {
    nodes: HashMap<NodeKind, Arc<dyn NodeConverter>>,
    blocks: HashMap<String, Arc<dyn BlockConverter>>,
    fallback: Arc<dyn NodeConverter>,
}

static DEFAULT_REGISTRY: Lazy<Arc<ConverterRegistry>> =
    Lazy::new(|| Arc::new(ConverterRegistry::with_defaults()));

/// Shared registry holding the default converters.
pub fn default_registry() -> Arc<ConverterRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

impl ConverterRegistry {
    /// A registry with no converters; every node reaches the fallback.
    pub fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
            blocks: HashMap::new(),
            fallback: Arc::new(converters::render_nothing),
        }
    }

    /// Converters for every known node kind plus the `image` and `video`
    /// blocks.
    pub fn with_defaults() -> Self {
        let registry = NodeKind::ALL
            .into_iter()
            .fold(Self::empty(), |registry, kind| {
                registry.with_shared_node(kind, converters::default_converter(kind))
            });

        registry
            .with_block("image", converters::media::image_block)
            .with_block("video", converters::media::video_block)
    }

    pub fn with_node(self, kind: NodeKind, converter: impl NodeConverter + 'static) -> Self {
        self.with_shared_node(kind, Arc::new(converter))
    }

    /// Closure form of [`with_node`](Self::with_node), so argument types need
    /// no annotation.
    pub fn with_node_fn<F>(self, kind: NodeKind, converter: F) -> Self
    where
        F: Fn(&Node, &TreeWalker<'_>) -> Result<PresentationNode, RenderError>
            + Send
            + Sync
            + 'static,
    {
        self.with_node(kind, converter)
    }

    pub fn with_shared_node(mut self, kind: NodeKind, converter: Arc<dyn NodeConverter>) -> Self {
        self.nodes.insert(kind, converter);
        self
    }

    pub fn with_block(
        mut self,
        block_type: impl Into<String>,
        converter: impl BlockConverter + 'static,
    ) -> Self {
        self.blocks.insert(block_type.into(), Arc::new(converter));
        self
    }

    pub fn with_block_fn<F>(self, block_type: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&BlockNode, &TreeWalker<'_>) -> Result<PresentationNode, RenderError>
            + Send
            + Sync
            + 'static,
    {
        self.with_block(block_type, converter)
    }

    /// Converter for nodes no other entry handles.
    pub fn with_fallback(mut self, converter: impl NodeConverter + 'static) -> Self {
        self.fallback = Arc::new(converter);
        self
    }

    pub fn node(&self, kind: NodeKind) -> Option<&dyn NodeConverter> {
        self.nodes.get(&kind).map(Arc::as_ref)
    }

    pub fn block(&self, block_type: &str) -> Option<&dyn BlockConverter> {
        self.blocks.get(block_type).map(Arc::as_ref)
    }

    pub fn fallback(&self) -> &dyn NodeConverter {
        self.fallback.as_ref()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes: Vec<&str> = self.nodes.keys().map(|kind| kind.as_str()).collect();
        nodes.sort_unstable();
        let mut blocks: Vec<&str> = self.blocks.keys().map(String::as_str).collect();
        blocks.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("nodes", &nodes)
            .field("blocks", &blocks)
            .finish_non_exhaustive()
    }
}
