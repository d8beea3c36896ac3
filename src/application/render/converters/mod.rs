//! Default converters, one per node kind.

pub(crate) mod containers;
pub(crate) mod link;
pub mod media;
pub mod text;

use std::sync::Arc;

use crate::domain::document::{Node, NodeKind, NodeValue};

use super::{
    registry::NodeConverter,
    types::{PresentationNode, RenderError},
    walker::{Degradation, TreeWalker},
};

pub use text::decorate;

/// Default converter for a node kind. The match is exhaustive so a new kind
/// cannot ship without one.
pub(crate) fn default_converter(kind: NodeKind) -> Arc<dyn NodeConverter> {
    match kind {
        NodeKind::Text => Arc::new(text::text),
        NodeKind::LineBreak => Arc::new(text::line_break),
        NodeKind::HorizontalRule => Arc::new(text::horizontal_rule),
        NodeKind::Link => Arc::new(link::link),
        NodeKind::Paragraph => Arc::new(containers::paragraph),
        NodeKind::Heading => Arc::new(containers::heading),
        NodeKind::Quote => Arc::new(containers::quote),
        NodeKind::List => Arc::new(containers::list),
        NodeKind::ListItem => Arc::new(containers::list_item),
        NodeKind::Code => Arc::new(containers::code),
        NodeKind::Upload => Arc::new(media::upload),
        NodeKind::Block => Arc::new(block),
    }
}

/// Fallback for nodes nothing else handles.
pub(crate) fn render_nothing(
    _node: &Node,
    _walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    Ok(PresentationNode::Empty)
}

/// Secondary dispatch on `blockType`.
fn block(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    let NodeValue::Block(block) = &node.value else {
        return Ok(PresentationNode::Empty);
    };

    match walker.registry().block(&block.block_type) {
        Some(converter) => converter.convert(block, walker),
        None => walker.render_fallback(node, Degradation::UnknownBlock, &block.block_type),
    }
}
