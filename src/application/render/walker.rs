//! Recursive driver applying the converter registry to a node tree.

use std::{borrow::Cow, cell::Cell};

use metrics::counter;
use tracing::debug;

use crate::domain::{
    document::{Node, NodeValue},
    links::{LinkResolver, LinkTarget},
    media::{MediaObject, MediaRef, MediaResolver},
};

use super::{
    classes::ClassNames,
    registry::ConverterRegistry,
    types::{PresentationNode, RenderError, RenderOptions},
};

pub(crate) const METRIC_RENDER_DEGRADED_TOTAL: &str = "quire_render_degraded_total";

/// Why a node rendered as nothing or as a degraded substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    UnknownNode,
    UnknownBlock,
    MalformedNode,
    UnresolvedMedia,
    UnresolvedLink,
    UnrecognizedVideo,
}

impl Degradation {
    pub fn as_str(self) -> &'static str {
        match self {
            Degradation::UnknownNode => "unknown_node",
            Degradation::UnknownBlock => "unknown_block",
            Degradation::MalformedNode => "malformed_node",
            Degradation::UnresolvedMedia => "unresolved_media",
            Degradation::UnresolvedLink => "unresolved_link",
            Degradation::UnrecognizedVideo => "unrecognized_video",
        }
    }
}

/// Per-call rendering state handed to every converter.
///
/// Holds the collaborators for one render. Counters use `Cell` because a
/// walker never leaves the call that created it.
pub struct TreeWalker<'a> {
    registry: &'a ConverterRegistry,
    media: &'a dyn MediaResolver,
    links: &'a dyn LinkResolver,
    options: &'a RenderOptions,
    degraded: Cell<u32>,
    images_missing_alt: Cell<u32>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        registry: &'a ConverterRegistry,
        media: &'a dyn MediaResolver,
        links: &'a dyn LinkResolver,
        options: &'a RenderOptions,
    ) -> Self {
        Self {
            registry,
            media,
            links,
            options,
            degraded: Cell::new(0),
            images_missing_alt: Cell::new(0),
        }
    }

    /// Render a single node through its registered converter, or the
    /// fallback when none applies.
    pub fn render(&self, node: &Node) -> Result<PresentationNode, RenderError> {
        if let Some(converter) = node.kind().and_then(|kind| self.registry.node(kind)) {
            return converter.convert(node, self);
        }

        let reason = match &node.value {
            NodeValue::Malformed { .. } => Degradation::MalformedNode,
            _ => Degradation::UnknownNode,
        };
        self.render_fallback(node, reason, node.type_name())
    }

    /// Hand `node` to the registry fallback. Only a fallback that renders
    /// nothing counts as a degradation.
    pub fn render_fallback(
        &self,
        node: &Node,
        reason: Degradation,
        node_type: &str,
    ) -> Result<PresentationNode, RenderError> {
        let rendered = self.registry.fallback().convert(node, self)?;
        if rendered.is_empty() {
            self.degrade(reason, node_type);
        } else {
            debug!(
                target = "quire::render::walker",
                reason = reason.as_str(),
                node_type,
                "node rendered by fallback"
            );
        }
        Ok(rendered)
    }

    /// Render siblings in order, dropping empty results and splicing
    /// fragments in place.
    pub fn render_all(&self, nodes: &[Node]) -> Result<Vec<PresentationNode>, RenderError> {
        let mut rendered = Vec::with_capacity(nodes.len());
        for node in nodes {
            splice(self.render(node)?, &mut rendered);
        }
        Ok(rendered)
    }

    pub fn render_children(&self, node: &Node) -> Result<Vec<PresentationNode>, RenderError> {
        self.render_all(node.children())
    }

    pub fn registry(&self) -> &ConverterRegistry {
        self.registry
    }

    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    pub fn classes(&self) -> &ClassNames {
        &self.options.classes
    }

    /// Populated media for a reference, asking the media resolver when only
    /// an id was stored.
    pub fn resolve_media<'m>(&self, media: &'m MediaRef) -> Option<Cow<'m, MediaObject>> {
        match media {
            MediaRef::Resolved(object) => Some(Cow::Borrowed(object)),
            MediaRef::Unresolved { id: Some(id) } => self.media.resolve(id).map(Cow::Owned),
            MediaRef::Unresolved { id: None } => None,
        }
    }

    pub fn resolve_href(&self, target: &LinkTarget) -> String {
        self.links.resolve_href(target)
    }

    /// Record a degraded node: debug log plus the degradation counter.
    pub fn degrade(&self, reason: Degradation, node_type: &str) {
        self.degraded.set(self.degraded.get() + 1);
        debug!(
            target = "quire::render::walker",
            reason = reason.as_str(),
            node_type,
            "node degraded"
        );
        counter!(METRIC_RENDER_DEGRADED_TOTAL, "reason" => reason.as_str()).increment(1);
    }

    pub fn note_missing_alt(&self) {
        self.images_missing_alt
            .set(self.images_missing_alt.get() + 1);
    }

    pub fn degraded_count(&self) -> u32 {
        self.degraded.get()
    }

    pub fn images_missing_alt(&self) -> u32 {
        self.images_missing_alt.get()
    }
}

fn splice(node: PresentationNode, out: &mut Vec<PresentationNode>) {
    match node {
        PresentationNode::Empty => {}
        PresentationNode::Fragment(children) => {
            for child in children {
                splice(child, out);
            }
        }
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::render::types::Element;
    use crate::domain::{
        document::{Document, NodeKind},
        links::CollectionLinkResolver,
        media::NoMedia,
    };

    fn nodes(children: serde_json::Value) -> Vec<Node> {
        Document::from_value(&json!({ "root": { "type": "root", "children": children } }))
            .expect("document")
            .children
    }

    #[test]
    fn fragments_splice_and_empties_drop() {
        let registry = ConverterRegistry::empty()
            .with_node_fn(NodeKind::Paragraph, |_, _| {
                Ok(PresentationNode::Fragment(vec![
                    PresentationNode::text("a"),
                    PresentationNode::Empty,
                    PresentationNode::Fragment(vec![PresentationNode::text("b")]),
                ]))
            })
            .with_node_fn(NodeKind::LineBreak, |_, _| Ok(PresentationNode::Empty));
        let links = CollectionLinkResolver::default();
        let options = RenderOptions::default();
        let walker = TreeWalker::new(&registry, &NoMedia, &links, &options);

        let rendered = walker
            .render_all(&nodes(json!([
                { "type": "paragraph", "children": [] },
                { "type": "linebreak" },
                { "type": "paragraph", "children": [] }
            ])))
            .expect("render");

        assert_eq!(
            rendered,
            vec![
                PresentationNode::text("a"),
                PresentationNode::text("b"),
                PresentationNode::text("a"),
                PresentationNode::text("b"),
            ]
        );
    }

    #[test]
    fn unknown_nodes_reach_the_fallback() {
        fn mark_unknown(node: &Node, _: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
            Ok(Element::new("span")
                .attr("data-unknown", node.type_name())
                .into())
        }

        let registry = ConverterRegistry::with_defaults().with_fallback(mark_unknown);
        let links = CollectionLinkResolver::default();
        let options = RenderOptions::default();
        let walker = TreeWalker::new(&registry, &NoMedia, &links, &options);

        let rendered = walker
            .render_all(&nodes(json!([{ "type": "sparkle" }, { "type": "text" }])))
            .expect("render");

        assert_eq!(rendered.len(), 2);
        assert_eq!(
            rendered[0].as_element().and_then(|el| el.attribute("data-unknown")),
            Some("sparkle")
        );
        assert_eq!(walker.degraded_count(), 0);
    }

    #[test]
    fn empty_fallback_output_counts_as_degraded() {
        let registry = ConverterRegistry::with_defaults();
        let links = CollectionLinkResolver::default();
        let options = RenderOptions::default();
        let walker = TreeWalker::new(&registry, &NoMedia, &links, &options);

        let rendered = walker
            .render_all(&nodes(json!([
                { "type": "sparkle" },
                { "type": "text" },
                { "type": "block", "fields": { "blockType": "carousel" } }
            ])))
            .expect("render");

        assert!(rendered.is_empty());
        assert_eq!(walker.degraded_count(), 3);
    }

    #[test]
    fn converter_errors_propagate() {
        let registry = ConverterRegistry::with_defaults().with_node_fn(NodeKind::Quote, |node, _| {
            Err(RenderError::converter(node.type_name(), "boom"))
        });
        let links = CollectionLinkResolver::default();
        let options = RenderOptions::default();
        let walker = TreeWalker::new(&registry, &NoMedia, &links, &options);

        let err = walker
            .render_all(&nodes(json!([{ "type": "quote", "children": [] }])))
            .expect_err("converter error");
        assert!(err.to_string().contains("quote"));
    }
}
