use std::{sync::Arc, time::Instant};

use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::{
    domain::{
        anchor::AnchorSlugger,
        links::{CollectionLinkResolver, LinkKind, LinkResolver},
        media::{MediaResolver, NoMedia},
    },
    presentation::{html::to_html, sanitize::build_sanitizer},
};

use super::{
    registry::{ConverterRegistry, default_registry},
    types::{
        ContentMetrics, Element, HeadingOutline, PresentationNode, RenderError, RenderOutput,
        RenderRequest, RenderService,
    },
    walker::TreeWalker,
};

pub(crate) const METRIC_RENDER_DOCUMENTS_TOTAL: &str = "quire_render_documents_total";
pub(crate) const METRIC_RENDER_MS: &str = "quire_render_ms";

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Registry-driven renderer with HTML serialization and Ammonia sanitisation.
pub struct DocumentRenderService {
    registry: Arc<ConverterRegistry>,
    media: Arc<dyn MediaResolver>,
    links: Arc<dyn LinkResolver>,
    sanitizer: ammonia::Builder<'static>,
}

impl DocumentRenderService {
    pub fn new(
        registry: Arc<ConverterRegistry>,
        media: Arc<dyn MediaResolver>,
        links: Arc<dyn LinkResolver>,
    ) -> Self {
        Self {
            registry,
            media,
            links,
            sanitizer: build_sanitizer(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<ConverterRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaResolver>) -> Self {
        self.media = media;
        self
    }

    pub fn with_links(mut self, links: Arc<dyn LinkResolver>) -> Self {
        self.links = links;
        self
    }
}

impl Default for DocumentRenderService {
    fn default() -> Self {
        Self::new(
            default_registry(),
            Arc::new(NoMedia),
            Arc::new(CollectionLinkResolver::default()),
        )
    }
}

static RENDER_SERVICE: Lazy<Arc<DocumentRenderService>> =
    Lazy::new(|| Arc::new(DocumentRenderService::default()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<DocumentRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl RenderService for DocumentRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let started_at = Instant::now();
        let options = &request.options;
        let walker = TreeWalker::new(
            &self.registry,
            self.media.as_ref(),
            self.links.as_ref(),
            options,
        );

        let mut nodes = walker.render_all(&request.document.children)?;
        if options.unique_heading_ids {
            dedupe_heading_ids(&mut nodes);
        }

        let outline = collect_outline(&nodes);
        let mut metrics = collect_content_metrics(&nodes);
        metrics.images_missing_alt = walker.images_missing_alt();
        metrics.degraded_nodes = walker.degraded_count();

        let html = to_html(&nodes);
        let html = if options.sanitize_html {
            self.sanitizer.clean(&html).to_string()
        } else {
            html
        };

        counter!(METRIC_RENDER_DOCUMENTS_TOTAL).increment(1);
        histogram!(METRIC_RENDER_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);
        debug!(
            target = "quire::render::service",
            top_level_nodes = nodes.len(),
            headings = outline.len(),
            degraded = metrics.degraded_nodes,
            sanitized = options.sanitize_html,
            "document rendered"
        );

        Ok(RenderOutput {
            nodes,
            html,
            outline,
            metrics,
        })
    }
}

fn heading_level(element: &Element) -> Option<u8> {
    HEADING_TAGS
        .iter()
        .position(|tag| *tag == element.tag)
        .and_then(|index| u8::try_from(index + 1).ok())
}

/// Visit every element in document order.
fn visit_elements<'a>(nodes: &'a [PresentationNode], visit: &mut impl FnMut(&'a Element)) {
    for node in nodes {
        match node {
            PresentationNode::Element(element) => {
                visit(element);
                visit_elements(&element.children, visit);
            }
            PresentationNode::Fragment(children) => visit_elements(children, visit),
            PresentationNode::Text(_) | PresentationNode::Empty => {}
        }
    }
}

/// Rename the 2nd, 3rd, ... occurrence of a heading id to `id-2`, `id-3`, ...
fn dedupe_heading_ids(nodes: &mut [PresentationNode]) {
    fn walk(nodes: &mut [PresentationNode], slugger: &mut AnchorSlugger) {
        for node in nodes {
            match node {
                PresentationNode::Element(element) => {
                    if heading_level(element).is_some() {
                        if let Some(id) = element.attribute("id").map(str::to_string) {
                            let unique = slugger.anchor_for(&id);
                            element.set_attribute("id", unique);
                        }
                    }
                    walk(&mut element.children, slugger);
                }
                PresentationNode::Fragment(children) => walk(children, slugger),
                PresentationNode::Text(_) | PresentationNode::Empty => {}
            }
        }
    }

    walk(nodes, &mut AnchorSlugger::new());
}

fn collect_outline(nodes: &[PresentationNode]) -> Vec<HeadingOutline> {
    let mut outline = Vec::new();
    visit_elements(nodes, &mut |element| {
        if let Some(level) = heading_level(element) {
            outline.push(HeadingOutline {
                level,
                anchor: element.attribute("id").map(str::to_string),
                text: element.text_content(),
            });
        }
    });
    outline
}

fn collect_content_metrics(nodes: &[PresentationNode]) -> ContentMetrics {
    let mut metrics = ContentMetrics::default();
    visit_elements(nodes, &mut |element| match element.tag.as_str() {
        "a" => match element.attribute("href").map(LinkKind::classify) {
            Some(LinkKind::Internal) => metrics.internal_links += 1,
            Some(LinkKind::External) => metrics.external_links += 1,
            _ => {}
        },
        "img" => metrics.images += 1,
        "video" => metrics.videos += 1,
        "iframe" => metrics.embeds += 1,
        _ => {}
    });
    metrics
}
