use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::document::Document;

use super::classes::ClassNames;

/// Renderable output tree. Carries no editor-specific node types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PresentationNode {
    Element(Element),
    Text(String),
    /// Siblings spliced into the parent when assembled.
    Fragment(Vec<PresentationNode>),
    /// Renders as nothing; dropped when assembled.
    Empty,
}

impl PresentationNode {
    pub fn text(text: impl Into<String>) -> Self {
        PresentationNode::Text(text.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PresentationNode::Empty)
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            PresentationNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text content below this node.
    pub fn text_content(&self) -> String {
        match self {
            PresentationNode::Text(text) => text.clone(),
            PresentationNode::Element(element) => element.text_content(),
            PresentationNode::Fragment(children) => collect_text(children),
            PresentationNode::Empty => String::new(),
        }
    }
}

impl From<Element> for PresentationNode {
    fn from(element: Element) -> Self {
        PresentationNode::Element(element)
    }
}

fn collect_text(nodes: &[PresentationNode]) -> String {
    nodes.iter().map(PresentationNode::text_content).collect()
}

/// Attribute value. `Flag` is a boolean attribute written without a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PresentationNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Text(value.into()));
        self
    }

    /// Set `name` only when a value is present.
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), AttributeValue::Flag);
        self
    }

    /// Set the `class` attribute unless `class` is blank.
    pub fn class(self, class: &str) -> Self {
        if class.trim().is_empty() {
            self
        } else {
            self.attr("class", class)
        }
    }

    pub fn child(mut self, child: impl Into<PresentationNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = PresentationNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Concatenated text content of the children.
    pub fn text_content(&self) -> String {
        collect_text(&self.children)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name)? {
            AttributeValue::Text(value) => Some(value),
            AttributeValue::Flag => None,
        }
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .insert(name.into(), AttributeValue::Text(value.into()));
    }
}

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub document: Document,
    pub options: RenderOptions,
}

impl RenderRequest {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Presentation classes attached to each node kind.
    pub classes: ClassNames,
    /// Suffix repeated heading anchors with `-2`, `-3`, ... in document order.
    pub unique_heading_ids: bool,
    /// Pass the serialized HTML through the sanitizer.
    pub sanitize_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            classes: ClassNames::default(),
            unique_heading_ids: false,
            sanitize_html: true,
        }
    }
}

/// Heading entry in document order, for tables of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingOutline {
    pub level: u8,
    pub anchor: Option<String>,
    pub text: String,
}

/// Content-level metrics surfaced alongside rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentMetrics {
    pub internal_links: u32,
    pub external_links: u32,
    pub images: u32,
    pub images_missing_alt: u32,
    pub videos: u32,
    pub embeds: u32,
    /// Nodes that rendered as nothing, plus video blocks reduced to a link.
    pub degraded_nodes: u32,
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub nodes: Vec<PresentationNode>,
    /// Serialized HTML, sanitized unless the request opted out.
    pub html: String,
    pub outline: Vec<HeadingOutline>,
    pub metrics: ContentMetrics,
}

/// Failures raised by converters. Data-shape problems never surface here;
/// they degrade to empty output instead.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("converter for `{node_type}` failed: {message}")]
    Converter { node_type: String, message: String },
}

impl RenderError {
    pub fn converter(node_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Converter {
            node_type: node_type.into(),
            message: message.into(),
        }
    }
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic: given the same input, they return identical outputs or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}
