//! Document model for serialized editor state.
//!
//! Construction is tolerant below the root: every JSON node becomes a
//! [`Node`], with [`NodeValue::Malformed`] and [`NodeValue::Unknown`]
//! standing in for shapes the renderer cannot use. Only a missing root is an
//! error.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::{
    error::DocumentError,
    format::TextFormat,
    guards,
    links::LinkTarget,
    media::MediaRef,
};

const DEFAULT_VERSION: u32 = 1;

/// Root value handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: u32,
    pub children: Vec<Node>,
}

impl Document {
    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self {
            version: DEFAULT_VERSION,
            children,
        }
    }

    /// Accepts `{"root": {...}}` as stored by the editor, or a bare root node.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let root = match value.get("root") {
            Some(root) if root.is_object() => root,
            Some(_) => return Err(DocumentError::MissingRoot),
            None if guards::node_type(value) == Some("root") => value,
            None => return Err(DocumentError::MissingRoot),
        };

        Ok(Self {
            version: read_version(root),
            children: parse_children(root),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub version: u32,
    pub value: NodeValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Text(TextRun),
    LineBreak,
    HorizontalRule,
    Link(LinkNode),
    Container(ContainerNode),
    Upload(UploadNode),
    Block(BlockNode),
    /// A known discriminator whose required fields are missing or mistyped.
    Malformed {
        node_type: String,
        reason: &'static str,
    },
    /// A discriminator this renderer does not know.
    Unknown {
        node_type: String,
        children: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkNode {
    pub target: LinkTarget,
    pub new_tab: bool,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerNode {
    pub kind: ContainerKind,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    Paragraph,
    Heading(HeadingLevel),
    Quote,
    List(ListStyle),
    ListItem { checked: Option<bool> },
    Code { language: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }

    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            6 => Some(Self::H6),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Bullet,
    Number { start: u32 },
    Check,
}

impl ListStyle {
    pub fn is_ordered(self) -> bool {
        matches!(self, ListStyle::Number { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadNode {
    pub relation_to: Option<String>,
    pub media: MediaRef,
}

/// An embed whose `fields` are interpreted by the converter registered for
/// its `block_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub block_type: String,
    pub block_name: Option<String>,
    pub fields: Map<String, Value>,
}

impl BlockNode {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A string field, treating blank strings as absent.
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Converter lookup key for the known node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    LineBreak,
    HorizontalRule,
    Link,
    Paragraph,
    Heading,
    Quote,
    List,
    ListItem,
    Code,
    Upload,
    Block,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Text,
        NodeKind::LineBreak,
        NodeKind::HorizontalRule,
        NodeKind::Link,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::Quote,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Code,
        NodeKind::Upload,
        NodeKind::Block,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::LineBreak => "linebreak",
            NodeKind::HorizontalRule => "horizontalrule",
            NodeKind::Link => "link",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Quote => "quote",
            NodeKind::List => "list",
            NodeKind::ListItem => "listitem",
            NodeKind::Code => "code",
            NodeKind::Upload => "upload",
            NodeKind::Block => "block",
        }
    }
}

impl Node {
    pub fn new(value: NodeValue) -> Self {
        Self {
            version: DEFAULT_VERSION,
            value,
        }
    }

    /// Build a node from untyped JSON. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let version = read_version(value);
        let Some(node_type) = guards::node_type(value) else {
            return Self {
                version,
                value: NodeValue::Malformed {
                    node_type: String::new(),
                    reason: "missing type discriminator",
                },
            };
        };

        let parsed = match node_type {
            "text" | "code-highlight" | "tab" => match guards::as_text_run(value) {
                Some(run) => NodeValue::Text(run),
                None => malformed(node_type, "text run without string text"),
            },
            "linebreak" => NodeValue::LineBreak,
            "horizontalrule" => NodeValue::HorizontalRule,
            "link" | "autolink" => NodeValue::Link(LinkNode {
                target: LinkTarget::from_fields(value.get("fields")),
                new_tab: value
                    .get("fields")
                    .and_then(|fields| fields.get("newTab"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                children: parse_children(value),
            }),
            "paragraph" => container(ContainerKind::Paragraph, value),
            "heading" => {
                let level = value
                    .get("tag")
                    .and_then(Value::as_str)
                    .and_then(HeadingLevel::from_tag)
                    .unwrap_or(HeadingLevel::H1);
                container(ContainerKind::Heading(level), value)
            }
            "quote" => container(ContainerKind::Quote, value),
            "list" => container(ContainerKind::List(list_style(value)), value),
            "listitem" => container(
                ContainerKind::ListItem {
                    checked: value.get("checked").and_then(Value::as_bool),
                },
                value,
            ),
            "code" => container(
                ContainerKind::Code {
                    language: value
                        .get("language")
                        .and_then(Value::as_str)
                        .filter(|language| !language.trim().is_empty())
                        .map(str::to_string),
                },
                value,
            ),
            "upload" => NodeValue::Upload(UploadNode {
                relation_to: value
                    .get("relationTo")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                media: MediaRef::from_value(value.get("value")),
            }),
            "block" => match block(value) {
                Some(block) => NodeValue::Block(block),
                None => malformed(node_type, "block without blockType"),
            },
            other => NodeValue::Unknown {
                node_type: other.to_string(),
                children: parse_children(value),
            },
        };

        Self {
            version,
            value: parsed,
        }
    }

    /// Converter lookup key, `None` for malformed and unknown nodes.
    pub fn kind(&self) -> Option<NodeKind> {
        match &self.value {
            NodeValue::Text(_) => Some(NodeKind::Text),
            NodeValue::LineBreak => Some(NodeKind::LineBreak),
            NodeValue::HorizontalRule => Some(NodeKind::HorizontalRule),
            NodeValue::Link(_) => Some(NodeKind::Link),
            NodeValue::Container(container) => Some(match container.kind {
                ContainerKind::Paragraph => NodeKind::Paragraph,
                ContainerKind::Heading(_) => NodeKind::Heading,
                ContainerKind::Quote => NodeKind::Quote,
                ContainerKind::List(_) => NodeKind::List,
                ContainerKind::ListItem { .. } => NodeKind::ListItem,
                ContainerKind::Code { .. } => NodeKind::Code,
            }),
            NodeValue::Upload(_) => Some(NodeKind::Upload),
            NodeValue::Block(_) => Some(NodeKind::Block),
            NodeValue::Malformed { .. } | NodeValue::Unknown { .. } => None,
        }
    }

    /// Discriminator as it appeared in the input, for diagnostics.
    pub fn type_name(&self) -> &str {
        match (&self.value, self.kind()) {
            (NodeValue::Malformed { node_type, .. }, _)
            | (NodeValue::Unknown { node_type, .. }, _) => node_type,
            (_, Some(kind)) => kind.as_str(),
            (_, None) => "",
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.value {
            NodeValue::Link(link) => &link.children,
            NodeValue::Container(container) => &container.children,
            NodeValue::Unknown { children, .. } => children,
            _ => &[],
        }
    }
}

/// Concatenated text of all text runs below `nodes`, ignoring formatting.
pub fn extract_text(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| match &node.value {
            NodeValue::Text(run) => run.text.clone(),
            _ => extract_text(node.children()),
        })
        .collect()
}

/// Like [`extract_text`], but line breaks contribute a newline. Used for code
/// blocks, whose lines are separated by line break nodes.
pub fn extract_code_text(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| match &node.value {
            NodeValue::Text(run) => run.text.clone(),
            NodeValue::LineBreak => "\n".to_string(),
            _ => extract_code_text(node.children()),
        })
        .collect()
}

fn malformed(node_type: &str, reason: &'static str) -> NodeValue {
    NodeValue::Malformed {
        node_type: node_type.to_string(),
        reason,
    }
}

fn container(kind: ContainerKind, value: &Value) -> NodeValue {
    NodeValue::Container(ContainerNode {
        kind,
        children: parse_children(value),
    })
}

fn list_style(value: &Value) -> ListStyle {
    let start = value
        .get("start")
        .and_then(Value::as_u64)
        .and_then(|start| u32::try_from(start).ok())
        .unwrap_or(1);

    match value.get("listType").and_then(Value::as_str) {
        Some("number") => ListStyle::Number { start },
        Some("check") => ListStyle::Check,
        Some("bullet") => ListStyle::Bullet,
        _ => match value.get("tag").and_then(Value::as_str) {
            Some("ol") => ListStyle::Number { start },
            _ => ListStyle::Bullet,
        },
    }
}

fn block(value: &Value) -> Option<BlockNode> {
    let fields = value.get("fields")?.as_object()?;
    let block_type = fields
        .get("blockType")?
        .as_str()
        .filter(|kind| !kind.trim().is_empty())?
        .to_string();
    let block_name = fields
        .get("blockName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Some(BlockNode {
        block_type,
        block_name,
        fields: fields.clone(),
    })
}

fn parse_children(value: &Value) -> Vec<Node> {
    guards::children_of(value)
        .map(|children| children.iter().map(Node::from_value).collect())
        .unwrap_or_default()
}

fn read_version(value: &Value) -> u32 {
    value
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(DEFAULT_VERSION)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{links::DocumentRef, media::MediaId};

    #[test]
    fn parses_editor_state_root() {
        let document = Document::from_json(
            r#"{"root":{"type":"root","version":1,"children":[
                {"type":"paragraph","version":1,"children":[
                    {"type":"text","version":1,"text":"Hi","format":1}
                ]}
            ]}}"#,
        )
        .expect("document");

        assert_eq!(document.children.len(), 1);
        let paragraph = &document.children[0];
        assert_eq!(paragraph.kind(), Some(NodeKind::Paragraph));
        assert_eq!(extract_text(paragraph.children()), "Hi");
    }

    #[test]
    fn missing_root_is_rejected() {
        assert!(matches!(
            Document::from_json(r#"{"children":[]}"#),
            Err(DocumentError::MissingRoot)
        ));
        assert!(matches!(
            Document::from_json("not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn null_children_read_as_leaf() {
        let document = Document::from_value(&json!({
            "root": { "type": "root", "children": null }
        }))
        .expect("document");
        assert!(document.children.is_empty());
    }

    #[test]
    fn unknown_and_malformed_nodes_are_kept() {
        let node = Node::from_value(&json!({
            "type": "exotic-future-node",
            "version": 3,
            "children": [{ "type": "text", "text": "inside" }]
        }));
        assert_eq!(node.version, 3);
        assert_eq!(node.kind(), None);
        assert_eq!(node.type_name(), "exotic-future-node");
        assert_eq!(node.children().len(), 1);

        let text = Node::from_value(&json!({ "type": "text" }));
        assert!(matches!(text.value, NodeValue::Malformed { .. }));

        let untyped = Node::from_value(&json!(42));
        assert!(matches!(untyped.value, NodeValue::Malformed { .. }));

        let block = Node::from_value(&json!({ "type": "block", "fields": {} }));
        assert!(matches!(block.value, NodeValue::Malformed { .. }));
    }

    #[test]
    fn heading_and_list_attributes() {
        let heading = Node::from_value(&json!({ "type": "heading", "tag": "h3", "children": [] }));
        assert_eq!(
            heading.value,
            NodeValue::Container(ContainerNode {
                kind: ContainerKind::Heading(HeadingLevel::H3),
                children: vec![],
            })
        );

        let ordered = Node::from_value(&json!({
            "type": "list", "tag": "ol", "start": 4, "children": []
        }));
        let NodeValue::Container(list) = ordered.value else {
            panic!("list container");
        };
        assert_eq!(list.kind, ContainerKind::List(ListStyle::Number { start: 4 }));

        let checks = Node::from_value(&json!({
            "type": "list", "tag": "ul", "listType": "check", "children": []
        }));
        let NodeValue::Container(list) = checks.value else {
            panic!("list container");
        };
        assert_eq!(list.kind, ContainerKind::List(ListStyle::Check));
    }

    #[test]
    fn link_and_upload_payloads() {
        let link = Node::from_value(&json!({
            "type": "link",
            "fields": {
                "linkType": "internal",
                "newTab": true,
                "doc": { "relationTo": "posts", "value": { "slug": "a" } }
            },
            "children": []
        }));
        let NodeValue::Link(link) = link.value else {
            panic!("link node");
        };
        assert!(link.new_tab);
        assert_eq!(
            link.target,
            LinkTarget::Internal {
                collection: "posts".into(),
                document: DocumentRef::Resolved {
                    slug: Some("a".into())
                },
            }
        );

        let upload = Node::from_value(&json!({
            "type": "upload", "relationTo": "media", "value": 9
        }));
        let NodeValue::Upload(upload) = upload.value else {
            panic!("upload node");
        };
        assert_eq!(
            upload.media,
            MediaRef::Unresolved {
                id: Some(MediaId::Number(9))
            }
        );
    }

    #[test]
    fn code_text_keeps_line_breaks() {
        let code = Node::from_value(&json!({
            "type": "code",
            "language": "rust",
            "children": [
                { "type": "code-highlight", "text": "fn main() {" },
                { "type": "linebreak" },
                { "type": "tab" },
                { "type": "code-highlight", "text": "}" }
            ]
        }));
        assert_eq!(extract_code_text(code.children()), "fn main() {\n\t}");
        assert_eq!(extract_text(code.children()), "fn main() {\t}");
    }
}
