//! Shape guards over untyped editor JSON.
//!
//! Guards never panic: a value that does not match yields `false` or `None`.

use serde_json::Value;

use super::{document::TextRun, format::TextFormat, media::MediaObject};

/// Node types whose payload is a run of text.
const TEXT_RUN_TYPES: &[&str] = &["text", "code-highlight", "tab"];
const LINK_TYPES: &[&str] = &["link", "autolink"];

/// The `type` discriminator of a node object.
pub fn node_type(value: &Value) -> Option<&str> {
    value.as_object()?.get("type")?.as_str()
}

pub fn is_text_run(value: &Value) -> bool {
    as_text_run(value).is_some()
}

/// Narrow a value to a text run. `tab` nodes without text read as a tab.
pub fn as_text_run(value: &Value) -> Option<TextRun> {
    let kind = node_type(value)?;
    if !TEXT_RUN_TYPES.contains(&kind) {
        return None;
    }

    let text = match value.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None if kind == "tab" => "\t".to_string(),
        None => return None,
    };

    let format = value
        .get("format")
        .and_then(Value::as_u64)
        .map(TextFormat::from_mask)
        .unwrap_or_default();
    let style = value
        .get("style")
        .and_then(Value::as_str)
        .filter(|style| !style.trim().is_empty())
        .map(str::to_string);

    Some(TextRun {
        text,
        format,
        style,
    })
}

pub fn is_link_node(value: &Value) -> bool {
    node_type(value).is_some_and(|kind| LINK_TYPES.contains(&kind))
}

pub fn is_line_break(value: &Value) -> bool {
    node_type(value) == Some("linebreak")
}

/// Only an explicit JSON array counts as children.
pub fn has_children(value: &Value) -> bool {
    children_of(value).is_some()
}

pub fn children_of(value: &Value) -> Option<&[Value]> {
    value
        .as_object()?
        .get("children")?
        .as_array()
        .map(Vec::as_slice)
}

pub fn is_media_with_dimensions(value: &Value) -> bool {
    as_media_with_dimensions(value).is_some()
}

pub fn as_media_with_dimensions(value: &Value) -> Option<MediaObject> {
    MediaObject::from_value(value)
}
