//! Media references embedded in documents.
//!
//! The editor stores uploads either as a bare id or as the populated media
//! document. Only a document with a string `url`, numeric `width` and
//! `height`, and a string `filename` counts as resolved; anything else is
//! carried as [`MediaRef::Unresolved`] and renders as nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a media document, numeric or textual depending on the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaId {
    Number(i64),
    Text(String),
}

impl MediaId {
    /// Read an id from JSON. Numeric strings such as `"7"` become numbers so
    /// they match ids stored as JSON numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().map(MediaId::Number),
            Value::String(text) if !text.trim().is_empty() => Some(Self::parse(text)),
            _ => None,
        }
    }

    pub fn parse(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(id) => MediaId::Number(id),
            Err(_) => MediaId::Text(text.to_string()),
        }
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaId::Number(id) => write!(f, "{id}"),
            MediaId::Text(id) => f.write_str(id),
        }
    }
}

/// A fully resolved media asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaObject {
    pub id: Option<MediaId>,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub filename: String,
    pub alt: Option<String>,
    pub mime_type: Option<String>,
}

impl MediaObject {
    /// Validate an untyped media document. Returns `None` when any of `url`,
    /// `width`, `height` or `filename` is missing or mistyped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let url = object.get("url")?.as_str()?.to_string();
        let width = dimension(object.get("width")?)?;
        let height = dimension(object.get("height")?)?;
        let filename = object.get("filename")?.as_str()?.to_string();

        Some(Self {
            id: object.get("id").and_then(MediaId::from_value),
            url,
            width,
            height,
            filename,
            alt: non_empty_string(object.get("alt")),
            mime_type: non_empty_string(object.get("mimeType")),
        })
    }

    /// Broad media family derived from the MIME type. Missing types are
    /// treated as images, which is what the editor uploads by default.
    pub fn kind(&self) -> MediaKind {
        match self.mime_type.as_deref() {
            None => MediaKind::Image,
            Some(mime) if mime.starts_with("image/") => MediaKind::Image,
            Some(mime) if mime.starts_with("video/") => MediaKind::Video,
            Some(_) => MediaKind::File,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    File,
}

/// A media reference as found in the document, with an explicit marker for
/// whether the asset is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    Resolved(MediaObject),
    Unresolved { id: Option<MediaId> },
}

impl MediaRef {
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return MediaRef::Unresolved { id: None };
        };

        if let Some(media) = MediaObject::from_value(value) {
            return MediaRef::Resolved(media);
        }

        let id = match value {
            Value::Object(object) => object.get("id").and_then(MediaId::from_value),
            other => MediaId::from_value(other),
        };
        MediaRef::Unresolved { id }
    }

    pub fn resolved(&self) -> Option<&MediaObject> {
        match self {
            MediaRef::Resolved(media) => Some(media),
            MediaRef::Unresolved { .. } => None,
        }
    }
}

/// Collaborator that turns media ids into resolved media documents.
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, id: &MediaId) -> Option<MediaObject>;
}

/// Resolver used when the caller supplies fully populated documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMedia;

impl MediaResolver for NoMedia {
    fn resolve(&self, _id: &MediaId) -> Option<MediaObject> {
        None
    }
}

fn dimension(value: &Value) -> Option<u32> {
    let raw = value.as_f64()?;
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(u32::MAX) {
        return None;
    }
    Some(raw.round() as u32)
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
