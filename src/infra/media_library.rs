//! File-backed media collaborator.
//!
//! Loads media documents exported from the CMS, either as a JSON array of
//! documents carrying `id`, or as an object keyed by id.

use std::{collections::HashMap, fs, path::Path};

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::media::{MediaId, MediaObject, MediaResolver};

use super::error::InfraError;

#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    entries: HashMap<MediaId, MediaObject>,
}

impl MediaLibrary {
    pub fn from_path(path: &Path) -> Result<Self, InfraError> {
        let json = fs::read_to_string(path).map_err(|err| InfraError::read_file(path, err))?;
        let library = Self::from_json(&json)?;
        info!(
            target = "quire::infra::media_library",
            path = %path.display(),
            entries = library.len(),
            "media library loaded"
        );
        Ok(library)
    }

    pub fn from_json(json: &str) -> Result<Self, InfraError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| InfraError::media_library(format!("invalid JSON: {err}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, InfraError> {
        let mut entries = HashMap::new();
        match value {
            Value::Array(documents) => {
                for (index, document) in documents.iter().enumerate() {
                    let Some(id) = document.get("id").and_then(MediaId::from_value) else {
                        warn!(
                            target = "quire::infra::media_library",
                            index,
                            "skipping media document without id"
                        );
                        continue;
                    };
                    insert(&mut entries, id, document);
                }
            }
            Value::Object(documents) => {
                for (key, document) in documents {
                    insert(&mut entries, MediaId::parse(key), document);
                }
            }
            _ => {
                return Err(InfraError::media_library(
                    "expected an array of media documents or an object keyed by id",
                ));
            }
        }

        Ok(Self { entries })
    }

    pub fn insert(&mut self, id: MediaId, media: MediaObject) {
        self.entries.insert(id, media);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert(entries: &mut HashMap<MediaId, MediaObject>, id: MediaId, document: &Value) {
    match MediaObject::from_value(document) {
        Some(media) => {
            entries.insert(id, media);
        }
        None => warn!(
            target = "quire::infra::media_library",
            id = %id,
            "skipping incomplete media document"
        ),
    }
}

impl MediaResolver for MediaLibrary {
    fn resolve(&self, id: &MediaId) -> Option<MediaObject> {
        self.entries.get(id).cloned()
    }
}
