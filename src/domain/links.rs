//! Link targets and href resolution.

use std::collections::BTreeMap;

use serde_json::Value;

/// Href emitted whenever a target cannot be resolved.
pub const PLACEHOLDER_HREF: &str = "#";

const SLUG_PLACEHOLDER: &str = "{slug}";

/// A referenced document inside an internal link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    /// Only an id (or nothing usable) was stored; the document was not populated.
    Unresolved,
    /// The populated document. `slug` is kept verbatim and is `None` when
    /// missing or blank.
    Resolved { slug: Option<String> },
}

impl DocumentRef {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(object)) => DocumentRef::Resolved {
                slug: object
                    .get("slug")
                    .and_then(Value::as_str)
                    .filter(|slug| !slug.trim().is_empty())
                    .map(str::to_string),
            },
            _ => DocumentRef::Unresolved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    External {
        url: Option<String>,
    },
    Internal {
        collection: String,
        document: DocumentRef,
    },
}

impl LinkTarget {
    /// Read a link target from the editor's `fields` object.
    ///
    /// `linkType: "internal"` selects an internal target; any other explicit
    /// type is external. Without `linkType`, the presence of `doc` decides.
    pub fn from_fields(fields: Option<&Value>) -> Self {
        let fields = fields.and_then(Value::as_object);
        let link_type = fields
            .and_then(|fields| fields.get("linkType"))
            .and_then(Value::as_str);
        let doc = fields.and_then(|fields| fields.get("doc")).filter(|doc| !doc.is_null());

        let internal = match link_type {
            Some(kind) => kind == "internal",
            None => doc.is_some(),
        };

        if internal {
            let relation = doc.and_then(Value::as_object);
            let collection = relation
                .and_then(|relation| relation.get("relationTo"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let document = match collection {
                Some(_) => DocumentRef::from_value(relation.and_then(|r| r.get("value"))),
                None => DocumentRef::Unresolved,
            };
            return LinkTarget::Internal {
                collection: collection.unwrap_or_default(),
                document,
            };
        }

        LinkTarget::External {
            url: fields
                .and_then(|fields| fields.get("url"))
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}

/// Mapping of content collections to path templates containing `{slug}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRoutes {
    templates: BTreeMap<String, String>,
}

impl CollectionRoutes {
    pub fn new(templates: BTreeMap<String, String>) -> Self {
        Self { templates }
    }

    /// Add or replace the template of one collection.
    pub fn with_route(mut self, collection: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(collection.into(), template.into());
        self
    }

    pub fn template(&self, collection: &str) -> Option<&str> {
        self.templates.get(collection).map(String::as_str)
    }

    /// Path of a document with the given slug. Unknown collections fall back
    /// to `/{collection}/{slug}`.
    pub fn path_for(&self, collection: &str, slug: &str) -> String {
        match self.template(collection) {
            Some(template) => template.replace(SLUG_PLACEHOLDER, slug),
            None => format!("/{collection}/{slug}"),
        }
    }
}

impl Default for CollectionRoutes {
    fn default() -> Self {
        Self::new(BTreeMap::new())
            .with_route("posts", "/blog/{slug}")
            .with_route("pages", "/{slug}")
    }
}

/// Collaborator deciding the href of a link node.
pub trait LinkResolver: Send + Sync {
    fn resolve_href(&self, target: &LinkTarget) -> String;
}

/// Default resolver: external URLs pass through verbatim, internal documents
/// resolve through [`CollectionRoutes`].
#[derive(Debug, Clone, Default)]
pub struct CollectionLinkResolver {
    routes: CollectionRoutes,
}

impl CollectionLinkResolver {
    pub fn new(routes: CollectionRoutes) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &CollectionRoutes {
        &self.routes
    }
}

impl LinkResolver for CollectionLinkResolver {
    fn resolve_href(&self, target: &LinkTarget) -> String {
        match target {
            LinkTarget::External { url: Some(url) } => url.clone(),
            LinkTarget::External { url: None } => PLACEHOLDER_HREF.to_string(),
            LinkTarget::Internal {
                collection,
                document: DocumentRef::Resolved { slug: Some(slug) },
            } => self.routes.path_for(collection, slug),
            LinkTarget::Internal { .. } => PLACEHOLDER_HREF.to_string(),
        }
    }
}

/// Coarse classification of a rendered href.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    Anchor,
    Other,
}

impl LinkKind {
    pub fn classify(href: &str) -> Self {
        if href.is_empty() || href.starts_with('#') {
            return LinkKind::Anchor;
        }
        if is_external_http_url(href) {
            return LinkKind::External;
        }
        if is_internal_path(href) {
            return LinkKind::Internal;
        }
        LinkKind::Other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
            LinkKind::Anchor => "anchor",
            LinkKind::Other => "other",
        }
    }
}

fn is_internal_path(href: &str) -> bool {
    href.starts_with('/')
        || href.starts_with("./")
        || href.starts_with("../")
        || (!href.contains(':') && !href.starts_with("//"))
}

fn is_external_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolve(fields: Value) -> String {
        CollectionLinkResolver::default().resolve_href(&LinkTarget::from_fields(Some(&fields)))
    }

    #[test]
    fn external_url_passes_through_verbatim() {
        let href = resolve(json!({
            "linkType": "custom",
            "url": "https://example.com/path/",
            "newTab": true
        }));
        assert_eq!(href, "https://example.com/path/");
    }

    #[test]
    fn external_without_url_uses_placeholder() {
        assert_eq!(resolve(json!({ "linkType": "custom" })), "#");
    }

    #[test]
    fn internal_post_resolves_to_blog_path() {
        let href = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "posts", "value": { "id": 3, "slug": "hello" } }
        }));
        assert_eq!(href, "/blog/hello");
    }

    #[test]
    fn internal_page_and_unknown_collections() {
        let page = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "pages", "value": { "slug": "about" } }
        }));
        assert_eq!(page, "/about");

        let other = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "recipes", "value": { "slug": "soup" } }
        }));
        assert_eq!(other, "/recipes/soup");
    }

    #[test]
    fn internal_without_resolved_slug_uses_placeholder() {
        let id_only = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "posts", "value": 42 }
        }));
        assert_eq!(id_only, "#");

        let no_slug = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "posts", "value": { "id": 42 } }
        }));
        assert_eq!(no_slug, "#");

        let missing_doc = resolve(json!({ "linkType": "internal" }));
        assert_eq!(missing_doc, "#");
    }

    #[test]
    fn slugs_are_used_verbatim_and_blank_slugs_are_unresolved() {
        let padded = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "posts", "value": { "slug": " spaced " } }
        }));
        assert_eq!(padded, "/blog/ spaced ");

        let blank = resolve(json!({
            "linkType": "internal",
            "doc": { "relationTo": "posts", "value": { "slug": "   " } }
        }));
        assert_eq!(blank, "#");
    }

    #[test]
    fn doc_without_link_type_is_internal() {
        let target = LinkTarget::from_fields(Some(&json!({
            "doc": { "relationTo": "posts", "value": { "slug": "x" } }
        })));
        assert!(matches!(target, LinkTarget::Internal { .. }));
    }

    #[test]
    fn custom_routes_override_defaults() {
        let resolver = CollectionLinkResolver::new(
            CollectionRoutes::default().with_route("posts", "/articles/{slug}/"),
        );
        let target = LinkTarget::Internal {
            collection: "posts".into(),
            document: DocumentRef::Resolved {
                slug: Some("hi".into()),
            },
        };
        assert_eq!(resolver.resolve_href(&target), "/articles/hi/");
    }

    #[test]
    fn classify_links() {
        assert_eq!(LinkKind::classify("#"), LinkKind::Anchor);
        assert_eq!(LinkKind::classify("/blog/a"), LinkKind::Internal);
        assert_eq!(LinkKind::classify("https://a.dev"), LinkKind::External);
        assert_eq!(LinkKind::classify("mailto:a@b.c"), LinkKind::Other);
    }
}
