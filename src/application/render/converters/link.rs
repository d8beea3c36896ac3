use crate::{
    application::render::{
        types::{Element, PresentationNode, RenderError},
        walker::{Degradation, TreeWalker},
    },
    domain::{
        document::{Node, NodeValue},
        links::{LinkKind, PLACEHOLDER_HREF},
    },
};

const NEW_TAB_REL: &str = "noopener noreferrer";

pub(crate) fn link(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    let NodeValue::Link(link) = &node.value else {
        return Ok(PresentationNode::Empty);
    };

    let href = walker.resolve_href(&link.target);
    if href == PLACEHOLDER_HREF {
        walker.degrade(Degradation::UnresolvedLink, node.type_name());
    }

    let mut anchor = Element::new("a")
        .attr("data-link-kind", LinkKind::classify(&href).as_str())
        .attr("href", href)
        .class(&walker.classes().link);
    if link.new_tab {
        anchor = anchor.attr("target", "_blank").attr("rel", NEW_TAB_REL);
    }

    Ok(anchor.children(walker.render_all(&link.children)?).into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::application::render::{
        registry::ConverterRegistry,
        types::{Element, RenderOptions},
        walker::TreeWalker,
    };
    use crate::domain::{document::Node, links::CollectionLinkResolver, media::NoMedia};

    fn render_link(value: serde_json::Value) -> Element {
        let registry = ConverterRegistry::with_defaults();
        let links = CollectionLinkResolver::default();
        let options = RenderOptions::default();
        let walker = TreeWalker::new(&registry, &NoMedia, &links, &options);
        walker
            .render(&Node::from_value(&value))
            .expect("render")
            .as_element()
            .cloned()
            .expect("anchor element")
    }

    #[test]
    fn internal_posts_resolve_to_blog_path() {
        let anchor = render_link(json!({
            "type": "link",
            "fields": {
                "linkType": "internal",
                "doc": { "relationTo": "posts", "value": { "id": 1, "slug": "hello" } }
            },
            "children": [{ "type": "text", "text": "Hello" }]
        }));
        assert_eq!(anchor.attribute("href"), Some("/blog/hello"));
        assert_eq!(anchor.attribute("data-link-kind"), Some("internal"));
        assert_eq!(anchor.attribute("target"), None);
    }

    #[test]
    fn unpopulated_document_falls_back_to_placeholder() {
        let anchor = render_link(json!({
            "type": "link",
            "fields": { "linkType": "internal", "doc": { "relationTo": "pages", "value": 42 } },
            "children": []
        }));
        assert_eq!(anchor.attribute("href"), Some("#"));
        assert_eq!(anchor.attribute("data-link-kind"), Some("anchor"));
    }

    #[test]
    fn new_tab_adds_target_and_rel_only() {
        let anchor = render_link(json!({
            "type": "link",
            "fields": { "url": "https://example.com/a", "newTab": true },
            "children": [{ "type": "text", "text": "out", "format": 2 }]
        }));
        assert_eq!(anchor.attribute("href"), Some("https://example.com/a"));
        assert_eq!(anchor.attribute("target"), Some("_blank"));
        assert_eq!(anchor.attribute("rel"), Some("noopener noreferrer"));
        assert_eq!(anchor.children[0].as_element().map(|el| el.tag.as_str()), Some("em"));
    }
}
