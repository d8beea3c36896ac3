use crate::{
    application::render::{
        types::{Element, PresentationNode, RenderError},
        walker::TreeWalker,
    },
    domain::{
        anchor::heading_anchor_id,
        document::{
            ContainerKind, ContainerNode, ListStyle, Node, NodeValue, extract_code_text,
            extract_text,
        },
    },
};

fn container(node: &Node) -> Option<&ContainerNode> {
    match &node.value {
        NodeValue::Container(container) => Some(container),
        _ => None,
    }
}

fn wrap_children(
    tag: &str,
    class: &str,
    node: &Node,
    walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    Ok(Element::new(tag)
        .class(class)
        .children(walker.render_children(node)?)
        .into())
}

pub(crate) fn paragraph(
    node: &Node,
    walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    wrap_children("p", &walker.classes().paragraph, node, walker)
}

pub(crate) fn quote(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    wrap_children("blockquote", &walker.classes().quote, node, walker)
}

pub(crate) fn heading(
    node: &Node,
    walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    let Some(ContainerNode {
        kind: ContainerKind::Heading(level),
        children,
    }) = container(node)
    else {
        return Ok(PresentationNode::Empty);
    };

    let anchor = heading_anchor_id(&extract_text(children));
    Ok(Element::new(level.tag())
        .attr_opt("id", (!anchor.is_empty()).then_some(anchor))
        .class(walker.classes().heading(*level))
        .children(walker.render_all(children)?)
        .into())
}

pub(crate) fn list(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    let Some(ContainerNode {
        kind: ContainerKind::List(style),
        children,
    }) = container(node)
    else {
        return Ok(PresentationNode::Empty);
    };

    let classes = walker.classes();
    let mut items = Vec::with_capacity(children.len());
    for child in children {
        let item = match &child.value {
            NodeValue::Container(ContainerNode {
                kind: ContainerKind::ListItem { .. },
                ..
            }) => walker.render(child)?,
            _ => Element::new("li").class(&classes.list_item).into(),
        };
        if !item.is_empty() {
            items.push(item);
        }
    }

    let (tag, start) = match style {
        ListStyle::Number { start } => ("ol", (*start != 1).then(|| start.to_string())),
        ListStyle::Bullet | ListStyle::Check => ("ul", None),
    };

    Ok(Element::new(tag)
        .class(classes.list(*style))
        .attr_opt("start", start)
        .children(items)
        .into())
}

pub(crate) fn list_item(
    node: &Node,
    walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    let Some(ContainerNode {
        kind: ContainerKind::ListItem { checked },
        ..
    }) = container(node)
    else {
        return Ok(PresentationNode::Empty);
    };

    let mut item = Element::new("li").class(&walker.classes().list_item);
    if let Some(checked) = checked {
        item = item
            .attr("role", "checkbox")
            .attr("aria-checked", checked.to_string());
    }

    Ok(item.children(walker.render_children(node)?).into())
}

pub(crate) fn code(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    let Some(ContainerNode {
        kind: ContainerKind::Code { language },
        children,
    }) = container(node)
    else {
        return Ok(PresentationNode::Empty);
    };

    Ok(Element::new("pre")
        .class(&walker.classes().code_block)
        .attr_opt("data-language", language.as_deref())
        .child(Element::new("code").child(PresentationNode::text(extract_code_text(children))))
        .into())
}
