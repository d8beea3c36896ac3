use crate::{
    application::render::{
        types::{Element, PresentationNode, RenderError},
        walker::TreeWalker,
    },
    domain::{
        document::{Node, NodeValue},
        format::{Decoration, TextFormat},
    },
};

/// Wrap `text` in one element per active format flag, bold outermost and
/// superscript innermost. Inline code carries `inline_code_class`.
pub fn decorate(text: &str, format: TextFormat, inline_code_class: &str) -> PresentationNode {
    wrap(PresentationNode::text(text), format, inline_code_class)
}

fn wrap(inner: PresentationNode, format: TextFormat, inline_code_class: &str) -> PresentationNode {
    format.decorations().rev().fold(inner, |inner, decoration| {
        let element = Element::new(decoration.tag());
        let element = match decoration {
            Decoration::Code => element.class(inline_code_class),
            _ => element,
        };
        element.child(inner).into()
    })
}

pub(crate) fn text(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    let NodeValue::Text(run) = &node.value else {
        return Ok(PresentationNode::Empty);
    };

    let inner = match run.style.as_deref() {
        Some(style) => Element::new("span")
            .attr("style", style)
            .child(PresentationNode::text(&run.text))
            .into(),
        None => PresentationNode::text(&run.text),
    };

    Ok(wrap(inner, run.format, &walker.classes().inline_code))
}

pub(crate) fn line_break(
    _node: &Node,
    _walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    Ok(Element::new("br").into())
}

pub(crate) fn horizontal_rule(
    _node: &Node,
    _walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    Ok(Element::new("hr").into())
}
