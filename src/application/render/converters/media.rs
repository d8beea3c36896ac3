//! Uploads and the `image`/`video` blocks.
//!
//! Media that cannot be resolved renders as nothing.

use tracing::debug;

use crate::{
    application::render::{
        classes::ClassNames,
        types::{Element, PresentationNode, RenderError},
        walker::{Degradation, TreeWalker},
    },
    domain::{
        document::{BlockNode, Node, NodeValue},
        media::{MediaKind, MediaObject, MediaRef},
        video::{VideoSource, classify_video_source},
    },
};

const UPLOAD_ALT_FALLBACK: &str = "Upload";
const IMAGE_BLOCK_ALT_FALLBACK: &str = "Image block";
const YOUTUBE_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share";
const VIMEO_ALLOW: &str = "autoplay; fullscreen; picture-in-picture";
const VIDEO_UNSUPPORTED_NOTICE: &str = "Your browser does not support the video tag.";
const NEW_TAB_REL: &str = "noopener noreferrer";

pub(crate) fn upload(node: &Node, walker: &TreeWalker<'_>) -> Result<PresentationNode, RenderError> {
    let NodeValue::Upload(upload) = &node.value else {
        return Ok(PresentationNode::Empty);
    };

    let Some(media) = walker.resolve_media(&upload.media) else {
        walker.degrade(Degradation::UnresolvedMedia, node.type_name());
        return Ok(PresentationNode::Empty);
    };

    let classes = walker.classes();
    let content: PresentationNode = match media.kind() {
        MediaKind::Image => {
            let alt = alt_text(walker, &media, None, UPLOAD_ALT_FALLBACK);
            image(&media, alt, classes).into()
        }
        MediaKind::Video => Element::new("video")
            .class(&classes.video_player)
            .flag("controls")
            .attr("preload", "metadata")
            .child(
                Element::new("source")
                    .attr("src", &media.url)
                    .attr_opt("type", media.mime_type.as_deref()),
            )
            .child(PresentationNode::text(VIDEO_UNSUPPORTED_NOTICE))
            .into(),
        MediaKind::File => Element::new("a")
            .class(&classes.file_link)
            .attr("href", &media.url)
            .flag("download")
            .child(PresentationNode::text(&media.filename))
            .into(),
    };

    Ok(Element::new("div").class(&classes.upload).child(content).into())
}

/// `image` block: a resolved media document in `image` with an optional
/// `caption`.
pub fn image_block(
    block: &BlockNode,
    walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    let media_ref = MediaRef::from_value(block.field("image"));
    let Some(media) = walker.resolve_media(&media_ref) else {
        walker.degrade(Degradation::UnresolvedMedia, &block.block_type);
        return Ok(PresentationNode::Empty);
    };

    let classes = walker.classes();
    let caption = block.text_field("caption");
    let alt = alt_text(walker, &media, caption, IMAGE_BLOCK_ALT_FALLBACK);

    let mut figure = Element::new("figure")
        .class(&classes.figure)
        .child(image(&media, alt, classes));
    if let Some(caption) = caption {
        figure = figure.child(
            Element::new("figcaption")
                .class(&classes.figcaption)
                .child(PresentationNode::text(caption)),
        );
    }

    Ok(figure.into())
}

/// `video` block: `url` is classified and rendered as a hosted embed, a
/// native player, or an outbound link.
pub fn video_block(
    block: &BlockNode,
    walker: &TreeWalker<'_>,
) -> Result<PresentationNode, RenderError> {
    let Some(url) = block.text_field("url") else {
        debug!(
            target = "quire::render::media",
            block_type = %block.block_type,
            "video block without url"
        );
        walker.degrade(Degradation::MalformedNode, &block.block_type);
        return Ok(PresentationNode::Empty);
    };

    let classes = walker.classes();
    let source = classify_video_source(url);
    let content: PresentationNode = match &source {
        VideoSource::YouTube { .. } | VideoSource::Vimeo { .. } => {
            let (title, allow) = match source {
                VideoSource::YouTube { .. } => ("YouTube Video", YOUTUBE_ALLOW),
                _ => ("Vimeo Video", VIMEO_ALLOW),
            };
            let frame = Element::new("iframe")
                .attr_opt("src", source.embed_url())
                .attr("title", title)
                .class(&classes.video_embed)
                .attr("allow", allow)
                .flag("allowfullscreen")
                .attr("loading", "lazy");
            Element::new("div")
                .class(&classes.video_frame)
                .child(frame)
                .into()
        }
        VideoSource::DirectFile { container } => Element::new("div")
            .class(&classes.video_frame)
            .child(
                Element::new("video")
                    .class(&classes.video_player)
                    .flag("controls")
                    .attr("preload", "metadata")
                    .child(
                        Element::new("source")
                            .attr("src", url)
                            .attr("type", container.mime_type()),
                    )
                    .child(PresentationNode::text(VIDEO_UNSUPPORTED_NOTICE)),
            )
            .into(),
        VideoSource::Unrecognized => {
            walker.degrade(Degradation::UnrecognizedVideo, &block.block_type);
            Element::new("div")
                .class(&classes.video_fallback)
                .child(
                    Element::new("p")
                        .class(&classes.video_fallback_label)
                        .child(PresentationNode::text("Video URL:")),
                )
                .child(
                    Element::new("a")
                        .attr("href", url)
                        .attr("target", "_blank")
                        .attr("rel", NEW_TAB_REL)
                        .attr("data-link-kind", "external")
                        .class(&classes.video_fallback_link)
                        .child(PresentationNode::text(url)),
                )
                .into()
        }
    };

    Ok(Element::new("figure")
        .class(&classes.video_figure)
        .attr("data-video-source", source.label())
        .child(content)
        .into())
}

fn image(media: &MediaObject, alt: &str, classes: &ClassNames) -> Element {
    Element::new("img")
        .attr("src", &media.url)
        .attr("alt", alt)
        .attr("width", media.width.to_string())
        .attr("height", media.height.to_string())
        .class(&classes.image)
        .attr("loading", "lazy")
        .attr("decoding", "async")
}

/// Alt text falls back through the media's own alt, the caption, the
/// filename and finally a fixed label.
fn alt_text<'m>(
    walker: &TreeWalker<'_>,
    media: &'m MediaObject,
    caption: Option<&'m str>,
    fallback: &'static str,
) -> &'m str {
    if let Some(alt) = media.alt.as_deref() {
        return alt;
    }

    walker.note_missing_alt();
    caption
        .or_else(|| Some(media.filename.as_str()).filter(|name| !name.trim().is_empty()))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::application::render::{
        classes::ClassNames,
        registry::ConverterRegistry,
        types::{PresentationNode, RenderOptions},
        walker::TreeWalker,
    };
    use crate::domain::{
        document::Node,
        links::CollectionLinkResolver,
        media::{MediaId, MediaObject, MediaResolver, NoMedia},
    };

    struct OneImage;

    impl MediaResolver for OneImage {
        fn resolve(&self, id: &MediaId) -> Option<MediaObject> {
            (*id == MediaId::Number(7)).then(|| MediaObject {
                id: Some(MediaId::Number(7)),
                url: "/media/cat.png".into(),
                width: 640,
                height: 480,
                filename: "cat.png".into(),
                alt: None,
                mime_type: Some("image/png".into()),
            })
        }
    }

    fn render_with(media: &dyn MediaResolver, value: serde_json::Value) -> (PresentationNode, u32) {
        let registry = ConverterRegistry::with_defaults();
        let links = CollectionLinkResolver::default();
        let options = RenderOptions {
            classes: ClassNames::unstyled(),
            ..RenderOptions::default()
        };
        let walker = TreeWalker::new(&registry, media, &links, &options);
        let node = walker.render(&Node::from_value(&value)).expect("render");
        (node, walker.degraded_count())
    }

    fn render(value: serde_json::Value) -> PresentationNode {
        render_with(&NoMedia, value).0
    }

    fn find<'a>(node: &'a PresentationNode, tag: &str) -> Option<&'a crate::application::render::types::Element> {
        let element = node.as_element()?;
        if element.tag == tag {
            return Some(element);
        }
        element.children.iter().find_map(|child| find(child, tag))
    }

    #[test]
    fn upload_missing_width_renders_nothing() {
        let (node, degraded) = render_with(
            &NoMedia,
            json!({
                "type": "upload",
                "value": { "url": "/a.png", "height": 10, "filename": "a.png" }
            }),
        );
        assert_eq!(node, PresentationNode::Empty);
        assert_eq!(degraded, 1);
    }

    #[test]
    fn upload_alt_falls_back_to_filename() {
        let node = render(json!({
            "type": "upload",
            "value": { "url": "/a.png", "width": 10, "height": 20, "filename": "a.png" }
        }));
        let img = find(&node, "img").expect("img");
        assert_eq!(img.attribute("alt"), Some("a.png"));
        assert_eq!(img.attribute("width"), Some("10"));
        assert_eq!(img.attribute("loading"), Some("lazy"));
    }

    #[test]
    fn upload_id_resolves_through_media_resolver() {
        let (node, degraded) = render_with(
            &OneImage,
            json!({ "type": "upload", "relationTo": "media", "value": 7 }),
        );
        assert_eq!(degraded, 0);
        let img = find(&node, "img").expect("img");
        assert_eq!(img.attribute("src"), Some("/media/cat.png"));
    }

    #[test]
    fn non_image_uploads_pick_player_or_download() {
        let video = render(json!({
            "type": "upload",
            "value": { "url": "/v.webm", "width": 1, "height": 1,
                       "filename": "v.webm", "mimeType": "video/webm" }
        }));
        assert_eq!(
            find(&video, "source").and_then(|source| source.attribute("type")),
            Some("video/webm")
        );

        let file = render(json!({
            "type": "upload",
            "value": { "url": "/r.pdf", "width": 0, "height": 0,
                       "filename": "report.pdf", "mimeType": "application/pdf" }
        }));
        let link = find(&file, "a").expect("download link");
        assert_eq!(link.attribute("href"), Some("/r.pdf"));
        assert_eq!(link.children, vec![PresentationNode::text("report.pdf")]);
    }

    #[test]
    fn image_block_prefers_caption_for_alt_and_renders_figcaption() {
        let node = render(json!({
            "type": "block",
            "fields": {
                "blockType": "image",
                "caption": "A cat",
                "image": { "url": "/c.png", "width": 3, "height": 4, "filename": "c.png" }
            }
        }));
        assert_eq!(find(&node, "img").and_then(|img| img.attribute("alt")), Some("A cat"));
        assert_eq!(
            find(&node, "figcaption").map(|caption| caption.children.clone()),
            Some(vec![PresentationNode::text("A cat")])
        );
    }

    #[test]
    fn image_block_without_caption_omits_figcaption() {
        let node = render(json!({
            "type": "block",
            "fields": {
                "blockType": "image",
                "caption": "",
                "image": { "url": "/c.png", "width": 3, "height": 4,
                           "filename": "c.png", "alt": "Cat" }
            }
        }));
        assert!(find(&node, "figcaption").is_none());
        assert_eq!(find(&node, "img").and_then(|img| img.attribute("alt")), Some("Cat"));
    }

    #[test]
    fn video_block_variants() {
        let youtube = render(json!({
            "type": "block",
            "fields": { "blockType": "video", "url": "https://youtu.be/dQw4w9WgXcQ" }
        }));
        assert_eq!(
            find(&youtube, "iframe").and_then(|frame| frame.attribute("src")),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );

        let vimeo = render(json!({
            "type": "block",
            "fields": { "blockType": "video", "url": "https://vimeo.com/76979871" }
        }));
        assert_eq!(
            find(&vimeo, "iframe").and_then(|frame| frame.attribute("src")),
            Some("https://player.vimeo.com/video/76979871")
        );

        let direct = render(json!({
            "type": "block",
            "fields": { "blockType": "video", "url": "https://cdn.example.com/clip.MOV" }
        }));
        assert_eq!(
            find(&direct, "source").and_then(|source| source.attribute("type")),
            Some("video/quicktime")
        );

        let (unknown, degraded) = render_with(
            &NoMedia,
            json!({
                "type": "block",
                "fields": { "blockType": "video", "url": "https://example.com/watch" }
            }),
        );
        assert_eq!(degraded, 1);
        assert!(find(&unknown, "iframe").is_none());
        assert_eq!(
            find(&unknown, "a").and_then(|link| link.attribute("href")),
            Some("https://example.com/watch")
        );
    }

    #[test]
    fn video_url_is_classified_verbatim() {
        let (node, degraded) = render_with(
            &NoMedia,
            json!({
                "type": "block",
                "fields": { "blockType": "video", "url": "https://cdn.example.com/clip.mp4 " }
            }),
        );
        assert_eq!(degraded, 1);
        assert!(find(&node, "source").is_none());
        assert_eq!(
            find(&node, "a").and_then(|link| link.attribute("href")),
            Some("https://cdn.example.com/clip.mp4 ")
        );
    }

    #[test]
    fn video_block_without_url_renders_nothing() {
        let node = render(json!({ "type": "block", "fields": { "blockType": "video" } }));
        assert_eq!(node, PresentationNode::Empty);
    }

    #[test]
    fn unknown_block_type_renders_nothing() {
        let (node, degraded) = render_with(
            &NoMedia,
            json!({ "type": "block", "fields": { "blockType": "carousel", "slides": [] } }),
        );
        assert_eq!(node, PresentationNode::Empty);
        assert_eq!(degraded, 1);
    }
}
