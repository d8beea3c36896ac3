use std::collections::HashSet;

use metrics_util::debugging::DebuggingRecorder;
use quire::{
    application::render::{RenderRequest, RenderService, render_service},
    domain::document::Document,
    infra::telemetry,
};

#[test]
fn rendering_emits_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let document = Document::from_json(include_str!("fixtures/post.json")).expect("fixture");
    render_service()
        .render(&RenderRequest::new(document))
        .expect("render succeeds");

    let snapshot = snapshotter.snapshot().into_vec();
    let names: HashSet<String> = snapshot
        .iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    for metric in [
        "quire_render_documents_total",
        "quire_render_degraded_total",
        "quire_render_ms",
    ] {
        assert!(names.contains(metric), "missing metric: {metric}");
    }

    let reasons: HashSet<String> = snapshot
        .iter()
        .filter(|(composite_key, _, _, _)| {
            composite_key.key().name() == "quire_render_degraded_total"
        })
        .flat_map(|(composite_key, _, _, _)| {
            composite_key
                .key()
                .labels()
                .filter(|label| label.key() == "reason")
                .map(|label| label.value().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    assert_eq!(
        reasons,
        HashSet::from(["unknown_node".to_string(), "unresolved_media".to_string()])
    );
}
