//! Integración a nivel workspace: adapters + core por el contrato público.

use indexmap::indexmap;
use serde_json::json;
use solid_adapters::{acquire_dataset, check_min_rows, mean_features};
use solid_core::{execute_pipeline_with, DependencyDefinition, ExternalInputs, PipelineDefinition,
                 PipelineEventType, Resources};

#[test]
fn two_consumer_demo_pipeline_produces_an_ordered_audit_trail() {
    let pipeline = PipelineDefinition::new(
        "dataset_demo",
        vec![acquire_dataset(), mean_features(), check_min_rows(2)],
        indexmap! {
            "mean_features".to_string() => indexmap! {
                "records".to_string() => DependencyDefinition::from_output("acquire_dataset", "records"),
            },
            "check_min_rows".to_string() => indexmap! {
                "records".to_string() => DependencyDefinition::from_output("acquire_dataset", "records"),
            },
        },
    )
    .expect("valid demo pipeline");

    let external: ExternalInputs = indexmap! {
        "acquire_dataset".to_string() => indexmap! { "dataset".to_string() => json!("iris_mini") },
    };
    let result = execute_pipeline_with(&pipeline, external, Resources::new()).expect("run completes");
    assert!(result.success());

    // El productor completa antes de que arranque cualquier consumidor.
    let events = result.events();
    let acquire_success = events.iter()
                                .position(|e| e.step_name == "acquire_dataset"
                                              && e.event_type() == PipelineEventType::StepSuccess)
                                .unwrap();
    for consumer in ["mean_features", "check_min_rows"] {
        let start = events.iter()
                          .position(|e| e.step_name == consumer
                                        && e.event_type() == PipelineEventType::StepStart)
                          .unwrap();
        assert!(acquire_success < start, "{consumer} started before its producer succeeded");
    }

    // seq estrictamente creciente: el audit trail es append-only.
    for pair in events.windows(2) {
        assert!(pair[0].seq < pair[1].seq);
    }
}
