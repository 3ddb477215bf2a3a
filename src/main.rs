//! Demo del motor: pipeline de dos consumidores sobre un dataset adquirido.
//!
//! Forma del grafo (la clásica de un flujo de análisis):
//!
//! ```text
//! acquire_dataset ──┬──> mean_features
//!                   └──> check_min_rows
//! ```

mod logging;

use indexmap::indexmap;
use serde_json::json;
use solid_adapters::{acquire_dataset, check_min_rows, mean_features};
use solid_core::{execute_pipeline_with, CoreEngineError, DependencyDefinition, ExternalInputs,
                 PipelineDefinition, Resources};

fn build_demo_pipeline() -> Result<PipelineDefinition, CoreEngineError> {
    PipelineDefinition::new(
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
}

fn main() -> Result<(), CoreEngineError> {
    logging::init("info");

    let pipeline = build_demo_pipeline()?;
    let external: ExternalInputs = indexmap! {
        "acquire_dataset".to_string() => indexmap! { "dataset".to_string() => json!("iris_mini") },
    };

    let result = execute_pipeline_with(&pipeline, external, Resources::new())?;

    println!("run {} success={}", result.run_id(), result.success());
    for event in result.events() {
        println!("  [{}] {:<22} {:?}", event.seq, event.step_name, event.event_type());
    }

    for solid in ["acquire_dataset", "mean_features", "check_min_rows"] {
        if let Some(view) = result.result_for_solid(solid) {
            let duration = view.get_step_success_event().and_then(|e| e.duration_ms());
            println!("{solid}: success={} duration_ms={duration:?}", view.success());
            for exp in view.expectation_events() {
                let payload = exp.expectation_result().expect("expectation payload");
                println!("  expectation success={} message={}", payload.success, payload.message);
            }
        }
    }

    Ok(())
}
