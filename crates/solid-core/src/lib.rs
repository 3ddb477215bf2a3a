//! solid-core: motor de orquestación de pipelines tipados.
//!
//! Un usuario declara unidades de cómputo ("solids") con entradas y salidas
//! nombradas y tipadas, las cablea en un DAG con bindings explícitos, el
//! compilador de grafo produce un plan determinista y el motor lo ejecuta
//! emitiendo un audit trail ordenado (inicios, éxitos, fallos, expectativas,
//! materializaciones, timing).

pub mod context;
pub mod definition;
pub mod engine;
pub mod errors;
pub mod event;
pub mod model;
pub mod plan;
pub mod result;

pub use context::{Resources, RunContext, StepContext};
pub use definition::{ComputeOutput, DataType, DependencyDefinition, DependencyMap, EmittedStream,
                     InputDefinition, InputValues, OutputDefinition, PipelineDefinition, SolidCompute,
                     SolidDefinition};
pub use engine::{execute_pipeline, execute_pipeline_with, ExternalInputs, PipelineEngine, StepState};
pub use errors::CoreEngineError;
pub use event::{EventData, EventSink, InMemoryEventSink, PipelineEvent, PipelineEventType};
pub use model::{EmittedValue, ExpectationResult, Materialization, Output, ReturnedValue, DEFAULT_OUTPUT};
pub use plan::{ExecutionPlan, ExecutionStep, StepInputSource};
pub use result::{PipelineExecutionResult, SolidExecutionResult};

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use serde_json::json;

    fn source(name: &str, value: serde_json::Value) -> SolidDefinition {
        SolidDefinition::single_output(name, DataType::Json, move |_ctx: &StepContext<'_>,
                                        _inputs: &InputValues| {
            Ok(ComputeOutput::returned(value.clone()))
        })
    }

    #[test]
    fn linear_pipeline_runs_in_order_and_succeeds() {
        let double = SolidDefinition::new(
            "double",
            vec![InputDefinition::new("n", DataType::Json)],
            vec![OutputDefinition::new(DEFAULT_OUTPUT, DataType::Json)],
            |_ctx: &StepContext<'_>, inputs: &InputValues| {
                let n = inputs["n"].as_i64().unwrap_or(0);
                Ok(ComputeOutput::returned(json!(n * 2)))
            },
        );

        let pipeline = PipelineDefinition::new(
            "linear",
            vec![source("emit", json!(21)), double],
            indexmap! {
                "double".to_string() => indexmap! {
                    "n".to_string() => DependencyDefinition::new("emit"),
                },
            },
        )
        .unwrap();

        let result = execute_pipeline(&pipeline).unwrap();
        assert!(result.success());

        let types: Vec<PipelineEventType> = result.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(types,
                   vec![PipelineEventType::StepStart,
                        PipelineEventType::StepSuccess,
                        PipelineEventType::StepStart,
                        PipelineEventType::StepSuccess]);
        assert!(result.result_for_solid("double").unwrap().success());
    }

    #[test]
    fn emitted_values_preserve_their_order() {
        let chatty = SolidDefinition::new(
            "chatty",
            vec![],
            vec![OutputDefinition::new(DEFAULT_OUTPUT, DataType::Json)],
            |_ctx: &StepContext<'_>, _inputs: &InputValues| {
                Ok(ComputeOutput::values(vec![
                    EmittedValue::Expectation(ExpectationResult::passed("pre-check")),
                    EmittedValue::Output(Output::new(json!(1))),
                    EmittedValue::Materialization(Materialization::new("/tmp/chatty.json")),
                    EmittedValue::Expectation(ExpectationResult::failed("post-check")),
                ]))
            },
        );

        let pipeline = PipelineDefinition::new("chatty", vec![chatty], DependencyMap::new()).unwrap();
        let result = execute_pipeline(&pipeline).unwrap();
        assert!(result.success());

        // El orden de emisión del capability se preserva tal cual; nunca se
        // reordena por tipo.
        let types: Vec<PipelineEventType> = result.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(types,
                   vec![PipelineEventType::StepStart,
                        PipelineEventType::StepExpectationResult,
                        PipelineEventType::StepMaterialization,
                        PipelineEventType::StepExpectationResult,
                        PipelineEventType::StepSuccess]);
    }

    #[test]
    fn externally_supplied_inputs_reach_the_solid() {
        let shout = SolidDefinition::new(
            "shout",
            vec![InputDefinition::new("word", DataType::String)],
            vec![OutputDefinition::new(DEFAULT_OUTPUT, DataType::String)],
            |_ctx: &StepContext<'_>, inputs: &InputValues| {
                let word = inputs["word"].as_str().unwrap_or_default().to_uppercase();
                Ok(ComputeOutput::returned(json!(word)))
            },
        );
        let pipeline = PipelineDefinition::new("ext", vec![shout], DependencyMap::new()).unwrap();

        // Sin valor externo el pipeline no es ejecutable.
        let err = execute_pipeline(&pipeline).unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(_)));

        let external: ExternalInputs = indexmap! {
            "shout".to_string() => indexmap! { "word".to_string() => json!("hola") },
        };
        let result = execute_pipeline_with(&pipeline, external, Resources::new()).unwrap();
        assert!(result.success());
    }
}
