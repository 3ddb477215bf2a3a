//! Implementación del motor de ejecución.
//!
//! Modelo de scheduling: un solo hilo, steps estrictamente secuenciales en
//! orden de plan. La secuencialidad es parte del contrato de corrección: los
//! inputs del step N se leen de los outputs en memoria de steps que
//! corrieron estrictamente antes, y cada step forma un bloque contiguo de
//! eventos sin interleaving.

use std::time::Instant;

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use super::state::StepState;
use crate::context::{Resources, RunContext, StepContext};
use crate::definition::{ComputeOutput, InputValues, PipelineDefinition, SolidDefinition};
use crate::errors::CoreEngineError;
use crate::event::{EventData, EventSink, InMemoryEventSink};
use crate::model::{EmittedValue, ReturnedValue};
use crate::plan::{ExecutionPlan, ExecutionStep, StepInputSource};
use crate::result::PipelineExecutionResult;

/// Valores suministrados por el llamador para inputs sin binding:
/// `solid -> (input -> valor)`.
pub type ExternalInputs = IndexMap<String, IndexMap<String, Value>>;

/// Motor de ejecución de pipelines, genérico sobre el sink de eventos.
#[derive(Debug)]
pub struct PipelineEngine<S: EventSink> {
    sink: S,
}

impl PipelineEngine<InMemoryEventSink> {
    /// Motor con sink en memoria, suficiente para el caso común.
    pub fn new() -> Self {
        Self { sink: InMemoryEventSink::new() }
    }
}

impl Default for PipelineEngine<InMemoryEventSink> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resultado de drenar la secuencia emitida de un step.
enum DrainOutcome {
    /// Secuencia agotada sin error; outputs registrados por nombre.
    Completed { outputs: IndexMap<String, Value> },
    /// Error de código de usuario: fallo ordinario de step.
    UserFailure { error: CoreEngineError },
}

impl<S: EventSink> PipelineEngine<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Punto de entrada único: compila el plan y ejecuta el run completo.
    pub fn execute(&mut self, pipeline: &PipelineDefinition) -> Result<PipelineExecutionResult, CoreEngineError> {
        self.execute_with(pipeline, ExternalInputs::new(), Resources::new())
    }

    /// Variante con valores externos para inputs sin binding y recursos.
    pub fn execute_with(&mut self,
                        pipeline: &PipelineDefinition,
                        external: ExternalInputs,
                        resources: Resources)
                        -> Result<PipelineExecutionResult, CoreEngineError> {
        let plan = ExecutionPlan::build(pipeline)?;
        check_external_inputs(&plan, &external)?;

        let run = RunContext::new(resources);
        let run_id = run.run_id;
        tracing::debug!(run_id = %run_id,
                        pipeline = pipeline.name(),
                        steps = plan.len(),
                        "starting pipeline run");

        let mut states: IndexMap<String, StepState> =
            plan.steps().iter().map(|s| (s.solid_name.clone(), StepState::Pending)).collect();
        // Outputs retenidos en memoria durante el run: solid -> (output -> valor).
        // Inmutables una vez registrados; sólo el motor escribe, una vez por step.
        let mut recorded: IndexMap<String, IndexMap<String, Value>> = IndexMap::new();

        for step in plan.steps() {
            let solid = pipeline.solid(&step.solid_name)
                                .ok_or_else(|| CoreEngineError::invariant(format!(
                                    "execution plan references unknown solid '{}'",
                                    step.solid_name
                                )))?;
            let name = solid.name();

            // Corte por fallo upstream: el productor nunca llegó a Succeeded,
            // así que este step no emite ni siquiera StepStart.
            let blocked = step.upstream_solids()
                              .iter()
                              .any(|p| states.get(*p) != Some(&StepState::Succeeded));
            if blocked {
                states.insert(name.to_string(), StepState::Skipped);
                tracing::debug!(run_id = %run_id, step = name, "skipping step: upstream producer did not succeed");
                continue;
            }

            states.insert(name.to_string(), StepState::Running);
            self.sink.append(run_id, name, EventData::StepStart);
            tracing::debug!(run_id = %run_id, step = name, "step started");

            let inputs = resolve_inputs(step, name, &recorded, &external)?;
            let ctx = StepContext::new(&run, name);

            // El reloj abraza la invocación completa: trabajo antes del
            // primer valor emitido y después del último son del step.
            let clock = Instant::now();
            let outcome = match solid.invoke(&ctx, &inputs) {
                Ok(output) => self.drain(run_id, solid, output)?,
                Err(error @ CoreEngineError::UserCode { .. }) => DrainOutcome::UserFailure { error },
                Err(fatal) => return Err(fatal),
            };
            let duration_ms = clock.elapsed().as_secs_f64() * 1000.0;

            match outcome {
                DrainOutcome::Completed { outputs } => {
                    recorded.insert(name.to_string(), outputs);
                    states.insert(name.to_string(), StepState::Succeeded);
                    self.sink.append(run_id, name, EventData::StepSuccess { duration_ms });
                    tracing::debug!(run_id = %run_id, step = name, duration_ms, "step succeeded");
                }
                DrainOutcome::UserFailure { error } => {
                    states.insert(name.to_string(), StepState::Failed);
                    tracing::warn!(run_id = %run_id, step = name, %error, "step failed");
                    self.sink.append(run_id, name, EventData::StepFailure { error });
                }
            }
        }

        let events = self.sink.list(run_id);
        let result = PipelineExecutionResult::new(run_id, events);
        tracing::debug!(run_id = %run_id, success = result.success(), "pipeline run finished");
        Ok(result)
    }

    /// Drena la secuencia emitida hasta agotarla, emitiendo eventos de
    /// expectativa y materialización en el orden exacto de producción.
    fn drain(&mut self,
             run_id: Uuid,
             solid: &SolidDefinition,
             output: ComputeOutput)
             -> Result<DrainOutcome, CoreEngineError> {
        let name = solid.name();
        match output {
            ComputeOutput::Returned(ReturnedValue::Expectation(_))
            | ComputeOutput::Returned(ReturnedValue::Materialization(_)) => {
                // Ambiguo con "este es el output implícito del step": se
                // rechaza en el acto y aborta el run.
                Err(CoreEngineError::invariant(format!(
                    "Error in solid {name}: If you are returning a Materialization or an \
                     ExpectationResult from solid you must yield them to avoid ambiguity with an \
                     implied result from returning a value."
                )))
            }
            ComputeOutput::Returned(ReturnedValue::Value(value)) => match solid.outputs() {
                [] if value.is_null() => Ok(DrainOutcome::Completed { outputs: IndexMap::new() }),
                [] => Err(CoreEngineError::invariant(format!(
                    "solid '{name}' returned a value but declares no outputs"
                ))),
                [only] => {
                    let mut outputs = IndexMap::new();
                    outputs.insert(only.name.clone(), value);
                    Ok(DrainOutcome::Completed { outputs })
                }
                many => Err(CoreEngineError::invariant(format!(
                    "solid '{name}' declares {} outputs; a plain returned value is ambiguous, yield \
                     named outputs instead",
                    many.len()
                ))),
            },
            ComputeOutput::Yielded(stream) => {
                let mut outputs: IndexMap<String, Value> = IndexMap::new();
                for item in stream {
                    match item {
                        Ok(EmittedValue::Output(out)) => {
                            if solid.output(&out.output_name).is_none() {
                                return Err(CoreEngineError::invariant(format!(
                                    "solid '{name}' yielded output '{}' but does not declare it",
                                    out.output_name
                                )));
                            }
                            if outputs.insert(out.output_name.clone(), out.value).is_some() {
                                return Err(CoreEngineError::invariant(format!(
                                    "solid '{name}' yielded output '{}' more than once",
                                    out.output_name
                                )));
                            }
                        }
                        Ok(EmittedValue::Expectation(expectation_result)) => {
                            self.sink.append(run_id, name, EventData::StepExpectationResult { expectation_result });
                        }
                        Ok(EmittedValue::Materialization(materialization)) => {
                            self.sink.append(run_id, name, EventData::StepMaterialization { materialization });
                        }
                        Err(error @ CoreEngineError::UserCode { .. }) => {
                            return Ok(DrainOutcome::UserFailure { error });
                        }
                        Err(fatal) => return Err(fatal),
                    }
                }
                Ok(DrainOutcome::Completed { outputs })
            }
        }
    }
}

/// El pipeline no es ejecutable si un input sin binding tampoco recibió
/// valor externo. Se comprueba antes de emitir ningún evento.
fn check_external_inputs(plan: &ExecutionPlan, external: &ExternalInputs) -> Result<(), CoreEngineError> {
    for step in plan.steps() {
        for (input_name, source) in &step.input_sources {
            if matches!(source, StepInputSource::External)
               && external.get(&step.solid_name).and_then(|m| m.get(input_name)).is_none()
            {
                return Err(CoreEngineError::invalid_definition(format!(
                    "input '{input_name}' of solid '{}' has no dependency binding and no externally \
                     supplied value",
                    step.solid_name
                )));
            }
        }
    }
    Ok(())
}

/// Lee el valor concreto de cada input declarado desde los outputs
/// retenidos de su productor (nunca se recomputan) o del suministro externo.
fn resolve_inputs(step: &ExecutionStep,
                  name: &str,
                  recorded: &IndexMap<String, IndexMap<String, Value>>,
                  external: &ExternalInputs)
                  -> Result<InputValues, CoreEngineError> {
    let mut inputs = InputValues::new();
    for (input_name, source) in &step.input_sources {
        let value = match source {
            StepInputSource::DependsOn { solid, output } => {
                recorded.get(solid)
                        .and_then(|m| m.get(output))
                        .cloned()
                        .ok_or_else(|| CoreEngineError::invariant(format!(
                            "producer '{solid}' recorded no output '{output}' required by input \
                             '{input_name}' of solid '{name}'"
                        )))?
            }
            StepInputSource::External => {
                external.get(name)
                        .and_then(|m| m.get(input_name))
                        .cloned()
                        .ok_or_else(|| CoreEngineError::invariant(format!(
                            "external value for input '{input_name}' of solid '{name}' disappeared \
                             after pre-flight check"
                        )))?
            }
        };
        inputs.insert(input_name.clone(), value);
    }
    Ok(inputs)
}

/// Ejecuta un pipeline con sink en memoria y sin inputs externos.
pub fn execute_pipeline(pipeline: &PipelineDefinition) -> Result<PipelineExecutionResult, CoreEngineError> {
    PipelineEngine::new().execute(pipeline)
}

/// Ejecuta un pipeline con valores externos y recursos.
pub fn execute_pipeline_with(pipeline: &PipelineDefinition,
                             external: ExternalInputs,
                             resources: Resources)
                             -> Result<PipelineExecutionResult, CoreEngineError> {
    PipelineEngine::new().execute_with(pipeline, external, resources)
}
