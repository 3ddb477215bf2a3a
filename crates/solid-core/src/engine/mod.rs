//! Motor de ejecución: recorre el plan compilado, invoca cada compute
//! capability y produce el audit trail ordenado del run.

pub mod core;
mod state;

pub use self::core::{execute_pipeline, execute_pipeline_with, ExternalInputs, PipelineEngine};
pub use state::StepState;
