//! Modelo de definiciones: inputs/outputs tipados, solids, dependencias y
//! pipelines.
//!
//! Las definiciones son inmutables tras su construcción y no guardan estado
//! de ejecución. Toda la validación del grafo ocurre en tiempo de
//! construcción (`PipelineDefinition::new`): un grafo inválido nunca llega a
//! ejecutarse.

pub mod dependency;
pub mod io;
pub mod pipeline;
pub mod solid;

pub use dependency::{DependencyDefinition, DependencyMap};
pub use io::{DataType, InputDefinition, OutputDefinition};
pub use pipeline::PipelineDefinition;
pub use solid::{ComputeOutput, EmittedStream, InputValues, SolidCompute, SolidDefinition};
