//! Definición de solid y contrato del compute capability.
//!
//! Un solid es una definición pura: nombre, entradas y salidas ordenadas y
//! una capacidad de cómputo. El motor no sabe (ni le importa) cómo está
//! implementada la capacidad por dentro; cualquier cosa que satisfaga
//! `SolidCompute` sirve — closures, structs, wrappers sobre artefactos
//! externos.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use super::io::{InputDefinition, OutputDefinition};
use crate::context::StepContext;
use crate::errors::CoreEngineError;
use crate::model::{EmittedValue, ReturnedValue};

/// Valores de entrada resueltos, en el orden de declaración de los inputs.
pub type InputValues = IndexMap<String, Value>;

/// Secuencia perezosa de valores emitidos: finita, no reiniciable, drenada
/// exactamente una vez por ejecución de step. Puede suspender entre
/// elementos (p. ej. I/O bloqueante); el motor espera de forma cooperativa.
pub type EmittedStream = Box<dyn Iterator<Item = Result<EmittedValue, CoreEngineError>>>;

/// Lo que produce una invocación del compute capability.
///
/// La ambigüedad duck-typed "¿generador o valor directo?" del ecosistema de
/// origen se vuelve explícita aquí: o la capacidad emitió una secuencia, o
/// retornó un único valor sin emitir nada.
pub enum ComputeOutput {
    /// La capacidad emitió una secuencia perezosa de valores.
    Yielded(EmittedStream),
    /// La capacidad retornó un valor único sin emitir.
    Returned(ReturnedValue),
}

impl ComputeOutput {
    /// Secuencia a partir de un iterador de resultados.
    pub fn yielded<I>(iter: I) -> Self
        where I: IntoIterator<Item = Result<EmittedValue, CoreEngineError>>,
              I::IntoIter: 'static
    {
        ComputeOutput::Yielded(Box::new(iter.into_iter()))
    }

    /// Secuencia a partir de valores ya materializados (todos `Ok`).
    pub fn values<I>(iter: I) -> Self
        where I: IntoIterator<Item = EmittedValue>,
              I::IntoIter: 'static
    {
        ComputeOutput::Yielded(Box::new(iter.into_iter().map(Ok)))
    }

    /// Retorno directo de un valor plano (output implícito).
    pub fn returned(value: Value) -> Self {
        ComputeOutput::Returned(ReturnedValue::Value(value))
    }
}

impl fmt::Debug for ComputeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeOutput::Yielded(_) => f.write_str("ComputeOutput::Yielded(..)"),
            ComputeOutput::Returned(v) => write!(f, "ComputeOutput::Returned({v:?})"),
        }
    }
}

/// Capacidad de cómputo de un solid.
///
/// Contrato: recibe el contexto del step y el mapeo de inputs resueltos;
/// produce o bien una secuencia finita de `EmittedValue` o bien un valor
/// retornado único. Un `Err` (en la invocación o dentro de la secuencia)
/// con variante `UserCode` es un fallo de step ordinario; cualquier otra
/// variante aborta el run.
pub trait SolidCompute {
    fn compute(&self, ctx: &StepContext<'_>, inputs: &InputValues) -> Result<ComputeOutput, CoreEngineError>;
}

impl<F> SolidCompute for F where F: Fn(&StepContext<'_>, &InputValues) -> Result<ComputeOutput, CoreEngineError>
{
    fn compute(&self, ctx: &StepContext<'_>, inputs: &InputValues) -> Result<ComputeOutput, CoreEngineError> {
        self(ctx, inputs)
    }
}

/// Definición inmutable de un solid: unidad de cómputo con entradas y
/// salidas nombradas y tipadas.
pub struct SolidDefinition {
    name: String,
    inputs: Vec<InputDefinition>,
    outputs: Vec<OutputDefinition>,
    compute: Box<dyn SolidCompute>,
}

impl SolidDefinition {
    pub fn new(name: impl Into<String>,
               inputs: Vec<InputDefinition>,
               outputs: Vec<OutputDefinition>,
               compute: impl SolidCompute + 'static)
               -> Self {
        Self { name: name.into(),
               inputs,
               outputs,
               compute: Box::new(compute) }
    }

    /// Solid sin entradas con una única salida implícita `result`.
    pub fn single_output(name: impl Into<String>,
                         dtype: super::io::DataType,
                         compute: impl SolidCompute + 'static)
                         -> Self {
        Self::new(name,
                  vec![],
                  vec![OutputDefinition::new(crate::model::DEFAULT_OUTPUT, dtype)],
                  compute)
    }

    /// Solid sin salidas declaradas (aserciones o puro efecto secundario).
    pub fn no_outputs(name: impl Into<String>, compute: impl SolidCompute + 'static) -> Self {
        Self::new(name, vec![], vec![], compute)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[InputDefinition] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputDefinition] {
        &self.outputs
    }

    pub fn input(&self, name: &str) -> Option<&InputDefinition> {
        self.inputs.iter().find(|i| i.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputDefinition> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// Invoca la capacidad de cómputo. Sólo el motor debería llamar esto.
    pub(crate) fn invoke(&self,
                         ctx: &StepContext<'_>,
                         inputs: &InputValues)
                         -> Result<ComputeOutput, CoreEngineError> {
        self.compute.compute(ctx, inputs)
    }
}

impl fmt::Debug for SolidDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolidDefinition")
         .field("name", &self.name)
         .field("inputs", &self.inputs)
         .field("outputs", &self.outputs)
         .finish_non_exhaustive()
    }
}
