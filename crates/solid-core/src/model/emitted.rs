//! Uniones etiquetadas para los valores que produce un compute capability.
//!
//! La distinción yield-vs-return del motor es explícita a nivel de tipos:
//! - `EmittedValue` es el elemento de la secuencia perezosa (yield).
//! - `ReturnedValue` es lo que un compute puede retornar directamente si no
//!   emitió nada. Retornar una expectativa o materialización por esta vía es
//!   ambiguo con "este es el output implícito del step" y el engine lo
//!   rechaza como violación de invariante.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ExpectationResult, Materialization, Output};

/// Elemento de la secuencia perezosa emitida por un compute capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EmittedValue {
    Output(Output),
    Expectation(ExpectationResult),
    Materialization(Materialization),
}

impl From<Output> for EmittedValue {
    fn from(o: Output) -> Self {
        EmittedValue::Output(o)
    }
}

impl From<ExpectationResult> for EmittedValue {
    fn from(e: ExpectationResult) -> Self {
        EmittedValue::Expectation(e)
    }
}

impl From<Materialization> for EmittedValue {
    fn from(m: Materialization) -> Self {
        EmittedValue::Materialization(m)
    }
}

/// Valor retornado (no emitido) por un compute capability sin yields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ReturnedValue {
    /// Valor plano: output implícito de un step de a lo sumo una salida.
    Value(Value),
    /// Retorno prohibido; ver `EmittedValue`.
    Expectation(ExpectationResult),
    /// Retorno prohibido; ver `EmittedValue`.
    Materialization(Materialization),
}
