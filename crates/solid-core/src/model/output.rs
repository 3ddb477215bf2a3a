//! Output neutral del flujo.
//!
//! Un `Output` es la unidad de datos intercambiada entre solids. Es neutral:
//! - `value` es JSON genérico; el motor no interpreta su semántica.
//! - `output_name` lo liga a una `OutputDefinition` declarada del solid
//!   productor. Los consumidores lo referencian por `(solid, output_name)`.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Nombre de output implícito cuando el solid no especifica uno.
pub const DEFAULT_OUTPUT: &str = "result";

/// Valor nombrado producido por un step y retenido en memoria durante el run
/// para los steps consumidores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Output {
    pub output_name: String,
    pub value: Value,
}

impl Output {
    /// Output dirigido a la salida implícita `result`.
    pub fn new(value: Value) -> Self {
        Self { output_name: DEFAULT_OUTPUT.to_string(), value }
    }

    /// Output dirigido a una salida declarada específica.
    pub fn named(output_name: impl Into<String>, value: Value) -> Self {
        Self { output_name: output_name.into(), value }
    }
}
