//! Declaraciones tipadas de entrada y salida de un solid.

use serde::{Deserialize, Serialize};

/// Etiqueta semántica de tipo usada en la validación del grafo.
///
/// La comprobación es estructural (de etiqueta), no una validación profunda
/// de valores: `Any` unifica con todo; el resto exige igualdad exacta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Any,
    String,
    Int,
    Float,
    Bool,
    Path,
    Json,
}

impl DataType {
    /// ¿Puede un valor etiquetado `producer` fluir hacia una entrada
    /// etiquetada `self`?
    pub fn accepts(&self, producer: DataType) -> bool {
        matches!(self, DataType::Any) || matches!(producer, DataType::Any) || *self == producer
    }
}

/// Punto de consumo declarado de un solid. Inmutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub name: String,
    pub dtype: DataType,
    pub description: Option<String>,
}

impl InputDefinition {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self { name: name.into(), dtype, description: None }
    }

    pub fn with_description(name: impl Into<String>, dtype: DataType, description: impl Into<String>) -> Self {
        Self { name: name.into(), dtype, description: Some(description.into()) }
    }
}

/// Punto de producción declarado de un solid. Misma forma que
/// `InputDefinition`; un solid puede declarar cero salidas (steps de puro
/// efecto o de aserciones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDefinition {
    pub name: String,
    pub dtype: DataType,
    pub description: Option<String>,
}

impl OutputDefinition {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self { name: name.into(), dtype, description: None }
    }

    pub fn with_description(name: impl Into<String>, dtype: DataType, description: impl Into<String>) -> Self {
        Self { name: name.into(), dtype, description: Some(description.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_unifies_in_both_directions() {
        assert!(DataType::Any.accepts(DataType::Path));
        assert!(DataType::Path.accepts(DataType::Any));
        assert!(DataType::Int.accepts(DataType::Int));
        assert!(!DataType::Int.accepts(DataType::Float));
    }
}
