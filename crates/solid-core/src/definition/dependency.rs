//! Bindings de dependencia entre solids.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_OUTPUT;

/// Liga la entrada nombrada de un solid consumidor a la salida nombrada de
/// un solid productor. El lado consumidor vive en las claves del
/// `DependencyMap`; aquí sólo se nombra el productor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDefinition {
    pub solid: String,
    pub output: String,
}

impl DependencyDefinition {
    /// Dependencia sobre la salida implícita `result` del productor.
    pub fn new(solid: impl Into<String>) -> Self {
        Self { solid: solid.into(), output: DEFAULT_OUTPUT.to_string() }
    }

    /// Dependencia sobre una salida declarada específica del productor.
    pub fn from_output(solid: impl Into<String>, output: impl Into<String>) -> Self {
        Self { solid: solid.into(), output: output.into() }
    }
}

/// Mapa de dependencias de un pipeline:
/// `consumidor -> (nombre de input -> binding al productor)`.
///
/// Invariante: cada input usado tiene cero o un binding. Un input sin
/// binding debe recibir su valor desde fuera del pipeline al ejecutar.
pub type DependencyMap = IndexMap<String, IndexMap<String, DependencyDefinition>>;
