//! Errores específicos del core.
//!
//! La taxonomía distingue tres familias con semántica de propagación
//! distinta:
//! - `InvalidDefinition`: grafo malformado detectado al construir la
//!   `PipelineDefinition` o el `ExecutionPlan`. El run nunca comienza.
//! - `InvariantViolation`: ruptura de contrato del framework durante la
//!   ejecución (no atribuible a lógica de negocio). Aborta el run de forma
//!   síncrona; no se registra como `StepFailure`.
//! - `UserCode`: error de código de usuario dentro de un compute. Se captura
//!   como evento `StepFailure` y el run continúa su bookkeeping; nunca se
//!   propaga como `Err` al llamador de la ejecución.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    /// Grafo malformado: nombres duplicados, bindings colgantes, tipos
    /// incompatibles o ciclos.
    #[error("invalid pipeline definition: {0}")]
    InvalidDefinition(String),
    /// Ruptura de contrato del motor detectada en ejecución. Fatal al run.
    /// El mensaje se muestra sin prefijo: es el contrato observable.
    #[error("{0}")]
    InvariantViolation(String),
    /// Error de negocio reportado por un compute capability.
    #[error("{message}")]
    UserCode { message: String },
}

impl CoreEngineError {
    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        CoreEngineError::InvalidDefinition(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        CoreEngineError::InvariantViolation(msg.into())
    }

    /// Constructor abreviado para fallos de código de usuario.
    pub fn user(msg: impl Into<String>) -> Self {
        CoreEngineError::UserCode { message: msg.into() }
    }
}
