//! Resultado de una aserción de calidad de datos.
use serde::{Deserialize, Serialize};

/// Aserción sobre los datos reportada durante la ejecución de un step.
///
/// Invariante de diseño: una expectativa fallida (`success == false`) se
/// registra como evento pero no falla el step por sí misma. Las
/// expectativas son señales para consumidores downstream (alerting,
/// dashboards), no control de flujo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectationResult {
    pub success: bool,
    pub message: String,
}

impl ExpectationResult {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self { success, message: message.into() }
    }

    pub fn passed(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }
}
