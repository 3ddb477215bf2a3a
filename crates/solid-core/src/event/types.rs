//! Tipos de evento del run y estructura `PipelineEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del motor emite eventos a un `EventSink` append-only.
//! - El orden de emisión dentro de un run es contrato observable: los
//!   consumidores (agregación de resultados, persistencia externa) dependen
//!   de él. Cada step forma un bloque contiguo internamente ordenado.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::model::{ExpectationResult, Materialization};

/// Discriminante de evento, útil para filtrar sin hacer match del payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEventType {
    StepStart,
    StepSuccess,
    StepFailure,
    StepExpectationResult,
    StepMaterialization,
}

/// Payload específico por tipo de evento.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventData {
    /// Un step comenzó su ejecución. No implica éxito.
    StepStart,
    /// El step completó su secuencia sin error. `duration_ms` cubre desde
    /// justo antes de invocar el compute hasta agotar la secuencia emitida.
    StepSuccess { duration_ms: f64 },
    /// Error de código de usuario al drenar la secuencia. El run registra
    /// `success = false` y los dependientes no se ejecutan.
    StepFailure { error: CoreEngineError },
    /// Aserción de calidad de datos reportada por el step. No bloquea ni
    /// corta el éxito del step.
    StepExpectationResult { expectation_result: ExpectationResult },
    /// El step registró la persistencia de un artefacto.
    StepMaterialization { materialization: Materialization },
}

impl EventData {
    pub fn event_type(&self) -> PipelineEventType {
        match self {
            EventData::StepStart => PipelineEventType::StepStart,
            EventData::StepSuccess { .. } => PipelineEventType::StepSuccess,
            EventData::StepFailure { .. } => PipelineEventType::StepFailure,
            EventData::StepExpectationResult { .. } => PipelineEventType::StepExpectationResult,
            EventData::StepMaterialization { .. } => PipelineEventType::StepMaterialization,
        }
    }
}

/// Evento único del audit trail de un run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineEvent {
    pub seq: u64, // asignado por el EventSink (orden de append)
    pub run_id: Uuid,
    pub step_name: String,
    pub ts: DateTime<Utc>,
    pub data: EventData,
}

impl PipelineEvent {
    pub fn event_type(&self) -> PipelineEventType {
        self.data.event_type()
    }

    /// Duración del step si este es su evento de éxito.
    pub fn duration_ms(&self) -> Option<f64> {
        match &self.data {
            EventData::StepSuccess { duration_ms } => Some(*duration_ms),
            _ => None,
        }
    }

    /// Payload de expectativa si este es un evento de expectativa.
    pub fn expectation_result(&self) -> Option<&ExpectationResult> {
        match &self.data {
            EventData::StepExpectationResult { expectation_result } => Some(expectation_result),
            _ => None,
        }
    }
}
