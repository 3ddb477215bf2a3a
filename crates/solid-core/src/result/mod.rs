//! Agregación de resultados: índice de consulta sobre el stream de eventos.
//!
//! `PipelineExecutionResult` es producido por el motor, posee la lista
//! ordenada completa de eventos de un run y es de sólo lectura para los
//! llamadores. Las vistas por solid son índices puros: no computan nada y
//! pueden pedirse cualquier cantidad de veces tras completar el run.

use uuid::Uuid;

use crate::event::{PipelineEvent, PipelineEventType};

/// Resultado completo de un run.
#[derive(Debug)]
pub struct PipelineExecutionResult {
    run_id: Uuid,
    events: Vec<PipelineEvent>,
    success: bool,
}

impl PipelineExecutionResult {
    /// `success` es verdadero si y sólo si ningún evento es `StepFailure`.
    pub(crate) fn new(run_id: Uuid, events: Vec<PipelineEvent>) -> Self {
        let success = !events.iter()
                             .any(|e| e.event_type() == PipelineEventType::StepFailure);
        Self { run_id, events, success }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Stream de eventos completo del run, en orden de emisión.
    pub fn events(&self) -> &[PipelineEvent] {
        &self.events
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Vista de sólo lectura sobre los eventos de un solid. Devuelve `None`
    /// si el solid no emitió ningún evento (p. ej. fue saltado porque un
    /// productor falló, o no existe en el pipeline).
    pub fn result_for_solid(&self, name: &str) -> Option<SolidExecutionResult<'_>> {
        let transforms: Vec<&PipelineEvent> = self.events
                                                  .iter()
                                                  .filter(|e| e.step_name == name)
                                                  .collect();
        if transforms.is_empty() {
            return None;
        }
        Some(SolidExecutionResult { step_name: name.to_string(),
                                    transforms })
    }
}

/// Sub-secuencia ordenada de eventos de un solo step.
#[derive(Debug)]
pub struct SolidExecutionResult<'a> {
    step_name: String,
    transforms: Vec<&'a PipelineEvent>,
}

impl<'a> SolidExecutionResult<'a> {
    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    /// Todos los eventos del step, en orden de emisión.
    pub fn transforms(&self) -> &[&'a PipelineEvent] {
        &self.transforms
    }

    /// Evento de éxito del step, si llegó a suceder.
    pub fn get_step_success_event(&self) -> Option<&'a PipelineEvent> {
        self.transforms
            .iter()
            .copied()
            .find(|e| e.event_type() == PipelineEventType::StepSuccess)
    }

    pub fn failure_event(&self) -> Option<&'a PipelineEvent> {
        self.transforms
            .iter()
            .copied()
            .find(|e| e.event_type() == PipelineEventType::StepFailure)
    }

    pub fn expectation_events(&self) -> Vec<&'a PipelineEvent> {
        self.by_type(PipelineEventType::StepExpectationResult)
    }

    pub fn materialization_events(&self) -> Vec<&'a PipelineEvent> {
        self.by_type(PipelineEventType::StepMaterialization)
    }

    pub fn success(&self) -> bool {
        self.get_step_success_event().is_some() && self.failure_event().is_none()
    }

    fn by_type(&self, ty: PipelineEventType) -> Vec<&'a PipelineEvent> {
        self.transforms
            .iter()
            .copied()
            .filter(|e| e.event_type() == ty)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreEngineError;
    use crate::event::EventData;

    fn event(seq: u64, run_id: Uuid, step: &str, data: EventData) -> PipelineEvent {
        PipelineEvent { seq,
                        run_id,
                        step_name: step.to_string(),
                        ts: chrono::Utc::now(),
                        data }
    }

    #[test]
    fn success_flag_tracks_failure_events() {
        let run_id = Uuid::new_v4();
        let ok = PipelineExecutionResult::new(run_id,
                                              vec![event(0, run_id, "a", EventData::StepStart),
                                                   event(1, run_id, "a", EventData::StepSuccess { duration_ms: 1.0 })]);
        assert!(ok.success());

        let failed = PipelineExecutionResult::new(
            run_id,
            vec![event(0, run_id, "a", EventData::StepStart),
                 event(1, run_id, "a", EventData::StepFailure { error: CoreEngineError::user("boom") })],
        );
        assert!(!failed.success());
    }

    #[test]
    fn solid_view_is_a_pure_index() {
        let run_id = Uuid::new_v4();
        let result = PipelineExecutionResult::new(
            run_id,
            vec![event(0, run_id, "a", EventData::StepStart),
                 event(1, run_id, "a", EventData::StepSuccess { duration_ms: 3.5 }),
                 event(2, run_id, "b", EventData::StepStart)],
        );

        // Idempotente: consultable tantas veces como se quiera.
        for _ in 0..2 {
            let view = result.result_for_solid("a").expect("view for a");
            assert_eq!(view.transforms().len(), 2);
            assert_eq!(view.get_step_success_event().and_then(|e| e.duration_ms()), Some(3.5));
            assert!(view.success());
        }
        assert!(result.result_for_solid("missing").is_none());
    }
}
