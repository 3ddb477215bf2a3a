use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{EventData, PipelineEvent};

/// Sink de eventos append-only. Write-only desde la perspectiva del motor;
/// la persistencia durable es un colaborador externo.
pub trait EventSink {
    /// Agrega un evento a partir de su payload y devuelve el evento completo
    /// (con seq y ts asignados).
    fn append(&mut self, run_id: Uuid, step_name: &str, data: EventData) -> PipelineEvent;
    /// Lista eventos de un run (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<PipelineEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    pub inner: HashMap<Uuid, Vec<PipelineEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for InMemoryEventSink {
    fn append(&mut self, run_id: Uuid, step_name: &str, data: EventData) -> PipelineEvent {
        let vec = self.inner.entry(run_id).or_default();
        let seq = vec.len() as u64;
        let ev = PipelineEvent { seq,
                                 run_id,
                                 step_name: step_name.to_string(),
                                 ts: Utc::now(),
                                 data };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<PipelineEvent> {
        self.inner.get(&run_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic_per_run() {
        let mut sink = InMemoryEventSink::new();
        let run_id = Uuid::new_v4();
        let a = sink.append(run_id, "s1", EventData::StepStart);
        let b = sink.append(run_id, "s1", EventData::StepSuccess { duration_ms: 1.0 });
        assert_eq!(a.seq, 0);
        assert_eq!(b.seq, 1);
        assert_eq!(sink.list(run_id).len(), 2);
        // Otro run arranca su propia numeración.
        let other = Uuid::new_v4();
        assert_eq!(sink.append(other, "s1", EventData::StepStart).seq, 0);
    }
}
