//! Contextos de ejecución por run y por step.
//!
//! El `RunContext` se construye una sola vez por ejecución: identidad del
//! run y registro de recursos. El `StepContext` se deriva de él
//! inmediatamente antes de invocar el compute de un step y se descarta al
//! terminar; sólo añade identidad de alcance step (nombre, instante de
//! inicio). Nunca hay mutación concurrente: el motor ejecuta exactamente un
//! step a la vez.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

/// Registro de capacidades nombradas y opacas que los solids pueden pedir
/// por nombre. Se resuelve antes del inicio del run y es de sólo lectura
/// para todos los steps desde ese momento.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    inner: IndexMap<String, Value>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder encadenable: `Resources::new().with("data_dir", json!("/tmp"))`.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.inner.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Contexto compartido de un run completo.
#[derive(Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    resources: Resources,
}

impl RunContext {
    pub fn new(resources: Resources) -> Self {
        Self { run_id: Uuid::new_v4(), resources }
    }

    /// Variante con `run_id` explícito (útil para replays y tests).
    pub fn for_run(run_id: Uuid, resources: Resources) -> Self {
        Self { run_id, resources }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }
}

/// Contexto entregado al compute capability de un step.
///
/// Vive exactamente lo que dura la invocación del step; presta el registro
/// de recursos del run y añade identidad step-scoped.
pub struct StepContext<'a> {
    run_id: Uuid,
    step_name: &'a str,
    started_at: DateTime<Utc>,
    resources: &'a Resources,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(run: &'a RunContext, step_name: &'a str) -> Self {
        Self { run_id: run.run_id,
               step_name,
               started_at: Utc::now(),
               resources: &run.resources }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn step_name(&self) -> &str {
        self.step_name
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Busca un recurso por nombre en el registro del run.
    pub fn resource(&self, name: &str) -> Option<&Value> {
        self.resources.get(name)
    }

    /// Log estructurado con los campos de identidad del step.
    pub fn log_debug(&self, message: &str) {
        tracing::debug!(run_id = %self.run_id, step = self.step_name, "{message}");
    }

    pub fn log_info(&self, message: &str) {
        tracing::info!(run_id = %self.run_id, step = self.step_name, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn step_context_borrows_run_resources() {
        let resources = Resources::new().with("data_dir", json!("/var/data"));
        let run = RunContext::new(resources);
        let ctx = StepContext::new(&run, "acquire");
        assert_eq!(ctx.step_name(), "acquire");
        assert_eq!(ctx.run_id(), run.run_id);
        assert_eq!(ctx.resource("data_dir"), Some(&json!("/var/data")));
        assert!(ctx.resource("missing").is_none());
    }
}
