/// Estado de un step en tiempo de ejecución.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Running`
/// - `Pending` -> `Skipped` (algún productor no llegó a `Succeeded`)
/// - `Running` -> `Succeeded`
/// - `Running` -> `Failed`
///
/// Un step sólo entra a `Running` cuando todos sus productores alcanzaron
/// `Succeeded`; el orden del plan lo garantiza por construcción en la
/// ejecución secuencial. No se permiten reversiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Running,
    Succeeded,
    Failed,
    /// Nunca ejecutado: un productor directo o transitivo falló. No emite
    /// ningún evento.
    Skipped,
}
