//! Solids de adquisición deterministas.
//!
//! - `acquire_dataset` emite un dataset sintético estable derivado del
//!   nombre pedido. No accede a IO externo; sólo crea estructuras en
//!   memoria. Evitar cambios de orden o contenido para preservar
//!   determinismo en los tests downstream.
//! - `download_file` modela el helper de descarga como un solid ordinario de
//!   una salida: resuelve la URL contra el recurso `dataset_cache` del run
//!   (un objeto JSON url -> ruta local) y materializa la ruta resuelta.

use serde_json::{json, Value};
use solid_core::{ComputeOutput, CoreEngineError, DataType, EmittedValue, InputDefinition, InputValues,
                 Materialization, Output, OutputDefinition, SolidDefinition, StepContext, DEFAULT_OUTPUT};

/// Filas sintéticas estables por dataset. Datasets no reconocidos caen al
/// default para mantener el solid total.
fn synthetic_rows(dataset: &str) -> Value {
    match dataset {
        "iris_mini" => json!([
            {"sepal_length": 5.1, "petal_length": 1.4},
            {"sepal_length": 7.0, "petal_length": 4.7},
            {"sepal_length": 6.3, "petal_length": 6.0},
        ]),
        _ => json!([
            {"x": 1.0, "y": 2.0},
            {"x": 3.0, "y": 4.0},
        ]),
    }
}

/// Solid fuente: input externo `dataset` (nombre), output `records` (Json).
pub fn acquire_dataset() -> SolidDefinition {
    SolidDefinition::new(
        "acquire_dataset",
        vec![InputDefinition::with_description("dataset", DataType::String, "Synthetic dataset name")],
        vec![OutputDefinition::new("records", DataType::Json)],
        |_ctx: &StepContext<'_>, inputs: &InputValues| {
            let dataset = inputs["dataset"].as_str().unwrap_or("default").to_string();
            Ok(ComputeOutput::values(vec![EmittedValue::Output(Output::named("records",
                                                                             synthetic_rows(&dataset)))]))
        },
    )
}

/// Solid de descarga: input `url` (Path), output `path` (Path).
///
/// La resolución consulta el recurso `dataset_cache`; una URL fuera de la
/// cache es un fallo de código de usuario ordinario (step failure), no una
/// violación de invariante del motor.
pub fn download_file() -> SolidDefinition {
    SolidDefinition::new(
        "download_file",
        vec![InputDefinition::with_description("url", DataType::Path, "Remote location of the dataset")],
        vec![OutputDefinition::with_description(DEFAULT_OUTPUT, DataType::Path, "Local path to the dataset")],
        |ctx: &StepContext<'_>, inputs: &InputValues| {
            let url = inputs["url"].as_str().unwrap_or_default().to_string();
            let cache = ctx.resource("dataset_cache").cloned().unwrap_or_else(|| json!({}));
            let Some(local) = cache.get(&url).and_then(Value::as_str).map(str::to_string) else {
                return Err(CoreEngineError::user(format!("url '{url}' not present in dataset_cache")));
            };
            ctx.log_debug("resolved url against dataset_cache");
            let emitted = vec![
                EmittedValue::Materialization(Materialization::with_description(local.clone(),
                                                                                "downloaded dataset")),
                EmittedValue::Output(Output::new(json!(local))),
            ];
            Ok(ComputeOutput::values(emitted))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_rows_are_stable() {
        assert_eq!(synthetic_rows("iris_mini"), synthetic_rows("iris_mini"));
        assert_eq!(synthetic_rows("unknown"), synthetic_rows("other_unknown"));
    }
}
