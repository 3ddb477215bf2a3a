//! Solid de calidad de datos: sólo aserciones, cero salidas declaradas.

use solid_core::{ComputeOutput, DataType, EmittedValue, ExpectationResult, InputDefinition, InputValues,
                 SolidDefinition, StepContext};

/// Solid de chequeo: input `records` (Json), sin outputs. Emite una
/// expectativa por invariante comprobado; una expectativa fallida se reporta
/// pero no falla el step.
pub fn check_min_rows(min: usize) -> SolidDefinition {
    SolidDefinition::new(
        "check_min_rows",
        vec![InputDefinition::new("records", DataType::Json)],
        vec![],
        move |_ctx: &StepContext<'_>, inputs: &InputValues| {
            let count = inputs["records"].as_array().map(Vec::len).unwrap_or(0);
            let row_check = if count >= min {
                ExpectationResult::passed(format!("dataset has {count} rows (>= {min})"))
            } else {
                ExpectationResult::failed(format!("dataset has {count} rows (< {min})"))
            };
            let shape_check = if inputs["records"].is_array() {
                ExpectationResult::passed("records is a JSON array")
            } else {
                ExpectationResult::failed("records is not a JSON array")
            };
            Ok(ComputeOutput::values(vec![EmittedValue::Expectation(shape_check),
                                          EmittedValue::Expectation(row_check)]))
        },
    )
}
