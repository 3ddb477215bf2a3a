//! Agregación numérica sobre registros JSON.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use solid_core::{ComputeOutput, CoreEngineError, DataType, InputDefinition, InputValues,
                 OutputDefinition, SolidDefinition, StepContext};

/// Media por columna numérica. Claves en orden alfabético (BTreeMap) para
/// salida determinista.
fn column_means(rows: &[Value]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in rows {
        if let Some(obj) = row.as_object() {
            for (k, v) in obj {
                if let Some(n) = v.as_f64() {
                    let entry = sums.entry(k.clone()).or_insert((0.0, 0));
                    entry.0 += n;
                    entry.1 += 1;
                }
            }
        }
    }
    sums.into_iter().map(|(k, (sum, count))| (k, sum / count as f64)).collect()
}

/// Solid de transformación: input `records` (Json), output `means` (Json).
pub fn mean_features() -> SolidDefinition {
    SolidDefinition::new(
        "mean_features",
        vec![InputDefinition::new("records", DataType::Json)],
        vec![OutputDefinition::new("means", DataType::Json)],
        |_ctx: &StepContext<'_>, inputs: &InputValues| {
            let rows = inputs["records"].as_array()
                                        .cloned()
                                        .ok_or_else(|| CoreEngineError::user("records must be a JSON array"))?;
            if rows.is_empty() {
                return Err(CoreEngineError::user("cannot aggregate an empty dataset"));
            }
            let means = column_means(&rows);
            Ok(ComputeOutput::values(vec![solid_core::EmittedValue::Output(
                solid_core::Output::named("means", json!(means)),
            )]))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_ignore_non_numeric_columns() {
        let rows = vec![json!({"a": 1.0, "label": "x"}), json!({"a": 3.0, "label": "y"})];
        let means = column_means(&rows);
        assert_eq!(means.get("a"), Some(&2.0));
        assert!(!means.contains_key("label"));
    }
}
