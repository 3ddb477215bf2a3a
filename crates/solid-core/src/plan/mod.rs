//! Compilador de grafo: de `PipelineDefinition` a `ExecutionPlan`.
//!
//! El plan es derivado, nunca se almacena en la definición: se construye una
//! vez por petición de ejecución y se descarta al terminar el run (recomputar
//! es barato y evita bugs de plan obsoleto). El orden es un sort topológico
//! determinista: todo step aparece estrictamente después de los steps que
//! producen los valores que consume, y los empates se resuelven por orden de
//! declaración en el pipeline.

use indexmap::IndexMap;

use crate::definition::PipelineDefinition;
use crate::errors::CoreEngineError;

/// De dónde saca su valor concreto cada input declarado de un step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInputSource {
    /// Leer el output registrado `(solid, output)` del step productor.
    DependsOn { solid: String, output: String },
    /// Sin productor: el valor debe suministrarlo el llamador.
    External,
}

/// Step ejecutable: un solid más la resolución de sus bindings upstream.
#[derive(Debug)]
pub struct ExecutionStep {
    pub solid_name: String,
    /// Una entrada por input declarado, en orden de declaración.
    pub input_sources: IndexMap<String, StepInputSource>,
}

/// Secuencia topológicamente ordenada de steps para un run.
#[derive(Debug)]
pub struct ExecutionPlan {
    steps: Vec<ExecutionStep>,
}

impl ExecutionPlan {
    /// Compila el pipeline a un plan determinista (algoritmo de Kahn).
    ///
    /// La aciclicidad se re-valida aquí aunque `PipelineDefinition::new` ya
    /// la comprobó: el compilador nunca asume que la validación upstream
    /// ocurrió. Un ciclo a esta altura es `InvariantViolation`.
    pub fn build(pipeline: &PipelineDefinition) -> Result<Self, CoreEngineError> {
        let solids = pipeline.solids();
        let n = solids.len();
        let index_of = |name: &str| solids.iter().position(|s| s.name() == name);

        // indegree = cantidad de productores distintos aún no planificados.
        let mut upstream: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (ci, solid) in solids.iter().enumerate() {
            for input in solid.inputs() {
                if let Some(dep) = pipeline.dependency_for(solid.name(), &input.name) {
                    if let Some(pi) = index_of(&dep.solid) {
                        if !upstream[ci].contains(&pi) {
                            upstream[ci].push(pi);
                        }
                    }
                }
            }
        }
        let mut indegree: Vec<usize> = upstream.iter().map(|u| u.len()).collect();

        let mut planned = vec![false; n];
        let mut order: Vec<usize> = Vec::with_capacity(n);
        // Kahn con desempate por orden de declaración: en cada vuelta se
        // toma el primer solid listo según su índice de declaración.
        while order.len() < n {
            let next = (0..n).find(|&i| !planned[i] && indegree[i] == 0);
            let Some(next) = next else {
                let stuck = (0..n).find(|&i| !planned[i]).unwrap_or(0);
                return Err(CoreEngineError::invariant(format!(
                    "cycle detected at plan compilation involving solid '{}'",
                    solids[stuck].name()
                )));
            };
            planned[next] = true;
            order.push(next);
            for ci in 0..n {
                if !planned[ci] && upstream[ci].contains(&next) {
                    indegree[ci] -= 1;
                }
            }
        }

        let steps = order.into_iter()
                         .map(|i| {
                             let solid = &solids[i];
                             let mut input_sources = IndexMap::new();
                             for input in solid.inputs() {
                                 let source = match pipeline.dependency_for(solid.name(), &input.name) {
                                     Some(dep) => StepInputSource::DependsOn { solid: dep.solid.clone(),
                                                                              output: dep.output.clone() },
                                     None => StepInputSource::External,
                                 };
                                 input_sources.insert(input.name.clone(), source);
                             }
                             ExecutionStep { solid_name: solid.name().to_string(),
                                             input_sources }
                         })
                         .collect();

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl ExecutionStep {
    /// Productores directos de este step (sin duplicados, orden de inputs).
    pub fn upstream_solids(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for source in self.input_sources.values() {
            if let StepInputSource::DependsOn { solid, .. } = source {
                if !seen.contains(&solid.as_str()) {
                    seen.push(solid);
                }
            }
        }
        seen
    }

    /// ¿Algún input sin binding (a suministrar por el llamador)?
    pub fn has_external_inputs(&self) -> bool {
        self.input_sources.values().any(|s| matches!(s, StepInputSource::External))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ComputeOutput, DataType, DependencyDefinition, InputDefinition, InputValues,
                            OutputDefinition, SolidDefinition};
    use crate::context::StepContext;
    use indexmap::indexmap;
    use serde_json::json;

    fn solid(name: &str, inputs: &[&str], outputs: &[&str]) -> SolidDefinition {
        SolidDefinition::new(name,
                             inputs.iter().map(|i| InputDefinition::new(*i, DataType::Json)).collect(),
                             outputs.iter().map(|o| OutputDefinition::new(*o, DataType::Json)).collect(),
                             |_ctx: &StepContext<'_>, _inputs: &InputValues| {
                                 Ok(ComputeOutput::returned(json!(null)))
                             })
    }

    fn dep(solid: &str) -> DependencyDefinition {
        DependencyDefinition::from_output(solid, "result")
    }

    #[test]
    fn plan_orders_producers_before_consumers() {
        // Declarado adrede en orden inverso al topológico.
        let pipeline = crate::definition::PipelineDefinition::new(
            "diamond",
            vec![solid("sink", &["left", "right"], &[]),
                 solid("right", &["data"], &["result"]),
                 solid("left", &["data"], &["result"]),
                 solid("source", &[], &["result"])],
            indexmap! {
                "left".to_string() => indexmap! { "data".to_string() => dep("source") },
                "right".to_string() => indexmap! { "data".to_string() => dep("source") },
                "sink".to_string() => indexmap! {
                    "left".to_string() => dep("left"),
                    "right".to_string() => dep("right"),
                },
            },
        )
        .unwrap();

        let plan = ExecutionPlan::build(&pipeline).unwrap();
        let order: Vec<&str> = plan.steps().iter().map(|s| s.solid_name.as_str()).collect();
        // source primero; right antes que left por orden de declaración.
        assert_eq!(order, vec!["source", "right", "left", "sink"]);
    }

    #[test]
    fn tie_break_is_declaration_order() {
        let pipeline = crate::definition::PipelineDefinition::new(
            "independent",
            vec![solid("c", &[], &["result"]), solid("a", &[], &["result"]), solid("b", &[], &["result"])],
            crate::definition::DependencyMap::new(),
        )
        .unwrap();
        let plan = ExecutionPlan::build(&pipeline).unwrap();
        let order: Vec<&str> = plan.steps().iter().map(|s| s.solid_name.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn unbound_inputs_become_external_markers() {
        let pipeline = crate::definition::PipelineDefinition::new(
            "ext",
            vec![solid("lonely", &["data"], &[])],
            crate::definition::DependencyMap::new(),
        )
        .unwrap();
        let plan = ExecutionPlan::build(&pipeline).unwrap();
        assert_eq!(plan.steps()[0].input_sources["data"], StepInputSource::External);
        assert!(plan.steps()[0].has_external_inputs());
    }

    #[test]
    fn cycle_slipping_past_definition_is_invariant_violation() {
        // Construcción sin validar: simula un ciclo que esquivó la
        // validación de la definición.
        let pipeline = crate::definition::PipelineDefinition::new_unchecked(
            "cyclic",
            vec![solid("a", &["data"], &["result"]), solid("b", &["data"], &["result"])],
            indexmap! {
                "a".to_string() => indexmap! { "data".to_string() => dep("b") },
                "b".to_string() => indexmap! { "data".to_string() => dep("a") },
            },
        );
        let err = ExecutionPlan::build(&pipeline).unwrap_err();
        assert!(matches!(err, CoreEngineError::InvariantViolation(ref m) if m.contains("cycle detected")));
    }
}
