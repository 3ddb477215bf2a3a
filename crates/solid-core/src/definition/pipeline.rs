//! Definición de pipeline y validación del grafo en construcción.

use indexmap::IndexMap;

use super::dependency::DependencyMap;
use super::solid::SolidDefinition;
use crate::errors::CoreEngineError;

/// DAG nombrado de solids más sus bindings de dependencia.
///
/// Inmutable tras construir. `new` valida todo el grafo y no tiene efectos
/// secundarios: nombres duplicados, bindings que nombran solids/inputs/
/// outputs no declarados, incompatibilidades de etiqueta de tipo y ciclos se
/// rechazan aquí, nunca silenciosamente en ejecución.
#[derive(Debug)]
pub struct PipelineDefinition {
    name: String,
    solids: Vec<SolidDefinition>,
    dependencies: DependencyMap,
}

impl PipelineDefinition {
    pub fn new(name: impl Into<String>,
               solids: Vec<SolidDefinition>,
               dependencies: DependencyMap)
               -> Result<Self, CoreEngineError> {
        let name = name.into();
        validate_unique_solid_names(&name, &solids)?;
        validate_dependencies(&solids, &dependencies)?;
        validate_acyclic(&solids, &dependencies)?;
        Ok(Self { name, solids, dependencies })
    }

    /// Construcción sin validación, reservada a tests del compilador de
    /// grafo (segunda línea de defensa contra ciclos).
    #[cfg(test)]
    pub(crate) fn new_unchecked(name: impl Into<String>,
                                solids: Vec<SolidDefinition>,
                                dependencies: DependencyMap)
                                -> Self {
        Self { name: name.into(), solids, dependencies }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Solids en orden de declaración (el desempate determinista del plan).
    pub fn solids(&self) -> &[SolidDefinition] {
        &self.solids
    }

    pub fn solid(&self, name: &str) -> Option<&SolidDefinition> {
        self.solids.iter().find(|s| s.name() == name)
    }

    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Binding del input `input_name` del solid `consumer`, si existe.
    pub fn dependency_for(&self, consumer: &str, input_name: &str) -> Option<&super::DependencyDefinition> {
        self.dependencies.get(consumer).and_then(|m| m.get(input_name))
    }
}

fn validate_unique_solid_names(pipeline: &str, solids: &[SolidDefinition]) -> Result<(), CoreEngineError> {
    let mut seen: IndexMap<&str, ()> = IndexMap::new();
    for s in solids {
        if seen.insert(s.name(), ()).is_some() {
            return Err(CoreEngineError::invalid_definition(format!(
                "duplicate solid name '{}' in pipeline '{}'",
                s.name(),
                pipeline
            )));
        }
    }
    Ok(())
}

fn validate_dependencies(solids: &[SolidDefinition], dependencies: &DependencyMap) -> Result<(), CoreEngineError> {
    for (consumer_name, bindings) in dependencies {
        let consumer = solids.iter()
                             .find(|s| s.name() == consumer_name)
                             .ok_or_else(|| CoreEngineError::invalid_definition(format!(
                                 "dependency entry references undeclared solid '{consumer_name}'"
                             )))?;
        for (input_name, dep) in bindings {
            let input = consumer.input(input_name)
                                .ok_or_else(|| CoreEngineError::invalid_definition(format!(
                                    "solid '{consumer_name}' has no input named '{input_name}'"
                                )))?;
            let producer = solids.iter()
                                 .find(|s| s.name() == dep.solid)
                                 .ok_or_else(|| CoreEngineError::invalid_definition(format!(
                                     "dependency of '{consumer_name}.{input_name}' references undeclared solid '{}'",
                                     dep.solid
                                 )))?;
            let output = producer.output(&dep.output)
                                 .ok_or_else(|| CoreEngineError::invalid_definition(format!(
                                     "solid '{}' has no output named '{}' (bound to '{consumer_name}.{input_name}')",
                                     dep.solid, dep.output
                                 )))?;
            if !input.dtype.accepts(output.dtype) {
                return Err(CoreEngineError::invalid_definition(format!(
                    "type mismatch: output '{}.{}' is {:?} but input '{consumer_name}.{input_name}' expects {:?}",
                    dep.solid, dep.output, output.dtype, input.dtype
                )));
            }
        }
    }
    Ok(())
}

/// Detección de ciclos por DFS con tricolor sobre aristas productor →
/// consumidor.
fn validate_acyclic(solids: &[SolidDefinition], dependencies: &DependencyMap) -> Result<(), CoreEngineError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Gray,
        Black,
    }

    let index_of = |name: &str| solids.iter().position(|s| s.name() == name);

    // Adyacencia consumidor -> productores (la dirección es irrelevante para
    // detectar el ciclo).
    let mut upstream: Vec<Vec<usize>> = vec![Vec::new(); solids.len()];
    for (consumer, bindings) in dependencies {
        if let Some(ci) = index_of(consumer) {
            for dep in bindings.values() {
                if let Some(pi) = index_of(&dep.solid) {
                    upstream[ci].push(pi);
                }
            }
        }
    }

    let mut marks = vec![Mark::White; solids.len()];

    fn visit(node: usize,
             upstream: &[Vec<usize>],
             marks: &mut [Mark],
             solids: &[SolidDefinition])
             -> Result<(), CoreEngineError> {
        marks[node] = Mark::Gray;
        for &next in &upstream[node] {
            match marks[next] {
                Mark::Gray => {
                    return Err(CoreEngineError::invalid_definition(format!(
                        "circular dependency detected involving solid '{}'",
                        solids[next].name()
                    )));
                }
                Mark::White => visit(next, upstream, marks, solids)?,
                Mark::Black => {}
            }
        }
        marks[node] = Mark::Black;
        Ok(())
    }

    for i in 0..solids.len() {
        if marks[i] == Mark::White {
            visit(i, &upstream, &mut marks, solids)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ComputeOutput, DataType, DependencyDefinition, InputDefinition, OutputDefinition};
    use indexmap::indexmap;
    use serde_json::json;

    fn noop_solid(name: &str, inputs: Vec<InputDefinition>, outputs: Vec<OutputDefinition>) -> SolidDefinition {
        SolidDefinition::new(name, inputs, outputs, |_ctx: &crate::context::StepContext<'_>,
                              _inputs: &crate::definition::InputValues| {
            Ok(ComputeOutput::returned(json!(null)))
        })
    }

    fn producer(name: &str) -> SolidDefinition {
        noop_solid(name, vec![], vec![OutputDefinition::new("result", DataType::Json)])
    }

    fn consumer(name: &str, input: &str) -> SolidDefinition {
        noop_solid(name, vec![InputDefinition::new(input, DataType::Json)], vec![])
    }

    #[test]
    fn accepts_well_formed_graph() {
        let pipeline = PipelineDefinition::new(
            "ok",
            vec![producer("a"), consumer("b", "data")],
            indexmap! { "b".to_string() => indexmap! { "data".to_string() => DependencyDefinition::new("a") } },
        );
        assert!(pipeline.is_ok());
    }

    #[test]
    fn rejects_duplicate_solid_names() {
        let err = PipelineDefinition::new("dup", vec![producer("a"), producer("a")], DependencyMap::new())
            .unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(ref m) if m.contains("duplicate solid name 'a'")));
    }

    #[test]
    fn rejects_undeclared_consumer() {
        let err = PipelineDefinition::new(
            "p",
            vec![producer("a")],
            indexmap! { "ghost".to_string() => indexmap! { "x".to_string() => DependencyDefinition::new("a") } },
        )
        .unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(ref m) if m.contains("undeclared solid 'ghost'")));
    }

    #[test]
    fn rejects_unknown_input() {
        let err = PipelineDefinition::new(
            "p",
            vec![producer("a"), consumer("b", "data")],
            indexmap! { "b".to_string() => indexmap! { "nope".to_string() => DependencyDefinition::new("a") } },
        )
        .unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(ref m) if m.contains("no input named 'nope'")));
    }

    #[test]
    fn rejects_unknown_producer_output() {
        let err = PipelineDefinition::new(
            "p",
            vec![producer("a"), consumer("b", "data")],
            indexmap! { "b".to_string() => indexmap! { "data".to_string() => DependencyDefinition::from_output("a", "missing") } },
        )
        .unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(ref m) if m.contains("no output named 'missing'")));
    }

    #[test]
    fn rejects_type_tag_mismatch() {
        let a = noop_solid("a", vec![], vec![OutputDefinition::new("result", DataType::Path)]);
        let b = noop_solid("b", vec![InputDefinition::new("data", DataType::Int)], vec![]);
        let err = PipelineDefinition::new(
            "p",
            vec![a, b],
            indexmap! { "b".to_string() => indexmap! { "data".to_string() => DependencyDefinition::new("a") } },
        )
        .unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(ref m) if m.contains("type mismatch")));
    }

    #[test]
    fn rejects_cycles_at_construction() {
        // a.data <- b.result y b.data <- a.result
        let a = noop_solid("a",
                           vec![InputDefinition::new("data", DataType::Json)],
                           vec![OutputDefinition::new("result", DataType::Json)]);
        let b = noop_solid("b",
                           vec![InputDefinition::new("data", DataType::Json)],
                           vec![OutputDefinition::new("result", DataType::Json)]);
        let err = PipelineDefinition::new(
            "cyclic",
            vec![a, b],
            indexmap! {
                "a".to_string() => indexmap! { "data".to_string() => DependencyDefinition::new("b") },
                "b".to_string() => indexmap! { "data".to_string() => DependencyDefinition::new("a") },
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreEngineError::InvalidDefinition(ref m) if m.contains("circular dependency")));
    }
}
