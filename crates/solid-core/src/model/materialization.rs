//! Registro de materialización de artefactos.
use serde::{Deserialize, Serialize};

/// Registro de que un step persistió un artefacto como efecto secundario
/// (un archivo escrito, una tabla poblada). El motor no interpreta `path`;
/// sólo lo reporta en orden de emisión.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Materialization {
    pub path: String,
    pub description: Option<String>,
}

impl Materialization {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), description: None }
    }

    pub fn with_description(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self { path: path.into(), description: Some(description.into()) }
    }
}
