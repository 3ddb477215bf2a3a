//! solid-adapters: solids concretos sobre el contrato del core.
//!
//! Este crate provee:
//! - Solids de adquisición deterministas (`acquire_dataset`, `download_file`)
//!   que no acceden a IO externo; sólo crean estructuras en memoria o
//!   resuelven rutas contra recursos del run.
//! - Un solid de agregación (`mean_features`) y uno de calidad de datos
//!   (`check_min_rows`) que ejercitan expectativas y materializaciones.
//!
//! Nota: el core sólo conoce el contrato `SolidDefinition`; nada aquí usa
//! APIs internas del motor. Cualquier definición construida con la misma
//! forma (por ejemplo una respaldada por un artefacto externo) es igual de
//! válida para el engine.

pub mod solids;

pub use solids::{acquire_dataset, check_min_rows, download_file, mean_features};
