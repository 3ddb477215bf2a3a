//! Modelo de valores neutrales (Output, ExpectationResult, Materialization).

pub mod emitted;
pub mod expectation;
pub mod materialization;
pub mod output;

pub use emitted::{EmittedValue, ReturnedValue};
pub use expectation::ExpectationResult;
pub use materialization::Materialization;
pub use output::{Output, DEFAULT_OUTPUT};
