//! Solids concretos agrupados por rol.

mod acquire;
mod aggregate;
mod checks;

pub use acquire::{acquire_dataset, download_file};
pub use aggregate::mean_features;
pub use checks::check_min_rows;
