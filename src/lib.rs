pub mod analysis;
pub mod campaign;
pub mod configure;
pub mod error;
pub mod generate;
pub mod global_variables;
pub mod results;
pub mod runner;
pub mod settings;
pub mod shared_data;

pub use error::{Error, Result};
