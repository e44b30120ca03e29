// results/mod.rs

pub mod scalar;
pub mod vector;

pub use scalar::{IterationVar, RunHeader, ScalarFile};
pub use vector::{VectorFile, VectorSeries, VectorSummary};
