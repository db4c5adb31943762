// Pipelines: corpus acquisition and corpus analysis.

pub mod acquire;
pub mod analyze;
