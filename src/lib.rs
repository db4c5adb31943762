// Trendlens: temporal corpus analysis for research-paper topics
//
// This is the library root. Each module corresponds to a major subsystem
// of the acquisition and analysis engine.

pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod status;
pub mod topics;
