//! CLI library components for the unpivot tool.

pub mod logging;
pub mod pipeline;
