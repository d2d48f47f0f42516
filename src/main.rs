#[cfg(test)]
mod tests;

pub mod config;
pub mod flow_core;

pub use config::RuntimeConfig;
pub use flow_core::{FlowAggregator, FlowSummary, Paginator, TzktSource};
