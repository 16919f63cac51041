//! Agents: named bundles of instructions, model and tools.

pub mod agent;
pub mod output_spec;

pub use agent::Agent;
pub use output_spec::OutputSpec;
