//! Configuration and dependency initialization for the pipeline daemon.

pub mod dependencies;

pub use dependencies::{ConnectionMode, Dependencies};
