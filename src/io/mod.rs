//! Input/output operations: CLI, configuration, progress display, and errors

/// Command-line interface and run orchestration
pub mod cli;
/// Declarative layer configuration loading
pub mod config;
/// Runtime defaults and output layout constants
pub mod configuration;
/// Error types for catalog, sampling, compositing, and collection operations
pub mod error;
/// Progress display for generation runs
pub mod progress;
