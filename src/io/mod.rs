//! CSV adapters around the simulation core.

/// Timeline and bucket export.
pub mod export;
/// Consumption readings import.
pub mod import;
