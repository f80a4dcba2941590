// qualis-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (async storage contracts)
pub mod ports;

// 2. Domain: criteria, evaluation, aggregation, lifecycle, reporting.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (adapters): YAML config and catalog, DuckDB, files.
pub mod infrastructure;

// 4. Application (use cases): orchestration over ports and domain.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::QualisError;
