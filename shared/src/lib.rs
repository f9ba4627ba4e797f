//! Shared types, models and the costing engine for the Garment Costing platform
//!
//! This crate contains the domain types shared between the backend and the
//! frontend (via WASM), together with the pure folds that turn production
//! events into cost summaries and profitability reports.

pub mod costing;
pub mod models;
pub mod types;
pub mod validation;

pub use costing::*;
pub use models::*;
pub use types::*;
pub use validation::*;
