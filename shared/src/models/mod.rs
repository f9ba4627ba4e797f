//! Domain models for the Garment Costing platform

mod batch;
mod cost_summary;
mod cutting;
mod expense;
mod job_work;
mod labour;
mod quotation;

pub use batch::*;
pub use cost_summary::*;
pub use cutting::*;
pub use expense::*;
pub use job_work::*;
pub use labour::*;
pub use quotation::*;
