//! HTTP handlers

pub mod analytics;
pub mod batch;
pub mod entries;
pub mod health;
pub mod job_work;
pub mod quotation;

pub use analytics::*;
pub use batch::*;
pub use entries::*;
pub use health::*;
pub use job_work::*;
pub use quotation::*;
