//! Batch and job-order costing engine
//!
//! Raw events flow leaf-first through the modules here:
//! [`aggregator`] folds cutting data per type and per style, [`rates`]
//! resolves revenue per piece, [`profitability`] combines both with labour,
//! job work and expenses, and [`gst`] produces the billable total. None of
//! them hold state; recomputing from the current snapshot is always correct.

pub mod aggregator;
pub mod analytics;
pub mod gst;
pub mod outstanding;
pub mod profitability;
pub mod rates;
pub mod wastage;

pub use aggregator::*;
pub use analytics::*;
pub use gst::*;
pub use outstanding::*;
pub use profitability::*;
pub use rates::*;
pub use wastage::*;
