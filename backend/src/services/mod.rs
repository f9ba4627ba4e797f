//! Business logic services for the garment costing server

pub mod batch;
pub mod cost_summary;
pub mod costing;
pub mod entries;
pub mod export;
pub mod quotation;

pub use batch::BatchService;
pub use cost_summary::CostSummaryService;
pub use costing::CostingService;
pub use entries::EntryService;
pub use quotation::QuotationService;
