//! Event store: the read and write seam between services and persistence
//!
//! Services never touch SQL directly. They load typed entities through
//! [`EventStore`], run the shared costing engine over them, and write single
//! records back.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    Batch, CmtQuotation, CostSummary, CuttingLogEntry, CuttingWastageEntry, ExpenseEntry,
    GstSetting, JobWorkOrder, RateCard, RollType, SalaryEntry, WorkStatus,
};
use uuid::Uuid;

use crate::error::AppResult;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgEventStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    // Batch reads
    async fn get_batch(&self, batch_id: Uuid) -> AppResult<Option<Batch>>;
    async fn list_batches(&self) -> AppResult<Vec<Batch>>;
    async fn get_roll_types(&self, batch_id: Uuid) -> AppResult<Vec<RollType>>;
    async fn list_cutting_logs(&self, batch_id: Uuid) -> AppResult<Vec<CuttingLogEntry>>;
    async fn list_cutting_wastage(&self, batch_id: Uuid) -> AppResult<Vec<CuttingWastageEntry>>;
    async fn list_salary_entries(&self, batch_id: Uuid) -> AppResult<Vec<SalaryEntry>>;
    async fn list_job_work_orders(&self, batch_id: Uuid) -> AppResult<Vec<JobWorkOrder>>;
    async fn list_all_job_work_orders(&self) -> AppResult<Vec<JobWorkOrder>>;
    async fn list_expenses(&self, batch_id: Uuid) -> AppResult<Vec<ExpenseEntry>>;

    /// Quotation currently pricing a style: an approved one if any, else the
    /// most recently updated
    async fn get_cmt_quotation(&self, style_id: Uuid) -> AppResult<Option<CmtQuotation>>;

    // Cutting floor writes
    async fn insert_cutting_log(&self, entry: &CuttingLogEntry) -> AppResult<()>;
    /// Returns false when no such log exists in the batch
    async fn update_cutting_log(&self, entry: &CuttingLogEntry) -> AppResult<bool>;
    async fn delete_cutting_log(&self, batch_id: Uuid, log_id: Uuid) -> AppResult<bool>;
    async fn insert_cutting_wastage(&self, entry: &CuttingWastageEntry) -> AppResult<()>;

    // Labour, job work and expenses
    async fn insert_salary_entry(&self, entry: &SalaryEntry) -> AppResult<()>;
    /// Adds `amount` to the entry's paid amount in one statement
    async fn record_salary_payment(
        &self,
        entry_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Option<SalaryEntry>>;
    async fn get_job_work_order(&self, order_id: Uuid) -> AppResult<Option<JobWorkOrder>>;
    async fn save_job_work_order(&self, order: &JobWorkOrder) -> AppResult<()>;
    /// Adds `amount` to the order's paid amount and re-derives balance and
    /// payment status in one statement
    async fn record_job_work_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Option<JobWorkOrder>>;
    /// Changes the total and work status without touching the paid amount
    async fn update_job_work_terms(
        &self,
        order_id: Uuid,
        total_amount: Option<Decimal>,
        work_status: Option<WorkStatus>,
    ) -> AppResult<Option<JobWorkOrder>>;
    async fn insert_expense(&self, entry: &ExpenseEntry) -> AppResult<()>;

    // Quotations and rate cards
    async fn get_quotation(&self, quotation_id: Uuid) -> AppResult<Option<CmtQuotation>>;
    async fn save_quotation(&self, quotation: &CmtQuotation) -> AppResult<()>;
    async fn get_rate_card(&self, rate_card_id: Uuid) -> AppResult<Option<RateCard>>;

    // Batch-level settings
    async fn get_cost_summary(&self, batch_id: Uuid) -> AppResult<Option<CostSummary>>;
    async fn save_cost_summary(&self, summary: &CostSummary) -> AppResult<()>;
    /// Sets labour and re-derives the total from the stored hand-edited
    /// costs, inserting a zero summary when none exists yet
    async fn refresh_cost_summary_labour(
        &self,
        batch_id: Uuid,
        labour_cost: Decimal,
    ) -> AppResult<CostSummary>;
    async fn save_batch_gst(&self, batch_id: Uuid, setting: GstSetting) -> AppResult<bool>;
}
