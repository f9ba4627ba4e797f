//! Production event writes: cutting, wastage, salary, expenses and job work
//!
//! Every write is a single record. Reports pick the change up on their next
//! recompute; the only cached figure, the cost summary, is refreshed here
//! after salary writes.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    validate_expense, validate_job_work_order, validate_non_negative_amount,
    validate_payment_amount, validate_pieces_cut, validate_salary_entry, validate_type_index,
    validate_wastage_weight, CuttingLogEntry,
    CuttingWastageEntry, ExpenseCategory, ExpenseEntry, JobWorkOrder, JobWorkVariation,
    SalaryEntry, WorkStatus,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::cost_summary::CostSummaryService;
use crate::store::EventStore;

#[derive(Clone)]
pub struct EntryService {
    store: Arc<dyn EventStore>,
    summaries: CostSummaryService,
}

/// Input for logging or correcting pieces cut
#[derive(Debug, Deserialize, Validate)]
pub struct CuttingLogInput {
    pub type_index: u32,
    pub log_date: NaiveDate,
    #[validate(range(min = 1))]
    pub pieces_cut: i64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WastageInput {
    pub type_index: u32,
    pub log_date: NaiveDate,
    #[validate(range(max = 1000000))]
    pub wastage_pieces: u32,
    pub actual_weight_kg: Option<Decimal>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SalaryInput {
    pub style_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub worker_name: String,
    #[validate(length(max = 200))]
    pub operation: Option<String>,
    pub rate_per_piece: Decimal,
    #[validate(range(max = 10000000))]
    pub quantity: u32,
    pub paid_amount: Option<Decimal>,
    pub entry_date: NaiveDate,
}

/// Money handed over against a salary entry or job-work order
#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExpenseInput {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobWorkOrderInput {
    pub batch_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub order_number: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[serde(default)]
    pub variations: Vec<JobWorkVariation>,
    pub total_amount: Decimal,
    pub paid_amount: Option<Decimal>,
    pub order_date: NaiveDate,
}

/// Partial update of a job-work order; balance is always re-derived
#[derive(Debug, Deserialize)]
pub struct UpdateJobWorkOrderInput {
    pub total_amount: Option<Decimal>,
    pub work_status: Option<WorkStatus>,
}

impl EntryService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            summaries: CostSummaryService::new(store.clone()),
            store,
        }
    }

    // ========================================================================
    // Cutting
    // ========================================================================

    pub async fn log_cutting(
        &self,
        batch_id: Uuid,
        input: CuttingLogInput,
    ) -> AppResult<CuttingLogEntry> {
        let entry = self.cutting_entry(batch_id, Uuid::new_v4(), input).await?;
        self.store.insert_cutting_log(&entry).await?;
        tracing::info!(
            batch_id = %batch_id,
            type_index = ?entry.type_index,
            pieces = entry.pieces_cut,
            "Cutting logged"
        );
        Ok(entry)
    }

    pub async fn update_cutting_log(
        &self,
        batch_id: Uuid,
        log_id: Uuid,
        input: CuttingLogInput,
    ) -> AppResult<CuttingLogEntry> {
        let entry = self.cutting_entry(batch_id, log_id, input).await?;
        if !self.store.update_cutting_log(&entry).await? {
            return Err(AppError::not_found("Cutting log"));
        }
        Ok(entry)
    }

    pub async fn delete_cutting_log(&self, batch_id: Uuid, log_id: Uuid) -> AppResult<()> {
        if !self.store.delete_cutting_log(batch_id, log_id).await? {
            return Err(AppError::not_found("Cutting log"));
        }
        tracing::info!(batch_id = %batch_id, log_id = %log_id, "Cutting log deleted");
        Ok(())
    }

    async fn cutting_entry(
        &self,
        batch_id: Uuid,
        id: Uuid,
        input: CuttingLogInput,
    ) -> AppResult<CuttingLogEntry> {
        input.validate()?;
        validate_pieces_cut(input.pieces_cut).map_err(|m| AppError::invalid("pieces_cut", m))?;
        self.check_type_index(batch_id, input.type_index).await?;

        Ok(CuttingLogEntry {
            id,
            batch_id,
            type_index: Some(input.type_index),
            log_date: input.log_date,
            // bounded by validate_pieces_cut
            pieces_cut: input.pieces_cut as u32,
            notes: input.notes,
        })
    }

    pub async fn log_wastage(
        &self,
        batch_id: Uuid,
        input: WastageInput,
    ) -> AppResult<CuttingWastageEntry> {
        input.validate()?;
        validate_wastage_weight(input.actual_weight_kg)
            .map_err(|m| AppError::invalid("actual_weight_kg", m))?;
        self.check_type_index(batch_id, input.type_index).await?;

        let entry = CuttingWastageEntry {
            id: Uuid::new_v4(),
            batch_id,
            type_index: Some(input.type_index),
            log_date: input.log_date,
            wastage_pieces: input.wastage_pieces,
            actual_weight_kg: input.actual_weight_kg,
            notes: input.notes,
        };
        self.store.insert_cutting_wastage(&entry).await?;
        Ok(entry)
    }

    /// New entries must point at a current roll type; only history may dangle
    async fn check_type_index(&self, batch_id: Uuid, type_index: u32) -> AppResult<()> {
        if self.store.get_batch(batch_id).await?.is_none() {
            return Err(AppError::not_found("Batch"));
        }
        let roll_types = self.store.get_roll_types(batch_id).await?;
        validate_type_index(type_index, &roll_types).map_err(|m| AppError::invalid("type_index", m))
    }

    // ========================================================================
    // Labour
    // ========================================================================

    pub async fn add_salary_entry(
        &self,
        batch_id: Uuid,
        input: SalaryInput,
    ) -> AppResult<SalaryEntry> {
        input.validate()?;
        let entry = SalaryEntry {
            id: Uuid::new_v4(),
            batch_id,
            style_id: input.style_id,
            worker_name: input.worker_name.trim().to_string(),
            operation: input.operation,
            rate_per_piece: input.rate_per_piece,
            quantity: input.quantity,
            paid_amount: input.paid_amount.unwrap_or(Decimal::ZERO),
            entry_date: input.entry_date,
        };
        validate_salary_entry(&entry).map_err(|m| AppError::ValidationError(m.to_string()))?;
        if self.store.get_batch(batch_id).await?.is_none() {
            return Err(AppError::not_found("Batch"));
        }

        self.store.insert_salary_entry(&entry).await?;
        self.summaries.refresh(batch_id).await?;
        Ok(entry)
    }

    pub async fn record_salary_payment(
        &self,
        entry_id: Uuid,
        input: PaymentInput,
    ) -> AppResult<SalaryEntry> {
        validate_payment_amount(input.amount).map_err(|m| AppError::invalid("amount", m))?;
        let entry = self
            .store
            .record_salary_payment(entry_id, input.amount)
            .await?
            .ok_or_else(|| AppError::not_found("Salary entry"))?;

        if entry.outstanding() < Decimal::ZERO {
            tracing::warn!(entry_id = %entry_id, outstanding = %entry.outstanding(), "Worker overpaid");
        }
        self.summaries.refresh(entry.batch_id).await?;
        Ok(entry)
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    pub async fn add_expense(&self, batch_id: Uuid, input: ExpenseInput) -> AppResult<ExpenseEntry> {
        input.validate()?;
        validate_expense(input.amount).map_err(|m| AppError::invalid("amount", m))?;
        if self.store.get_batch(batch_id).await?.is_none() {
            return Err(AppError::not_found("Batch"));
        }

        let entry = ExpenseEntry {
            id: Uuid::new_v4(),
            batch_id,
            category: input.category,
            amount: input.amount,
            expense_date: input.expense_date,
            description: input.description,
        };
        self.store.insert_expense(&entry).await?;
        Ok(entry)
    }

    // ========================================================================
    // Job work
    // ========================================================================

    pub async fn create_job_work_order(
        &self,
        input: CreateJobWorkOrderInput,
    ) -> AppResult<JobWorkOrder> {
        input.validate()?;
        if let Some(batch_id) = input.batch_id {
            if self.store.get_batch(batch_id).await?.is_none() {
                return Err(AppError::not_found("Batch"));
            }
        }

        let order = JobWorkOrder::new(
            Uuid::new_v4(),
            input.batch_id,
            input.order_number,
            input.company_name,
            input.variations,
            input.total_amount,
            input.paid_amount.unwrap_or(Decimal::ZERO),
            input.order_date,
        );
        validate_job_work_order(&order).map_err(|m| AppError::ValidationError(m.to_string()))?;
        self.store.save_job_work_order(&order).await?;
        Ok(order)
    }

    /// Add a payment; balance and payment status follow
    pub async fn record_job_work_payment(
        &self,
        order_id: Uuid,
        input: PaymentInput,
    ) -> AppResult<JobWorkOrder> {
        validate_payment_amount(input.amount).map_err(|m| AppError::invalid("amount", m))?;
        let order = self
            .store
            .record_job_work_payment(order_id, input.amount)
            .await?
            .ok_or_else(|| AppError::not_found("Job work order"))?;

        if order.is_overpaid() {
            tracing::warn!(
                order_id = %order_id,
                balance = %order.balance_amount,
                "Job work order is overpaid"
            );
        }
        Ok(order)
    }

    pub async fn update_job_work_order(
        &self,
        order_id: Uuid,
        input: UpdateJobWorkOrderInput,
    ) -> AppResult<JobWorkOrder> {
        if let Some(total) = input.total_amount {
            validate_non_negative_amount(total).map_err(|m| AppError::invalid("total_amount", m))?;
        }
        self.store
            .update_job_work_terms(order_id, input.total_amount, input.work_status)
            .await?
            .ok_or_else(|| AppError::not_found("Job work order"))
    }
}
