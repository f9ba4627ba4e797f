//! Cached batch cost summary

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{total_salary_cost, validate_non_negative_amount, CostSummary, CostSummaryEdit};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::EventStore;

#[derive(Clone)]
pub struct CostSummaryService {
    store: Arc<dyn EventStore>,
}

/// Hand-edited parts of the summary; labour and total are always derived
#[derive(Debug, Deserialize)]
pub struct UpdateCostSummaryInput {
    pub material_cost: Decimal,
    pub transport_cost: Decimal,
    pub misc_cost: Decimal,
}

impl CostSummaryService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Stored summary with labour refreshed, or a fresh one with zero inputs
    pub async fn get(&self, batch_id: Uuid) -> AppResult<CostSummary> {
        self.ensure_batch(batch_id).await?;
        let salaries = self.store.list_salary_entries(batch_id).await?;
        Ok(match self.store.get_cost_summary(batch_id).await? {
            Some(summary) => summary.refreshed(&salaries),
            None => CostSummary::compute(batch_id, &CostSummaryEdit::default(), &salaries),
        })
    }

    pub async fn update(
        &self,
        batch_id: Uuid,
        input: UpdateCostSummaryInput,
    ) -> AppResult<CostSummary> {
        for (field, value) in [
            ("material_cost", input.material_cost),
            ("transport_cost", input.transport_cost),
            ("misc_cost", input.misc_cost),
        ] {
            validate_non_negative_amount(value).map_err(|m| AppError::invalid(field, m))?;
        }
        self.ensure_batch(batch_id).await?;

        let salaries = self.store.list_salary_entries(batch_id).await?;
        let edit = CostSummaryEdit {
            material_cost: input.material_cost,
            transport_cost: input.transport_cost,
            misc_cost: input.misc_cost,
        };
        let summary = CostSummary::compute(batch_id, &edit, &salaries);
        self.store.save_cost_summary(&summary).await?;

        tracing::info!(batch_id = %batch_id, total = %summary.total_cost, "Cost summary updated");
        Ok(summary)
    }

    /// Recompute labour after a salary write and persist it without
    /// rewriting the hand-edited costs
    pub async fn refresh(&self, batch_id: Uuid) -> AppResult<CostSummary> {
        self.ensure_batch(batch_id).await?;
        let salaries = self.store.list_salary_entries(batch_id).await?;
        let summary = self
            .store
            .refresh_cost_summary_labour(batch_id, total_salary_cost(&salaries))
            .await?;
        tracing::debug!(batch_id = %batch_id, labour = %summary.labour_cost, "Cost summary refreshed");
        Ok(summary)
    }

    async fn ensure_batch(&self, batch_id: Uuid) -> AppResult<()> {
        match self.store.get_batch(batch_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Batch")),
        }
    }
}
