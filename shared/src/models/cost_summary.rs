//! Cached batch cost summary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::labour::{total_salary_cost, SalaryEntry};

/// Hand-edited inputs of a cost summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CostSummaryEdit {
    pub material_cost: Decimal,
    pub transport_cost: Decimal,
    pub misc_cost: Decimal,
}

/// Persisted cost summary of a batch
///
/// Labour is always derived from salary entries and `total_cost` is always
/// the sum of the four components. Values come from [`CostSummary::compute`]
/// or [`CostSummary::with_labour`], so a stale cache means somebody skipped a
/// recompute after a write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostSummary {
    pub batch_id: Uuid,
    pub material_cost: Decimal,
    pub labour_cost: Decimal,
    pub transport_cost: Decimal,
    pub misc_cost: Decimal,
    pub total_cost: Decimal,
}

impl CostSummary {
    pub fn compute(batch_id: Uuid, edit: &CostSummaryEdit, salaries: &[SalaryEntry]) -> Self {
        let labour_cost = total_salary_cost(salaries);
        Self {
            batch_id,
            material_cost: edit.material_cost,
            labour_cost,
            transport_cost: edit.transport_cost,
            misc_cost: edit.misc_cost,
            total_cost: edit.material_cost + labour_cost + edit.transport_cost + edit.misc_cost,
        }
    }

    /// Same hand-edited values, labour refreshed from current salary entries
    pub fn refreshed(&self, salaries: &[SalaryEntry]) -> Self {
        Self::compute(self.batch_id, &self.edit(), salaries)
    }

    pub fn with_labour(&self, labour_cost: Decimal) -> Self {
        Self {
            labour_cost,
            total_cost: self.material_cost + labour_cost + self.transport_cost + self.misc_cost,
            ..self.clone()
        }
    }

    pub fn edit(&self) -> CostSummaryEdit {
        CostSummaryEdit {
            material_cost: self.material_cost,
            transport_cost: self.transport_cost,
            misc_cost: self.misc_cost,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_cost
            == self.material_cost + self.labour_cost + self.transport_cost + self.misc_cost
    }
}
