//! Salary (piece-rate labour) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Piece-rate wages owed to a worker for a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalaryEntry {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub style_id: Option<Uuid>,
    pub worker_name: String,
    pub operation: Option<String>,
    pub rate_per_piece: Decimal,
    pub quantity: u32,
    pub paid_amount: Decimal,
    pub entry_date: NaiveDate,
}

impl SalaryEntry {
    /// Wages incurred: `rate_per_piece × quantity`
    pub fn cost(&self) -> Decimal {
        self.rate_per_piece * Decimal::from(self.quantity)
    }

    /// Wages still owed; negative when the worker was overpaid
    pub fn outstanding(&self) -> Decimal {
        self.cost() - self.paid_amount
    }

    pub fn is_for_style(&self, style_id: Uuid) -> bool {
        self.style_id == Some(style_id)
    }
}

/// Labour cost of a batch: every salary entry, tagged with a style or not
pub fn total_salary_cost(entries: &[SalaryEntry]) -> Decimal {
    entries.iter().map(SalaryEntry::cost).sum()
}

/// Wages actually handed over
pub fn total_salary_paid(entries: &[SalaryEntry]) -> Decimal {
    entries.iter().map(|e| e.paid_amount).sum()
}
