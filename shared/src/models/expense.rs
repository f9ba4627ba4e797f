//! Batch expense models

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UnknownVariant;

/// A batch-level expense with no style tag
///
/// Expenses reach per-style reports only through the piece-count split in
/// [`crate::costing::expense_share`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseEntry {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
}

/// Expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Transport,
    Electricity,
    Maintenance,
    Trims,
    Packaging,
    Rent,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Electricity => "electricity",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Trims => "trims",
            ExpenseCategory::Packaging => "packaging",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Other => "other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transport" => Ok(ExpenseCategory::Transport),
            "electricity" => Ok(ExpenseCategory::Electricity),
            "maintenance" => Ok(ExpenseCategory::Maintenance),
            "trims" => Ok(ExpenseCategory::Trims),
            "packaging" => Ok(ExpenseCategory::Packaging),
            "rent" => Ok(ExpenseCategory::Rent),
            "other" => Ok(ExpenseCategory::Other),
            other => Err(UnknownVariant::new("expense category", other)),
        }
    }
}

pub fn total_expenses(entries: &[ExpenseEntry]) -> Decimal {
    entries.iter().map(|e| e.amount).sum()
}
