//! Job work (sub-contracted operations) models

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UnknownVariant;

/// A sub-contract placed with an external company
///
/// `balance_amount` always equals `total_amount − paid_amount`; every
/// mutation goes through [`JobWorkOrder::rebalance`]. A negative balance is
/// an overpayment and is kept visible rather than clamped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobWorkOrder {
    pub id: Uuid,
    pub batch_id: Option<Uuid>,
    pub order_number: String,
    pub company_name: String,
    pub variations: Vec<JobWorkVariation>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub work_status: WorkStatus,
    pub payment_status: PaymentStatus,
    pub order_date: NaiveDate,
}

/// One style/color line on a job-work order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobWorkVariation {
    pub style_id: Option<Uuid>,
    pub color: Option<String>,
    pub quantity: u32,
}

impl JobWorkOrder {
    /// Build an order with a consistent balance and payment status
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        batch_id: Option<Uuid>,
        order_number: impl Into<String>,
        company_name: impl Into<String>,
        variations: Vec<JobWorkVariation>,
        total_amount: Decimal,
        paid_amount: Decimal,
        order_date: NaiveDate,
    ) -> Self {
        let mut order = Self {
            id,
            batch_id,
            order_number: order_number.into(),
            company_name: company_name.into(),
            variations,
            total_amount,
            paid_amount,
            balance_amount: Decimal::ZERO,
            work_status: WorkStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            order_date,
        };
        order.rebalance();
        order
    }

    pub fn covers_style(&self, style_id: Uuid) -> bool {
        self.variations.iter().any(|v| v.style_id == Some(style_id))
    }

    /// Distinct styles named in the variations list, in first-seen order
    pub fn style_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for id in self.variations.iter().filter_map(|v| v.style_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn derived_balance(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }

    /// Whether the stored balance still matches `total − paid`
    pub fn is_balanced(&self) -> bool {
        self.balance_amount == self.derived_balance()
    }

    pub fn is_overpaid(&self) -> bool {
        self.paid_amount > self.total_amount
    }

    /// Recompute balance and payment status from total and paid
    pub fn rebalance(&mut self) {
        self.balance_amount = self.derived_balance();
        self.payment_status = PaymentStatus::derive(self.total_amount, self.paid_amount);
    }

    pub fn record_payment(&mut self, amount: Decimal) {
        self.paid_amount += amount;
        self.rebalance();
    }

    pub fn set_total_amount(&mut self, total_amount: Decimal) {
        self.total_amount = total_amount;
        self.rebalance();
    }
}

/// Progress of the sub-contracted work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "pending",
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Completed => "completed",
            WorkStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for WorkStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WorkStatus::Pending),
            "in_progress" => Ok(WorkStatus::InProgress),
            "completed" => Ok(WorkStatus::Completed),
            "cancelled" => Ok(WorkStatus::Cancelled),
            other => Err(UnknownVariant::new("work status", other)),
        }
    }
}

/// Settlement state of a job-work order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
    /// More paid than billed; a data-entry error to be corrected
    Overpaid,
}

impl PaymentStatus {
    pub fn derive(total_amount: Decimal, paid_amount: Decimal) -> Self {
        if paid_amount > total_amount {
            PaymentStatus::Overpaid
        } else if paid_amount == total_amount {
            PaymentStatus::Paid
        } else if paid_amount <= Decimal::ZERO {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overpaid => "overpaid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            "overpaid" => Ok(PaymentStatus::Overpaid),
            other => Err(UnknownVariant::new("payment status", other)),
        }
    }
}
