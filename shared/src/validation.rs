//! Validation utilities for batch and job-order data entry
//!
//! Checks run before anything reaches the store. Each returns a short
//! message suitable for showing next to the offending form field.

use rust_decimal::Decimal;

use crate::models::{JobWorkOrder, RollType, SalaryEntry};
use crate::types::TypeIndex;

// ============================================================================
// Cutting Validations
// ============================================================================

/// Pieces cut must be a positive count
pub fn validate_pieces_cut(pieces: i64) -> Result<(), &'static str> {
    if pieces <= 0 {
        return Err("Pieces cut must be greater than zero");
    }
    if pieces > i64::from(i32::MAX) {
        return Err("Pieces cut is too large");
    }
    Ok(())
}

/// A type index must point at one of the batch's roll types
pub fn validate_type_index(index: TypeIndex, roll_types: &[RollType]) -> Result<(), &'static str> {
    if roll_types.iter().any(|r| r.index == index) {
        Ok(())
    } else {
        Err("Type index does not match any roll type of this batch")
    }
}

/// Leftover fabric weight, when given, cannot be negative
pub fn validate_wastage_weight(weight_kg: Option<Decimal>) -> Result<(), &'static str> {
    match weight_kg {
        Some(w) if w < Decimal::ZERO => Err("Actual weight cannot be negative"),
        _ => Ok(()),
    }
}

// ============================================================================
// Money Validations
// ============================================================================

pub fn validate_non_negative_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// A payment has to move money
pub fn validate_payment_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Payment amount must be greater than zero");
    }
    Ok(())
}

/// GST percentage between 0 and 100 inclusive
pub fn validate_gst_percentage(percentage: Decimal) -> Result<(), &'static str> {
    if percentage < Decimal::ZERO || percentage > Decimal::from(100) {
        return Err("GST percentage must be between 0 and 100");
    }
    Ok(())
}

/// Company profit percent; negative margins are allowed for loss leaders
/// but not below -100%
pub fn validate_profit_percent(percent: Decimal) -> Result<(), &'static str> {
    if percent < Decimal::from(-100) {
        return Err("Profit percent cannot be below -100%");
    }
    if percent > Decimal::from(1000) {
        return Err("Profit percent cannot exceed 1000%");
    }
    Ok(())
}

pub fn validate_expense(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Expense amount must be greater than zero");
    }
    Ok(())
}

// ============================================================================
// Labour and Job Work Validations
// ============================================================================

pub fn validate_salary_entry(entry: &SalaryEntry) -> Result<(), &'static str> {
    if entry.worker_name.trim().is_empty() {
        return Err("Worker name is required");
    }
    if entry.rate_per_piece < Decimal::ZERO {
        return Err("Rate per piece cannot be negative");
    }
    if entry.paid_amount < Decimal::ZERO {
        return Err("Paid amount cannot be negative");
    }
    Ok(())
}

/// Order numbers and company names are required; an overpaid order is
/// accepted and flagged by the reports instead
pub fn validate_job_work_order(order: &JobWorkOrder) -> Result<(), &'static str> {
    if order.order_number.trim().is_empty() {
        return Err("Order number is required");
    }
    if order.company_name.trim().is_empty() {
        return Err("Company name is required");
    }
    if order.total_amount < Decimal::ZERO {
        return Err("Total amount cannot be negative");
    }
    if order.paid_amount < Decimal::ZERO {
        return Err("Paid amount cannot be negative");
    }
    Ok(())
}
