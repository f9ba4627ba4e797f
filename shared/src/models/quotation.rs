//! CMT quotation and rate card models

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UnknownVariant;

/// A single sewing/finishing operation on a style
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub category: String,
    pub machine_type: Option<String>,
    pub description: String,
    /// Standard minute value
    pub smv: Decimal,
    pub rate: Decimal,
}

/// Per-piece CMT costing: operations, finishing, overheads and company profit
///
/// `company_profit_percent` and `company_profit_rupees` are two views of one
/// number. They are only ever changed through the edit methods in
/// [`crate::costing::rates`], which recompute one from the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RateBreakdown {
    pub operations: Vec<Operation>,
    pub finishing_packing_cost: Decimal,
    pub overheads_cost: Decimal,
    pub company_profit_percent: Decimal,
    pub company_profit_rupees: Decimal,
}

/// Negotiated numbers locked in at approval time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovedRates {
    pub rates: RateBreakdown,
    pub final_cmt_per_piece: Decimal,
    pub approved_at: DateTime<Utc>,
}

/// Quotation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Approved => "approved",
            QuotationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for QuotationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(QuotationStatus::Draft),
            "sent" => Ok(QuotationStatus::Sent),
            "approved" => Ok(QuotationStatus::Approved),
            "rejected" => Ok(QuotationStatus::Rejected),
            other => Err(UnknownVariant::new("quotation status", other)),
        }
    }
}

/// CMT quotation for one style
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CmtQuotation {
    pub id: Uuid,
    pub style_id: Uuid,
    pub style_number: String,
    pub client_name: Option<String>,
    pub status: QuotationStatus,
    /// Editable draft values
    pub quoted: RateBreakdown,
    /// Quoted final rate as last saved; `None` until the quotation is priced
    pub final_cmt_per_piece: Option<Decimal>,
    pub approved_rates: Option<ApprovedRates>,
    pub updated_at: DateTime<Utc>,
}

/// Reusable costing template for a style category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateCard {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub rates: RateBreakdown,
}
