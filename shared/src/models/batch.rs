//! Batch and roll type models

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::GstSetting;
use crate::types::{TypeIndex, UnknownVariant};

/// A unit of garment production, tracked from fabric receipt to delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub batch_number: String,
    pub client_name: Option<String>,
    pub status: BatchStatus,
    pub start_date: NaiveDate,
    pub gst_enabled: bool,
    /// Effective GST percent as last saved (0 whenever GST is disabled)
    pub gst_percentage: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Batch {
    /// GST setting as other screens see it
    pub fn gst(&self) -> GstSetting {
        GstSetting {
            enabled: self.gst_enabled,
            percentage: self.gst_percentage,
        }
    }
}

/// Production stage of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    FabricReceived,
    Cutting,
    Stitching,
    Finishing,
    Delivered,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::FabricReceived => "fabric_received",
            BatchStatus::Cutting => "cutting",
            BatchStatus::Stitching => "stitching",
            BatchStatus::Finishing => "finishing",
            BatchStatus::Delivered => "delivered",
        }
    }
}

impl FromStr for BatchStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fabric_received" => Ok(BatchStatus::FabricReceived),
            "cutting" => Ok(BatchStatus::Cutting),
            "stitching" => Ok(BatchStatus::Stitching),
            "finishing" => Ok(BatchStatus::Finishing),
            "delivered" => Ok(BatchStatus::Delivered),
            other => Err(UnknownVariant::new("batch status", other)),
        }
    }
}

/// One fabric/color variant within a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollType {
    /// Ordinal, unique within the batch
    pub index: TypeIndex,
    pub color: String,
    pub fabric_type: String,
    pub gsm: Option<u32>,
    pub number_of_rolls: u32,
    pub weight_per_roll_kg: Decimal,
    /// Style this fabric is cut for; unassigned types only count at batch level
    pub style_id: Option<Uuid>,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl RollType {
    /// `number_of_rolls × weight_per_roll`
    pub fn total_fabric_weight_kg(&self) -> Decimal {
        Decimal::from(self.number_of_rolls) * self.weight_per_roll_kg
    }
}
