//! Cutting floor models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TypeIndex;

/// Pieces cut for one roll type on one day
///
/// Several entries may exist for the same batch, type and date; they are
/// summed, never deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuttingLogEntry {
    pub id: Uuid,
    pub batch_id: Uuid,
    /// `None` for rows logged before the roll type was chosen
    pub type_index: Option<TypeIndex>,
    pub log_date: NaiveDate,
    pub pieces_cut: u32,
    pub notes: Option<String>,
}

/// Wastage recorded against a roll type
///
/// Reconciliation data only: wastage is never subtracted from pieces cut.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuttingWastageEntry {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub type_index: Option<TypeIndex>,
    pub log_date: NaiveDate,
    pub wastage_pieces: u32,
    /// Measured weight of leftover fabric; `None` when nobody weighed it
    pub actual_weight_kg: Option<Decimal>,
    pub notes: Option<String>,
}
