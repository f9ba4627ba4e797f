//! CMT quotation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use shared::CmtQuotation;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::quotation::{ProfitEditInput, QuotationService};
use crate::AppState;

pub async fn get_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> AppResult<Json<CmtQuotation>> {
    let quotation = QuotationService::new(state.store.clone())
        .get(quotation_id)
        .await?;
    Ok(Json(quotation))
}

/// Edit company profit by percent or rupees
pub async fn update_quotation_profit(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
    Json(input): Json<ProfitEditInput>,
) -> AppResult<Json<CmtQuotation>> {
    let quotation = QuotationService::new(state.store.clone())
        .edit_profit(quotation_id, input)
        .await?;
    Ok(Json(quotation))
}

pub async fn approve_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> AppResult<Json<CmtQuotation>> {
    let quotation = QuotationService::new(state.store.clone())
        .approve(quotation_id)
        .await?;
    Ok(Json(quotation))
}
