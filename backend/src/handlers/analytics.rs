//! Analytics handlers

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{CompanyAnalytics, RateCardAnalytics};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::CostingService;
use crate::AppState;

/// Company-wide totals and style leaderboard
pub async fn get_company_analytics(
    State(state): State<AppState>,
) -> AppResult<Json<CompanyAnalytics>> {
    let service = CostingService::new(state.store.clone(), state.config.costing.policy());
    Ok(Json(service.company_analytics().await?))
}

pub async fn get_rate_card_analytics(
    State(state): State<AppState>,
    Path(rate_card_id): Path<Uuid>,
) -> AppResult<Json<RateCardAnalytics>> {
    let service = CostingService::new(state.store.clone(), state.config.costing.policy());
    Ok(Json(service.rate_card_analytics(rate_card_id).await?))
}
