//! Job-work order handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CollectionSummary, JobOrderReport};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::entries::{
    CreateJobWorkOrderInput, EntryService, PaymentInput, UpdateJobWorkOrderInput,
};
use crate::services::CostingService;
use crate::AppState;

pub async fn create_job_order(
    State(state): State<AppState>,
    Json(input): Json<CreateJobWorkOrderInput>,
) -> AppResult<impl IntoResponse> {
    let order = EntryService::new(state.store.clone())
        .create_job_work_order(input)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_job_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateJobWorkOrderInput>,
) -> AppResult<impl IntoResponse> {
    let order = EntryService::new(state.store.clone())
        .update_job_work_order(order_id, input)
        .await?;
    Ok(Json(order))
}

/// Record money paid to the sub-contractor
pub async fn record_job_order_payment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<PaymentInput>,
) -> AppResult<impl IntoResponse> {
    let order = EntryService::new(state.store.clone())
        .record_job_work_payment(order_id, input)
        .await?;
    Ok(Json(order))
}

pub async fn get_job_order_report(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<JobOrderReport>> {
    let service = CostingService::new(state.store.clone(), state.config.costing.policy());
    let report = service.job_order_report(order_id).await?;
    Ok(Json(report))
}

/// Billing and collection grouped by sub-contractor
pub async fn get_job_order_collections(
    State(state): State<AppState>,
) -> AppResult<Json<CollectionSummary>> {
    let service = CostingService::new(state.store.clone(), state.config.costing.policy());
    let summary = service.collections().await?;
    Ok(Json(summary))
}
