//! Production entry handlers: cutting, wastage, salary and expenses

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::entries::{
    CuttingLogInput, EntryService, ExpenseInput, PaymentInput, SalaryInput, WastageInput,
};
use crate::AppState;

pub async fn create_cutting_log(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<CuttingLogInput>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryService::new(state.store.clone())
        .log_cutting(batch_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_cutting_log(
    State(state): State<AppState>,
    Path((batch_id, log_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<CuttingLogInput>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryService::new(state.store.clone())
        .update_cutting_log(batch_id, log_id, input)
        .await?;
    Ok(Json(entry))
}

pub async fn delete_cutting_log(
    State(state): State<AppState>,
    Path((batch_id, log_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    EntryService::new(state.store.clone())
        .delete_cutting_log(batch_id, log_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_wastage_entry(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<WastageInput>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryService::new(state.store.clone())
        .log_wastage(batch_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Add piece-rate wages; the batch cost summary is refreshed
pub async fn create_salary_entry(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<SalaryInput>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryService::new(state.store.clone())
        .add_salary_entry(batch_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn record_salary_payment(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(input): Json<PaymentInput>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryService::new(state.store.clone())
        .record_salary_payment(entry_id, input)
        .await?;
    Ok(Json(entry))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<ExpenseInput>,
) -> AppResult<impl IntoResponse> {
    let entry = EntryService::new(state.store.clone())
        .add_expense(batch_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
