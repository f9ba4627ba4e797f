//! Batch report and settings handlers

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{BatchProfitability, CostSummary, OutstandingReport, WastageReport};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::batch::{BatchService, GstUpdate, UpdateGstInput};
use crate::services::cost_summary::{CostSummaryService, UpdateCostSummaryInput};
use crate::services::export::style_rows_csv;
use crate::services::CostingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>, // "json" or "csv"
}

fn costing_service(state: &AppState) -> CostingService {
    CostingService::new(state.store.clone(), state.config.costing.policy())
}

/// Full profitability report of a batch
pub async fn get_batch_report(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<BatchProfitability>> {
    let report = costing_service(&state).batch_report(batch_id).await?;
    Ok(Json(report))
}

/// Style-wise rows, as JSON or as a CSV download
pub async fn get_style_report(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let report = costing_service(&state).batch_report(batch_id).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = style_rows_csv(&report)?;
        let disposition = format!(
            "attachment; filename=\"{}_styles.csv\"",
            report.batch_number.replace('"', "")
        );
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(serde_json::json!({
            "styles": report.styles,
            "totals": report.style_totals,
            "unassigned_expense_share": report.unassigned_expense_share,
        }))
        .into_response())
    }
}

pub async fn get_wastage_report(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<WastageReport>> {
    let report = costing_service(&state).wastage_report(batch_id).await?;
    Ok(Json(report))
}

pub async fn get_outstanding_report(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<OutstandingReport>> {
    let report = costing_service(&state).outstanding_report(batch_id).await?;
    Ok(Json(report))
}

pub async fn get_cost_summary(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<CostSummary>> {
    let summary = CostSummaryService::new(state.store.clone()).get(batch_id).await?;
    Ok(Json(summary))
}

/// Save material, transport and misc costs; labour and total are derived
pub async fn update_cost_summary(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateCostSummaryInput>,
) -> AppResult<Json<CostSummary>> {
    let summary = CostSummaryService::new(state.store.clone())
        .update(batch_id, input)
        .await?;
    Ok(Json(summary))
}

pub async fn update_gst(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateGstInput>,
) -> AppResult<Json<GstUpdate>> {
    let service = BatchService::new(
        state.store.clone(),
        state.config.costing.default_gst_percentage,
    );
    let update = service.update_gst(batch_id, input).await?;
    Ok(Json(update))
}
