//! Route definitions for the garment costing API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/batches", batch_routes())
        .nest("/salary-entries", salary_routes())
        .nest("/job-orders", job_order_routes())
        .nest("/quotations", quotation_routes())
        .nest("/rate-cards", rate_card_routes())
        .route("/analytics/company", get(handlers::get_company_analytics))
}

/// Batch reports, settings and production entries
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/:batch_id/report", get(handlers::get_batch_report))
        .route("/:batch_id/report/styles", get(handlers::get_style_report))
        .route("/:batch_id/wastage", get(handlers::get_wastage_report))
        .route("/:batch_id/outstanding", get(handlers::get_outstanding_report))
        .route(
            "/:batch_id/cost-summary",
            get(handlers::get_cost_summary).put(handlers::update_cost_summary),
        )
        .route("/:batch_id/gst", put(handlers::update_gst))
        .route("/:batch_id/cutting-logs", post(handlers::create_cutting_log))
        .route(
            "/:batch_id/cutting-logs/:log_id",
            put(handlers::update_cutting_log).delete(handlers::delete_cutting_log),
        )
        .route("/:batch_id/cutting-wastage", post(handlers::create_wastage_entry))
        .route("/:batch_id/salary-entries", post(handlers::create_salary_entry))
        .route("/:batch_id/expenses", post(handlers::create_expense))
}

fn salary_routes() -> Router<AppState> {
    Router::new().route("/:entry_id/payments", post(handlers::record_salary_payment))
}

fn job_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_job_order))
        .route("/collections", get(handlers::get_job_order_collections))
        .route("/:order_id", put(handlers::update_job_order))
        .route("/:order_id/report", get(handlers::get_job_order_report))
        .route("/:order_id/payments", post(handlers::record_job_order_payment))
}

fn quotation_routes() -> Router<AppState> {
    Router::new()
        .route("/:quotation_id", get(handlers::get_quotation))
        .route("/:quotation_id/profit", put(handlers::update_quotation_profit))
        .route("/:quotation_id/approve", post(handlers::approve_quotation))
}

fn rate_card_routes() -> Router<AppState> {
    Router::new().route("/:rate_card_id/analytics", get(handlers::get_rate_card_analytics))
}
