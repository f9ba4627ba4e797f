//! CSV export of batch reports

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{round_money, BatchProfitability, RateSource};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// One line of the style-wise profitability sheet
#[derive(Debug, Serialize)]
struct StyleCsvRow<'a> {
    style_id: Option<Uuid>,
    style_number: &'a str,
    rate_source: Option<RateSource>,
    cmt_rate: Option<Decimal>,
    cut_pieces: u64,
    expected_revenue: Decimal,
    total_salary: Decimal,
    salary_paid: Decimal,
    jw_total: Decimal,
    jw_paid: Decimal,
    expense_share: Decimal,
    total_cost: Decimal,
    profit: Decimal,
    margin_percent: Decimal,
}

/// Style rows followed by a TOTAL line, money rounded to paise
pub fn style_rows_csv(report: &BatchProfitability) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for row in &report.styles {
        wtr.serialize(StyleCsvRow {
            style_id: Some(row.style_id),
            style_number: row.style_number.as_deref().unwrap_or(""),
            rate_source: Some(row.rate_source),
            cmt_rate: Some(round_money(row.cmt_rate)),
            cut_pieces: row.cut_pieces,
            expected_revenue: round_money(row.expected_revenue),
            total_salary: round_money(row.total_salary),
            salary_paid: round_money(row.salary_paid),
            jw_total: round_money(row.jw_total),
            jw_paid: round_money(row.jw_paid),
            expense_share: round_money(row.expense_share),
            total_cost: round_money(row.total_cost),
            profit: round_money(row.profit),
            margin_percent: round_money(row.margin_percent),
        })?;
    }

    let totals = &report.style_totals;
    wtr.serialize(StyleCsvRow {
        style_id: None,
        style_number: "TOTAL",
        rate_source: None,
        cmt_rate: None,
        cut_pieces: totals.cut_pieces,
        expected_revenue: round_money(totals.expected_revenue),
        total_salary: round_money(totals.total_salary),
        salary_paid: round_money(totals.salary_paid),
        jw_total: round_money(totals.jw_total),
        jw_paid: round_money(totals.jw_paid),
        expense_share: round_money(totals.expense_share),
        total_cost: round_money(totals.total_cost),
        profit: round_money(totals.profit),
        margin_percent: round_money(totals.margin_percent),
    })?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
}
