//! WebAssembly module for the Garment Costing Engine
//!
//! Provides client-side previews for:
//! - Company profit edits (percent or rupees) on a CMT rate breakdown
//! - GST on a base amount
//! - Expense share of a style

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{GstSetting, ProfitEdit, RateBreakdown};
use wasm_bindgen::prelude::*;

/// Recomputed profit pair and rates after an edit
#[derive(Debug, Serialize)]
struct ProfitPreview {
    base: Decimal,
    company_profit_percent: Decimal,
    company_profit_rupees: Decimal,
    final_rate: Decimal,
    rates: RateBreakdown,
}

fn to_decimal(value: f64, field: &str) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("{} is not a finite number", field))
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn preview_profit_edit(breakdown_json: &str, edit: ProfitEdit) -> Result<String, String> {
    let rates: RateBreakdown = serde_json::from_str(breakdown_json)
        .map_err(|e| format!("Invalid rate breakdown JSON: {}", e))?;
    let rates = rates.with_profit_edit(edit);
    let preview = ProfitPreview {
        base: rates.base(),
        company_profit_percent: rates.company_profit_percent,
        company_profit_rupees: rates.company_profit_rupees,
        final_rate: rates.final_rate(),
        rates,
    };
    serde_json::to_string(&preview).map_err(|e| format!("Serialization failed: {}", e))
}

fn preview_gst(base_amount: f64, enabled: bool, percentage: f64) -> Result<String, String> {
    let base = to_decimal(base_amount, "base_amount")?;
    let percentage = to_decimal(percentage, "percentage")?;
    shared::validate_gst_percentage(percentage)?;

    let breakdown = shared::calculate_gst(base, &GstSetting { enabled, percentage });
    serde_json::to_string(&breakdown).map_err(|e| format!("Serialization failed: {}", e))
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

/// Set the company profit percent; rupees and final rate follow
#[wasm_bindgen]
pub fn edit_profit_percent(breakdown_json: &str, percent: f64) -> Result<String, JsValue> {
    let percent = to_decimal(percent, "percent").map_err(to_js_error)?;
    preview_profit_edit(breakdown_json, ProfitEdit::Percent(percent)).map_err(to_js_error)
}

/// Set the company profit in rupees; percent and final rate follow
#[wasm_bindgen]
pub fn edit_profit_rupees(breakdown_json: &str, rupees: f64) -> Result<String, JsValue> {
    let rupees = to_decimal(rupees, "rupees").map_err(to_js_error)?;
    preview_profit_edit(breakdown_json, ProfitEdit::Rupees(rupees)).map_err(to_js_error)
}

/// GST breakdown as JSON; a disabled setting yields zero GST
#[wasm_bindgen]
pub fn calculate_gst(base_amount: f64, enabled: bool, percentage: f64) -> Result<String, JsValue> {
    preview_gst(base_amount, enabled, percentage).map_err(to_js_error)
}

/// Share of batch expenses carried by a style's cut pieces
#[wasm_bindgen]
pub fn expense_share(style_pieces: u32, total_pieces: u32, total_expenses: f64) -> f64 {
    let expenses = Decimal::try_from(total_expenses).unwrap_or(Decimal::ZERO);
    to_f64(shared::expense_share(
        u64::from(style_pieces),
        u64::from(total_pieces),
        expenses,
    ))
}
