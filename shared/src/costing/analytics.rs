//! Company-level rollups and rate card analytics

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profitability::{margin, BatchProfitability};
use crate::models::{Operation, RateCard};
use crate::types::{percent_of, ratio_or_zero};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyBatchRow {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub cut_pieces: u64,
    pub expected_revenue: Decimal,
    pub actual_cost: Decimal,
    pub amount_paid: Decimal,
    pub expected_profit: Decimal,
    pub actual_profit: Decimal,
    pub margin_percent: Decimal,
}

/// A style's figures summed over every batch it was cut in
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleLeaderboardEntry {
    pub style_id: Uuid,
    pub style_number: Option<String>,
    pub batch_count: usize,
    pub cut_pieces: u64,
    pub expected_revenue: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyAnalytics {
    pub batch_count: usize,
    pub batches: Vec<CompanyBatchRow>,
    pub total_cut_pieces: u64,
    pub total_expected_revenue: Decimal,
    pub total_actual_cost: Decimal,
    pub total_amount_paid: Decimal,
    pub expected_profit: Decimal,
    pub actual_profit: Decimal,
    pub expected_margin_percent: Decimal,
    pub actual_margin_percent: Decimal,
    /// Sorted by profit, most profitable first
    pub styles: Vec<StyleLeaderboardEntry>,
}

/// Fold batch reports into company totals
///
/// Works purely on already-built batch reports, so every figure matches the
/// batch screens exactly.
pub fn build_company_analytics(reports: &[BatchProfitability]) -> CompanyAnalytics {
    let mut analytics = CompanyAnalytics {
        batch_count: reports.len(),
        ..CompanyAnalytics::default()
    };
    let mut styles: BTreeMap<Uuid, StyleLeaderboardEntry> = BTreeMap::new();

    for report in reports {
        let totals = &report.totals;
        analytics.batches.push(CompanyBatchRow {
            batch_id: report.batch_id,
            batch_number: report.batch_number.clone(),
            cut_pieces: totals.total_cut_pieces,
            expected_revenue: totals.total_expected_revenue,
            actual_cost: totals.total_actual_cost,
            amount_paid: totals.total_amount_paid,
            expected_profit: totals.expected_profit,
            actual_profit: totals.actual_profit,
            margin_percent: totals.expected_margin_percent,
        });
        analytics.total_cut_pieces += totals.total_cut_pieces;
        analytics.total_expected_revenue += totals.total_expected_revenue;
        analytics.total_actual_cost += totals.total_actual_cost;
        analytics.total_amount_paid += totals.total_amount_paid;
        analytics.expected_profit += totals.expected_profit;
        analytics.actual_profit += totals.actual_profit;

        for row in &report.styles {
            let entry = styles.entry(row.style_id).or_insert_with(|| StyleLeaderboardEntry {
                style_id: row.style_id,
                ..StyleLeaderboardEntry::default()
            });
            if entry.style_number.is_none() {
                entry.style_number = row.style_number.clone();
            }
            entry.batch_count += 1;
            entry.cut_pieces += row.cut_pieces;
            entry.expected_revenue += row.expected_revenue;
            entry.total_cost += row.total_cost;
            entry.profit += row.profit;
        }
    }

    analytics.expected_margin_percent =
        margin(analytics.expected_profit, analytics.total_expected_revenue);
    analytics.actual_margin_percent =
        margin(analytics.actual_profit, analytics.total_expected_revenue);

    analytics.styles = styles
        .into_values()
        .map(|mut entry| {
            entry.margin_percent = margin(entry.profit, entry.expected_revenue);
            entry
        })
        .collect();
    analytics.styles.sort_by(|a, b| b.profit.cmp(&a.profit));
    analytics
}

/// Operation cost grouped by category or machine type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationGroup {
    pub key: String,
    pub operation_count: usize,
    pub total_smv: Decimal,
    pub total_rate: Decimal,
    /// Share of the summed operation rates
    pub share_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateCardAnalytics {
    pub rate_card_id: Uuid,
    pub name: String,
    pub category: String,
    pub operation_count: usize,
    pub total_smv: Decimal,
    pub operations_total: Decimal,
    pub finishing_packing_cost: Decimal,
    pub overheads_cost: Decimal,
    pub base: Decimal,
    pub company_profit_percent: Decimal,
    pub company_profit_rupees: Decimal,
    pub final_rate: Decimal,
    /// Final rate earned per standard minute, zero without SMV
    pub rate_per_smv_minute: Decimal,
    pub by_category: Vec<OperationGroup>,
    pub by_machine: Vec<OperationGroup>,
}

fn group_operations<F>(operations: &[Operation], operations_total: Decimal, key: F) -> Vec<OperationGroup>
where
    F: Fn(&Operation) -> String,
{
    let mut groups: BTreeMap<String, OperationGroup> = BTreeMap::new();
    for op in operations {
        let k = key(op);
        let group = groups.entry(k.clone()).or_insert_with(|| OperationGroup {
            key: k,
            ..OperationGroup::default()
        });
        group.operation_count += 1;
        group.total_smv += op.smv;
        group.total_rate += op.rate;
    }

    let mut groups: Vec<OperationGroup> = groups
        .into_values()
        .map(|mut g| {
            g.share_percent = percent_of(g.total_rate, operations_total);
            g
        })
        .collect();
    groups.sort_by(|a, b| b.total_rate.cmp(&a.total_rate));
    groups
}

pub fn analyze_rate_card(card: &RateCard) -> RateCardAnalytics {
    let rates = card.breakdown();
    let operations_total = rates.operations_total();
    let total_smv = rates.total_smv();
    let final_rate = rates.final_rate();

    RateCardAnalytics {
        rate_card_id: card.id,
        name: card.name.clone(),
        category: card.category.clone(),
        operation_count: rates.operations.len(),
        total_smv,
        operations_total,
        finishing_packing_cost: rates.finishing_packing_cost,
        overheads_cost: rates.overheads_cost,
        base: rates.base(),
        company_profit_percent: rates.company_profit_percent,
        company_profit_rupees: rates.company_profit_rupees,
        final_rate,
        rate_per_smv_minute: ratio_or_zero(final_rate, total_smv),
        by_category: group_operations(&rates.operations, operations_total, |op| {
            op.category.clone()
        }),
        by_machine: group_operations(&rates.operations, operations_total, |op| {
            op.machine_type.clone().unwrap_or_else(|| "Manual".to_string())
        }),
    }
}
