//! Profitability reporter: per-style profit and batch totals
//!
//! Every batch screen consumes [`BatchProfitability`]; nothing else computes
//! revenue, cost or profit figures. Reports are rebuilt from the full event
//! snapshot on each request, so there is no incremental state to keep in
//! sync.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregator::{aggregate_cutting, CuttingAggregate};
use super::gst::{calculate_gst, GstBreakdown};
use super::rates::{resolve_cmt_rate, RateSource};
use crate::models::{
    total_expenses, total_salary_cost, total_salary_paid, Batch, CmtQuotation, CuttingLogEntry,
    CuttingWastageEntry, ExpenseEntry, JobWorkOrder, RollType, SalaryEntry,
};
use crate::types::{percent_of, ratio_or_zero, UnknownVariant};

/// Which job-work figure counts as incurred cost
///
/// `Paid` treats job work as a cost only once money has left the business,
/// while salary and expenses always count in full. `Billed` counts the full
/// order amount, like salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobWorkCostBasis {
    #[default]
    Paid,
    Billed,
}

impl JobWorkCostBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobWorkCostBasis::Paid => "paid",
            JobWorkCostBasis::Billed => "billed",
        }
    }
}

impl FromStr for JobWorkCostBasis {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(JobWorkCostBasis::Paid),
            "billed" => Ok(JobWorkCostBasis::Billed),
            other => Err(UnknownVariant::new("job work cost basis", other)),
        }
    }
}

/// Business rules that vary between installations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostingPolicy {
    pub job_work_cost_basis: JobWorkCostBasis,
}

/// Everything the reporter needs for one batch, as read from the store
#[derive(Debug, Clone)]
pub struct BatchSnapshot {
    pub batch: Batch,
    pub roll_types: Vec<RollType>,
    pub cutting_logs: Vec<CuttingLogEntry>,
    pub cutting_wastage: Vec<CuttingWastageEntry>,
    pub salary_entries: Vec<SalaryEntry>,
    pub job_work_orders: Vec<JobWorkOrder>,
    pub expenses: Vec<ExpenseEntry>,
    /// Linked quotation per style, where one exists
    pub quotations: BTreeMap<Uuid, CmtQuotation>,
}

impl BatchSnapshot {
    /// Styles linked from at least one roll type
    pub fn style_ids(&self) -> BTreeSet<Uuid> {
        self.roll_types.iter().filter_map(|r| r.style_id).collect()
    }
}

/// Split batch expenses by cutting volume
///
/// `style_pieces / total_pieces × total_expenses`, zero when nothing has been
/// cut yet.
pub fn expense_share(style_pieces: u64, total_pieces: u64, total_expenses: Decimal) -> Decimal {
    if total_pieces == 0 {
        return Decimal::ZERO;
    }
    total_expenses * Decimal::from(style_pieces) / Decimal::from(total_pieces)
}

/// One row of the per-style profit table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleProfitRow {
    pub style_id: Uuid,
    pub style_number: Option<String>,
    pub cmt_rate: Decimal,
    pub rate_source: RateSource,
    pub cut_pieces: u64,
    pub expected_revenue: Decimal,
    pub total_salary: Decimal,
    pub salary_paid: Decimal,
    pub jw_total: Decimal,
    pub jw_paid: Decimal,
    pub expense_share: Decimal,
    /// `total_salary + jw_total + expense_share`
    pub total_cost: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

/// Column sums of the per-style table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleColumnTotals {
    pub cut_pieces: u64,
    pub expected_revenue: Decimal,
    pub total_salary: Decimal,
    pub salary_paid: Decimal,
    pub jw_total: Decimal,
    pub jw_paid: Decimal,
    pub expense_share: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

/// Batch-level figures folded from the raw collections
///
/// Job-work orders tagged with several styles appear in each of those style
/// rows, but are counted once here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchTotals {
    pub total_cut_pieces: u64,
    pub total_expected_revenue: Decimal,
    pub total_salary: Decimal,
    pub total_salary_paid: Decimal,
    pub total_expenses: Decimal,
    pub total_job_work_billed: Decimal,
    pub total_job_work_paid: Decimal,
    /// Salary + expenses + job work on the policy's cost basis
    pub total_actual_cost: Decimal,
    /// Salary paid + expenses + job work paid
    pub total_amount_paid: Decimal,
    /// Revenue against incurred cost
    pub expected_profit: Decimal,
    /// Revenue against money actually paid out
    pub actual_profit: Decimal,
    pub expected_margin_percent: Decimal,
    pub actual_margin_percent: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PerPieceEconomics {
    pub cost_per_piece: Decimal,
    pub revenue_per_piece: Decimal,
    pub profit_per_piece: Decimal,
}

impl PerPieceEconomics {
    pub fn from_totals(totals: &BatchTotals) -> Self {
        let pieces = Decimal::from(totals.total_cut_pieces);
        let cost_per_piece = ratio_or_zero(totals.total_actual_cost, pieces);
        let revenue_per_piece = ratio_or_zero(totals.total_expected_revenue, pieces);
        Self {
            cost_per_piece,
            revenue_per_piece,
            profit_per_piece: revenue_per_piece - cost_per_piece,
        }
    }
}

/// Full profitability report of one batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchProfitability {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub policy: CostingPolicy,
    pub styles: Vec<StyleProfitRow>,
    pub style_totals: StyleColumnTotals,
    /// Expense share of cut pieces that belong to no style
    pub unassigned_expense_share: Decimal,
    pub totals: BatchTotals,
    pub per_piece: PerPieceEconomics,
    /// GST on expected revenue, per the batch's saved setting
    pub billing: GstBreakdown,
    pub cutting: CuttingAggregate,
}

/// Build the profitability report for one batch
pub fn build_batch_report(snapshot: &BatchSnapshot, policy: &CostingPolicy) -> BatchProfitability {
    let cutting = aggregate_cutting(
        &snapshot.roll_types,
        &snapshot.cutting_logs,
        &snapshot.cutting_wastage,
    );
    let expenses = total_expenses(&snapshot.expenses);

    let styles: Vec<StyleProfitRow> = snapshot
        .style_ids()
        .into_iter()
        .map(|style_id| style_row(snapshot, &cutting, expenses, style_id))
        .collect();
    let style_totals = column_totals(&styles);

    let unassigned_expense_share =
        expense_share(cutting.unassigned_cut_pieces, cutting.total_cut_pieces, expenses);

    let totals = batch_totals(snapshot, &cutting, &style_totals, expenses, policy);
    let per_piece = PerPieceEconomics::from_totals(&totals);
    let billing = calculate_gst(totals.total_expected_revenue, &snapshot.batch.gst());

    BatchProfitability {
        batch_id: snapshot.batch.id,
        batch_number: snapshot.batch.batch_number.clone(),
        policy: *policy,
        styles,
        style_totals,
        unassigned_expense_share,
        totals,
        per_piece,
        billing,
        cutting,
    }
}

fn style_row(
    snapshot: &BatchSnapshot,
    cutting: &CuttingAggregate,
    batch_expenses: Decimal,
    style_id: Uuid,
) -> StyleProfitRow {
    let quotation = snapshot.quotations.get(&style_id);
    let rate = resolve_cmt_rate(quotation);
    let cut_pieces = cutting.cut_pieces_for_style(style_id);
    let expected_revenue = rate.expected_revenue(cut_pieces);

    let (total_salary, salary_paid) = snapshot
        .salary_entries
        .iter()
        .filter(|e| e.is_for_style(style_id))
        .fold((Decimal::ZERO, Decimal::ZERO), |(cost, paid), e| {
            (cost + e.cost(), paid + e.paid_amount)
        });

    let (jw_total, jw_paid) = snapshot
        .job_work_orders
        .iter()
        .filter(|o| o.covers_style(style_id))
        .fold((Decimal::ZERO, Decimal::ZERO), |(total, paid), o| {
            (total + o.total_amount, paid + o.paid_amount)
        });

    let share = expense_share(cut_pieces, cutting.total_cut_pieces, batch_expenses);
    let total_cost = total_salary + jw_total + share;
    let profit = expected_revenue - total_cost;

    StyleProfitRow {
        style_id,
        style_number: quotation.map(|q| q.style_number.clone()),
        cmt_rate: rate.rate,
        rate_source: rate.source,
        cut_pieces,
        expected_revenue,
        total_salary,
        salary_paid,
        jw_total,
        jw_paid,
        expense_share: share,
        total_cost,
        profit,
        margin_percent: margin(profit, expected_revenue),
    }
}

/// `profit / revenue × 100`, zero without revenue
pub fn margin(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue > Decimal::ZERO {
        percent_of(profit, revenue)
    } else {
        Decimal::ZERO
    }
}

fn column_totals(rows: &[StyleProfitRow]) -> StyleColumnTotals {
    let mut totals = rows.iter().fold(StyleColumnTotals::default(), |mut acc, row| {
        acc.cut_pieces += row.cut_pieces;
        acc.expected_revenue += row.expected_revenue;
        acc.total_salary += row.total_salary;
        acc.salary_paid += row.salary_paid;
        acc.jw_total += row.jw_total;
        acc.jw_paid += row.jw_paid;
        acc.expense_share += row.expense_share;
        acc.total_cost += row.total_cost;
        acc.profit += row.profit;
        acc
    });
    totals.margin_percent = margin(totals.profit, totals.expected_revenue);
    totals
}

fn batch_totals(
    snapshot: &BatchSnapshot,
    cutting: &CuttingAggregate,
    style_totals: &StyleColumnTotals,
    expenses: Decimal,
    policy: &CostingPolicy,
) -> BatchTotals {
    let total_salary = total_salary_cost(&snapshot.salary_entries);
    let total_salary_paid = total_salary_paid(&snapshot.salary_entries);
    let (total_job_work_billed, total_job_work_paid) = snapshot
        .job_work_orders
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(total, paid), o| {
            (total + o.total_amount, paid + o.paid_amount)
        });

    let job_work_cost = match policy.job_work_cost_basis {
        JobWorkCostBasis::Paid => total_job_work_paid,
        JobWorkCostBasis::Billed => total_job_work_billed,
    };
    let total_actual_cost = total_salary + expenses + job_work_cost;
    let total_amount_paid = total_salary_paid + expenses + total_job_work_paid;

    let revenue = style_totals.expected_revenue;
    let expected_profit = revenue - total_actual_cost;
    let actual_profit = revenue - total_amount_paid;

    BatchTotals {
        total_cut_pieces: cutting.total_cut_pieces,
        total_expected_revenue: revenue,
        total_salary,
        total_salary_paid,
        total_expenses: expenses,
        total_job_work_billed,
        total_job_work_paid,
        total_actual_cost,
        total_amount_paid,
        expected_profit,
        actual_profit,
        expected_margin_percent: margin(expected_profit, revenue),
        actual_margin_percent: margin(actual_profit, revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchStatus, ExpenseCategory, QuotationStatus, RateBreakdown};
    use chrono::{NaiveDate, Utc};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    fn batch() -> Batch {
        Batch {
            id: Uuid::new_v4(),
            batch_number: "B-2024-031".to_string(),
            client_name: Some("Coastline Apparel".to_string()),
            status: BatchStatus::Cutting,
            start_date: date(),
            gst_enabled: true,
            gst_percentage: dec("5"),
            created_at: Utc::now(),
        }
    }

    fn roll(index: u32, style_id: Option<Uuid>) -> RollType {
        RollType {
            index,
            color: "White".to_string(),
            fabric_type: "Pique".to_string(),
            gsm: None,
            number_of_rolls: 10,
            weight_per_roll_kg: dec("20"),
            style_id,
            operations: vec![],
        }
    }

    fn log(batch_id: Uuid, index: u32, pieces: u32) -> CuttingLogEntry {
        CuttingLogEntry {
            id: Uuid::new_v4(),
            batch_id,
            type_index: Some(index),
            log_date: date(),
            pieces_cut: pieces,
            notes: None,
        }
    }

    fn expense(batch_id: Uuid, amount: &str) -> ExpenseEntry {
        ExpenseEntry {
            id: Uuid::new_v4(),
            batch_id,
            category: ExpenseCategory::Transport,
            amount: dec(amount),
            expense_date: date(),
            description: None,
        }
    }

    fn quotation(style_id: Uuid, rate: &str) -> CmtQuotation {
        CmtQuotation {
            id: Uuid::new_v4(),
            style_id,
            style_number: "POLO-01".to_string(),
            client_name: None,
            status: QuotationStatus::Sent,
            quoted: RateBreakdown::default(),
            final_cmt_per_piece: Some(dec(rate)),
            approved_rates: None,
            updated_at: Utc::now(),
        }
    }

    fn salary(batch_id: Uuid, style_id: Option<Uuid>, rate: &str, qty: u32, paid: &str) -> SalaryEntry {
        SalaryEntry {
            id: Uuid::new_v4(),
            batch_id,
            style_id,
            worker_name: "Meena".to_string(),
            operation: None,
            rate_per_piece: dec(rate),
            quantity: qty,
            paid_amount: dec(paid),
            entry_date: date(),
        }
    }

    fn snapshot() -> BatchSnapshot {
        let batch = batch();
        BatchSnapshot {
            roll_types: vec![],
            cutting_logs: vec![],
            cutting_wastage: vec![],
            salary_entries: vec![],
            job_work_orders: vec![],
            expenses: vec![],
            quotations: BTreeMap::new(),
            batch,
        }
    }

    #[test]
    fn test_expense_share_guard() {
        assert_eq!(expense_share(0, 0, dec("2700")), Decimal::ZERO);
        assert_eq!(expense_share(180, 270, dec("2700")), dec("1800"));
    }

    #[test]
    fn test_style_row_profit_and_margin() {
        let s1 = Uuid::new_v4();
        let mut snap = snapshot();
        let id = snap.batch.id;
        snap.roll_types = vec![roll(0, Some(s1))];
        snap.cutting_logs = vec![log(id, 0, 100)];
        snap.quotations.insert(s1, quotation(s1, "50"));
        snap.salary_entries = vec![salary(id, Some(s1), "10", 100, "600")];
        snap.expenses = vec![expense(id, "500")];

        let report = build_batch_report(&snap, &CostingPolicy::default());
        let row = &report.styles[0];
        assert_eq!(row.expected_revenue, dec("5000"));
        assert_eq!(row.total_salary, dec("1000"));
        assert_eq!(row.expense_share, dec("500"));
        assert_eq!(row.total_cost, dec("1500"));
        assert_eq!(row.profit, dec("3500"));
        assert_eq!(row.margin_percent, dec("70"));
        assert_eq!(row.style_number.as_deref(), Some("POLO-01"));
    }

    #[test]
    fn test_unpriced_style_has_zero_margin() {
        let s1 = Uuid::new_v4();
        let mut snap = snapshot();
        let id = snap.batch.id;
        snap.roll_types = vec![roll(0, Some(s1))];
        snap.cutting_logs = vec![log(id, 0, 100)];
        snap.salary_entries = vec![salary(id, Some(s1), "2", 100, "0")];

        let report = build_batch_report(&snap, &CostingPolicy::default());
        let row = &report.styles[0];
        assert_eq!(row.rate_source, RateSource::Unpriced);
        assert_eq!(row.expected_revenue, Decimal::ZERO);
        assert_eq!(row.profit, dec("-200"));
        assert_eq!(row.margin_percent, Decimal::ZERO);
    }

    #[test]
    fn test_empty_batch_has_defined_figures() {
        let report = build_batch_report(&snapshot(), &CostingPolicy::default());
        assert!(report.styles.is_empty());
        assert_eq!(report.per_piece, PerPieceEconomics::default());
        assert_eq!(report.totals.expected_margin_percent, Decimal::ZERO);
        assert_eq!(report.unassigned_expense_share, Decimal::ZERO);
    }

    #[test]
    fn test_untagged_salary_counts_only_at_batch_level() {
        let s1 = Uuid::new_v4();
        let mut snap = snapshot();
        let id = snap.batch.id;
        snap.roll_types = vec![roll(0, Some(s1))];
        snap.cutting_logs = vec![log(id, 0, 10)];
        snap.salary_entries = vec![
            salary(id, Some(s1), "1", 10, "10"),
            salary(id, None, "5", 10, "0"),
        ];

        let report = build_batch_report(&snap, &CostingPolicy::default());
        assert_eq!(report.style_totals.total_salary, dec("10"));
        assert_eq!(report.totals.total_salary, dec("60"));
        assert_eq!(report.totals.total_salary_paid, dec("10"));
    }

    #[test]
    fn test_per_piece_economics() {
        let s1 = Uuid::new_v4();
        let mut snap = snapshot();
        let id = snap.batch.id;
        snap.roll_types = vec![roll(0, Some(s1))];
        snap.cutting_logs = vec![log(id, 0, 200)];
        snap.quotations.insert(s1, quotation(s1, "30"));
        snap.expenses = vec![expense(id, "1000")];
        snap.salary_entries = vec![salary(id, Some(s1), "10", 200, "2000")];

        let report = build_batch_report(&snap, &CostingPolicy::default());
        assert_eq!(report.per_piece.cost_per_piece, dec("15"));
        assert_eq!(report.per_piece.revenue_per_piece, dec("30"));
        assert_eq!(report.per_piece.profit_per_piece, dec("15"));
    }

    #[test]
    fn test_billing_applies_batch_gst() {
        let s1 = Uuid::new_v4();
        let mut snap = snapshot();
        let id = snap.batch.id;
        snap.roll_types = vec![roll(0, Some(s1))];
        snap.cutting_logs = vec![log(id, 0, 100)];
        snap.quotations.insert(s1, quotation(s1, "40"));

        let report = build_batch_report(&snap, &CostingPolicy::default());
        assert_eq!(report.billing.base_amount, dec("4000"));
        assert_eq!(report.billing.gst_amount, dec("200"));
        assert_eq!(report.billing.total_with_gst, dec("4200"));
    }

    #[test]
    fn test_cost_basis_parse() {
        assert_eq!("paid".parse::<JobWorkCostBasis>(), Ok(JobWorkCostBasis::Paid));
        assert_eq!("billed".parse::<JobWorkCostBasis>(), Ok(JobWorkCostBasis::Billed));
        assert!("accrued".parse::<JobWorkCostBasis>().is_err());
    }
}
