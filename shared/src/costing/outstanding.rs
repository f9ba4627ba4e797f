//! Payment tracking: outstanding wages, job-work balances and collections

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{JobWorkOrder, PaymentStatus, SalaryEntry, WorkStatus};
use crate::types::percent_of;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalaryOutstandingRow {
    pub entry_id: Uuid,
    pub worker_name: String,
    pub style_id: Option<Uuid>,
    pub cost: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

/// Job-work order with its balance recomputed from total and paid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobOrderReport {
    pub order_id: Uuid,
    pub order_number: String,
    pub company_name: String,
    pub style_ids: Vec<Uuid>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub paid_percent: Decimal,
    pub payment_status: PaymentStatus,
    pub work_status: WorkStatus,
    pub overpaid: bool,
    /// False when the stored balance had drifted from `total − paid`
    pub stored_balance_consistent: bool,
}

pub fn build_job_order_report(order: &JobWorkOrder) -> JobOrderReport {
    JobOrderReport {
        order_id: order.id,
        order_number: order.order_number.clone(),
        company_name: order.company_name.clone(),
        style_ids: order.style_ids(),
        total_amount: order.total_amount,
        paid_amount: order.paid_amount,
        balance_amount: order.derived_balance(),
        paid_percent: percent_of(order.paid_amount, order.total_amount),
        payment_status: PaymentStatus::derive(order.total_amount, order.paid_amount),
        work_status: order.work_status,
        overpaid: order.is_overpaid(),
        stored_balance_consistent: order.is_balanced(),
    }
}

/// Everything still owed on a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutstandingReport {
    pub salaries: Vec<SalaryOutstandingRow>,
    pub job_orders: Vec<JobOrderReport>,
    pub total_salary_outstanding: Decimal,
    pub total_job_work_balance: Decimal,
    pub total_outstanding: Decimal,
    /// Orders with a negative balance, listed for correction
    pub overpaid_orders: Vec<Uuid>,
}

pub fn build_outstanding_report(
    salaries: &[SalaryEntry],
    orders: &[JobWorkOrder],
) -> OutstandingReport {
    let salaries: Vec<SalaryOutstandingRow> = salaries
        .iter()
        .map(|e| SalaryOutstandingRow {
            entry_id: e.id,
            worker_name: e.worker_name.clone(),
            style_id: e.style_id,
            cost: e.cost(),
            paid: e.paid_amount,
            outstanding: e.outstanding(),
        })
        .collect();
    let job_orders: Vec<JobOrderReport> = orders.iter().map(build_job_order_report).collect();

    let total_salary_outstanding: Decimal = salaries.iter().map(|r| r.outstanding).sum();
    let total_job_work_balance: Decimal = job_orders.iter().map(|r| r.balance_amount).sum();
    let overpaid_orders = job_orders
        .iter()
        .filter(|r| r.overpaid)
        .map(|r| r.order_id)
        .collect();

    OutstandingReport {
        salaries,
        job_orders,
        total_salary_outstanding,
        total_job_work_balance,
        total_outstanding: total_salary_outstanding + total_job_work_balance,
        overpaid_orders,
    }
}

/// Billing and collection per sub-contractor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyCollection {
    pub company_name: String,
    pub order_count: usize,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSummary {
    pub companies: Vec<CompanyCollection>,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_balance: Decimal,
    pub paid_percent: Decimal,
}

/// Group job-work orders by company, largest balance first
pub fn summarize_collections(orders: &[JobWorkOrder]) -> CollectionSummary {
    let mut by_company: BTreeMap<&str, CompanyCollection> = BTreeMap::new();
    for order in orders {
        let entry = by_company
            .entry(order.company_name.as_str())
            .or_insert_with(|| CompanyCollection {
                company_name: order.company_name.clone(),
                ..CompanyCollection::default()
            });
        entry.order_count += 1;
        entry.total_billed += order.total_amount;
        entry.total_paid += order.paid_amount;
        entry.total_balance += order.derived_balance();
    }

    let mut companies: Vec<CompanyCollection> = by_company.into_values().collect();
    companies.sort_by(|a, b| b.total_balance.cmp(&a.total_balance));

    let total_billed: Decimal = companies.iter().map(|c| c.total_billed).sum();
    let total_paid: Decimal = companies.iter().map(|c| c.total_paid).sum();

    CollectionSummary {
        companies,
        total_billed,
        total_paid,
        total_balance: total_billed - total_paid,
        paid_percent: percent_of(total_paid, total_billed),
    }
}
