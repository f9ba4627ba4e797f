//! In-memory event store for service tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    Batch, CmtQuotation, CostSummary, CostSummaryEdit, CuttingLogEntry, CuttingWastageEntry,
    ExpenseEntry, GstSetting, JobWorkOrder, QuotationStatus, RateCard, RollType, SalaryEntry,
    WorkStatus,
};
use uuid::Uuid;

use super::EventStore;
use crate::error::AppResult;

#[derive(Default)]
struct Tables {
    batches: Vec<Batch>,
    roll_types: HashMap<Uuid, Vec<RollType>>,
    cutting_logs: Vec<CuttingLogEntry>,
    cutting_wastage: Vec<CuttingWastageEntry>,
    salary_entries: Vec<SalaryEntry>,
    job_work_orders: Vec<JobWorkOrder>,
    expenses: Vec<ExpenseEntry>,
    quotations: Vec<CmtQuotation>,
    rate_cards: Vec<RateCard>,
    cost_summaries: HashMap<Uuid, CostSummary>,
}

#[derive(Default)]
pub struct MemoryEventStore {
    tables: Mutex<Tables>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    pub fn add_batch(&self, batch: Batch, roll_types: Vec<RollType>) {
        self.with(|t| {
            t.roll_types.insert(batch.id, roll_types);
            t.batches.push(batch);
        });
    }

    pub fn add_quotation(&self, quotation: CmtQuotation) {
        self.with(|t| t.quotations.push(quotation));
    }

    pub fn add_rate_card(&self, card: RateCard) {
        self.with(|t| t.rate_cards.push(card));
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get_batch(&self, batch_id: Uuid) -> AppResult<Option<Batch>> {
        Ok(self.with(|t| t.batches.iter().find(|b| b.id == batch_id).cloned()))
    }

    async fn list_batches(&self) -> AppResult<Vec<Batch>> {
        Ok(self.with(|t| t.batches.clone()))
    }

    async fn get_roll_types(&self, batch_id: Uuid) -> AppResult<Vec<RollType>> {
        Ok(self.with(|t| t.roll_types.get(&batch_id).cloned().unwrap_or_default()))
    }

    async fn list_cutting_logs(&self, batch_id: Uuid) -> AppResult<Vec<CuttingLogEntry>> {
        Ok(self.with(|t| {
            t.cutting_logs
                .iter()
                .filter(|l| l.batch_id == batch_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_cutting_wastage(&self, batch_id: Uuid) -> AppResult<Vec<CuttingWastageEntry>> {
        Ok(self.with(|t| {
            t.cutting_wastage
                .iter()
                .filter(|w| w.batch_id == batch_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_salary_entries(&self, batch_id: Uuid) -> AppResult<Vec<SalaryEntry>> {
        Ok(self.with(|t| {
            t.salary_entries
                .iter()
                .filter(|s| s.batch_id == batch_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_job_work_orders(&self, batch_id: Uuid) -> AppResult<Vec<JobWorkOrder>> {
        Ok(self.with(|t| {
            t.job_work_orders
                .iter()
                .filter(|o| o.batch_id == Some(batch_id))
                .cloned()
                .collect()
        }))
    }

    async fn list_all_job_work_orders(&self) -> AppResult<Vec<JobWorkOrder>> {
        Ok(self.with(|t| t.job_work_orders.clone()))
    }

    async fn list_expenses(&self, batch_id: Uuid) -> AppResult<Vec<ExpenseEntry>> {
        Ok(self.with(|t| {
            t.expenses
                .iter()
                .filter(|e| e.batch_id == batch_id)
                .cloned()
                .collect()
        }))
    }

    async fn get_cmt_quotation(&self, style_id: Uuid) -> AppResult<Option<CmtQuotation>> {
        Ok(self.with(|t| {
            t.quotations
                .iter()
                .filter(|q| q.style_id == style_id)
                .max_by_key(|q| (q.status == QuotationStatus::Approved, q.updated_at))
                .cloned()
        }))
    }

    async fn insert_cutting_log(&self, entry: &CuttingLogEntry) -> AppResult<()> {
        self.with(|t| t.cutting_logs.push(entry.clone()));
        Ok(())
    }

    async fn update_cutting_log(&self, entry: &CuttingLogEntry) -> AppResult<bool> {
        Ok(self.with(|t| {
            match t
                .cutting_logs
                .iter_mut()
                .find(|l| l.id == entry.id && l.batch_id == entry.batch_id)
            {
                Some(existing) => {
                    *existing = entry.clone();
                    true
                }
                None => false,
            }
        }))
    }

    async fn delete_cutting_log(&self, batch_id: Uuid, log_id: Uuid) -> AppResult<bool> {
        Ok(self.with(|t| {
            let before = t.cutting_logs.len();
            t.cutting_logs
                .retain(|l| !(l.id == log_id && l.batch_id == batch_id));
            t.cutting_logs.len() != before
        }))
    }

    async fn insert_cutting_wastage(&self, entry: &CuttingWastageEntry) -> AppResult<()> {
        self.with(|t| t.cutting_wastage.push(entry.clone()));
        Ok(())
    }

    async fn insert_salary_entry(&self, entry: &SalaryEntry) -> AppResult<()> {
        self.with(|t| t.salary_entries.push(entry.clone()));
        Ok(())
    }

    async fn record_salary_payment(
        &self,
        entry_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Option<SalaryEntry>> {
        Ok(self.with(|t| {
            t.salary_entries
                .iter_mut()
                .find(|s| s.id == entry_id)
                .map(|entry| {
                    entry.paid_amount += amount;
                    entry.clone()
                })
        }))
    }

    async fn get_job_work_order(&self, order_id: Uuid) -> AppResult<Option<JobWorkOrder>> {
        Ok(self.with(|t| t.job_work_orders.iter().find(|o| o.id == order_id).cloned()))
    }

    async fn save_job_work_order(&self, order: &JobWorkOrder) -> AppResult<()> {
        self.with(|t| {
            t.job_work_orders.retain(|o| o.id != order.id);
            t.job_work_orders.push(order.clone());
        });
        Ok(())
    }

    async fn record_job_work_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Option<JobWorkOrder>> {
        Ok(self.with(|t| {
            t.job_work_orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .map(|order| {
                    order.record_payment(amount);
                    order.clone()
                })
        }))
    }

    async fn update_job_work_terms(
        &self,
        order_id: Uuid,
        total_amount: Option<Decimal>,
        work_status: Option<WorkStatus>,
    ) -> AppResult<Option<JobWorkOrder>> {
        Ok(self.with(|t| {
            t.job_work_orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .map(|order| {
                    if let Some(total) = total_amount {
                        order.set_total_amount(total);
                    }
                    if let Some(status) = work_status {
                        order.work_status = status;
                    }
                    order.clone()
                })
        }))
    }

    async fn insert_expense(&self, entry: &ExpenseEntry) -> AppResult<()> {
        self.with(|t| t.expenses.push(entry.clone()));
        Ok(())
    }

    async fn get_quotation(&self, quotation_id: Uuid) -> AppResult<Option<CmtQuotation>> {
        Ok(self.with(|t| t.quotations.iter().find(|q| q.id == quotation_id).cloned()))
    }

    async fn save_quotation(&self, quotation: &CmtQuotation) -> AppResult<()> {
        self.with(|t| {
            t.quotations.retain(|q| q.id != quotation.id);
            t.quotations.push(quotation.clone());
        });
        Ok(())
    }

    async fn get_rate_card(&self, rate_card_id: Uuid) -> AppResult<Option<RateCard>> {
        Ok(self.with(|t| t.rate_cards.iter().find(|c| c.id == rate_card_id).cloned()))
    }

    async fn get_cost_summary(&self, batch_id: Uuid) -> AppResult<Option<CostSummary>> {
        Ok(self.with(|t| t.cost_summaries.get(&batch_id).cloned()))
    }

    async fn save_cost_summary(&self, summary: &CostSummary) -> AppResult<()> {
        self.with(|t| t.cost_summaries.insert(summary.batch_id, summary.clone()));
        Ok(())
    }

    async fn refresh_cost_summary_labour(
        &self,
        batch_id: Uuid,
        labour_cost: Decimal,
    ) -> AppResult<CostSummary> {
        Ok(self.with(|t| {
            let summary = match t.cost_summaries.get(&batch_id) {
                Some(stored) => stored.with_labour(labour_cost),
                None => CostSummary::compute(batch_id, &CostSummaryEdit::default(), &[])
                    .with_labour(labour_cost),
            };
            t.cost_summaries.insert(batch_id, summary.clone());
            summary
        }))
    }

    async fn save_batch_gst(&self, batch_id: Uuid, setting: GstSetting) -> AppResult<bool> {
        Ok(self.with(|t| match t.batches.iter_mut().find(|b| b.id == batch_id) {
            Some(batch) => {
                batch.gst_enabled = setting.enabled;
                batch.gst_percentage = setting.percentage;
                true
            }
            None => false,
        }))
    }
}
