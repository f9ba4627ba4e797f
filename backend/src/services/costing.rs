//! Costing service: loads batch events and runs the shared costing engine

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::{
    aggregate_cutting, analyze_rate_card, build_batch_report, build_company_analytics, build_job_order_report,
    build_outstanding_report, build_wastage_report, summarize_collections, BatchProfitability,
    BatchSnapshot, CollectionSummary, CompanyAnalytics, CostingPolicy, JobOrderReport,
    CuttingAggregate, OutstandingReport, RateCardAnalytics, WastageReport,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::EventStore;

/// Read side of the costing engine
///
/// Reports are recomputed from the store on every call; nothing derived is
/// cached here.
#[derive(Clone)]
pub struct CostingService {
    store: Arc<dyn EventStore>,
    policy: CostingPolicy,
}

impl CostingService {
    pub fn new(store: Arc<dyn EventStore>, policy: CostingPolicy) -> Self {
        Self { store, policy }
    }

    /// Load everything the reporter needs for one batch
    pub async fn load_snapshot(&self, batch_id: Uuid) -> AppResult<BatchSnapshot> {
        let batch = self
            .store
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| AppError::not_found("Batch"))?;

        let roll_types = self.store.get_roll_types(batch_id).await?;
        let mut quotations = BTreeMap::new();
        for style_id in roll_types.iter().filter_map(|r| r.style_id) {
            if quotations.contains_key(&style_id) {
                continue;
            }
            if let Some(quotation) = self.store.get_cmt_quotation(style_id).await? {
                quotations.insert(style_id, quotation);
            }
        }

        Ok(BatchSnapshot {
            batch,
            roll_types,
            cutting_logs: self.store.list_cutting_logs(batch_id).await?,
            cutting_wastage: self.store.list_cutting_wastage(batch_id).await?,
            salary_entries: self.store.list_salary_entries(batch_id).await?,
            job_work_orders: self.store.list_job_work_orders(batch_id).await?,
            expenses: self.store.list_expenses(batch_id).await?,
            quotations,
        })
    }

    /// Full profitability report of a batch
    pub async fn batch_report(&self, batch_id: Uuid) -> AppResult<BatchProfitability> {
        let snapshot = self.load_snapshot(batch_id).await?;
        let report = build_batch_report(&snapshot, &self.policy);
        warn_orphans(batch_id, &report.cutting);
        tracing::debug!(
            batch_id = %batch_id,
            styles = report.styles.len(),
            cut_pieces = report.totals.total_cut_pieces,
            "Built batch report"
        );

        Ok(report)
    }

    /// Cutting floor data only; labour, job work and pricing are not loaded
    pub async fn wastage_report(&self, batch_id: Uuid) -> AppResult<WastageReport> {
        if self.store.get_batch(batch_id).await?.is_none() {
            return Err(AppError::not_found("Batch"));
        }
        let roll_types = self.store.get_roll_types(batch_id).await?;
        let logs = self.store.list_cutting_logs(batch_id).await?;
        let wastage = self.store.list_cutting_wastage(batch_id).await?;

        let cutting = aggregate_cutting(&roll_types, &logs, &wastage);
        warn_orphans(batch_id, &cutting);
        Ok(build_wastage_report(&cutting))
    }

    pub async fn outstanding_report(&self, batch_id: Uuid) -> AppResult<OutstandingReport> {
        if self.store.get_batch(batch_id).await?.is_none() {
            return Err(AppError::not_found("Batch"));
        }
        let salaries = self.store.list_salary_entries(batch_id).await?;
        let orders = self.store.list_job_work_orders(batch_id).await?;
        let report = build_outstanding_report(&salaries, &orders);

        for order_id in &report.overpaid_orders {
            tracing::warn!(batch_id = %batch_id, order_id = %order_id, "Job work order is overpaid");
        }
        Ok(report)
    }

    pub async fn job_order_report(&self, order_id: Uuid) -> AppResult<JobOrderReport> {
        let order = self
            .store
            .get_job_work_order(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Job work order"))?;
        let report = build_job_order_report(&order);
        if !report.stored_balance_consistent {
            tracing::warn!(
                order_id = %order_id,
                stored = %order.balance_amount,
                derived = %report.balance_amount,
                "Stored job work balance drifted from total minus paid"
            );
        }
        Ok(report)
    }

    /// Billing and collection across every job-work order
    pub async fn collections(&self) -> AppResult<CollectionSummary> {
        let orders = self.store.list_all_job_work_orders().await?;
        Ok(summarize_collections(&orders))
    }

    /// Company-wide rollup of every batch report
    pub async fn company_analytics(&self) -> AppResult<CompanyAnalytics> {
        let batches = self.store.list_batches().await?;
        let mut reports = Vec::with_capacity(batches.len());
        for batch in batches {
            reports.push(self.batch_report(batch.id).await?);
        }
        Ok(build_company_analytics(&reports))
    }

    pub async fn rate_card_analytics(&self, rate_card_id: Uuid) -> AppResult<RateCardAnalytics> {
        let card = self
            .store
            .get_rate_card(rate_card_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rate card"))?;
        Ok(analyze_rate_card(&card))
    }
}

fn warn_orphans(batch_id: Uuid, cutting: &CuttingAggregate) {
    if cutting.has_orphans() {
        tracing::warn!(
            batch_id = %batch_id,
            orphaned_logs = cutting.orphaned_log_count,
            orphaned_pieces = cutting.orphaned_cut_pieces,
            orphaned_wastage = cutting.orphaned_wastage_count,
            "Cutting entries reference roll types that no longer exist"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryEventStore;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use shared::{
        Batch, BatchStatus, CmtQuotation, CuttingLogEntry, CuttingWastageEntry, ExpenseCategory,
        ExpenseEntry, JobWorkCostBasis, JobWorkOrder, JobWorkVariation, QuotationStatus,
        RateBreakdown, RollType,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
    }

    fn roll(index: u32, style_id: Option<Uuid>) -> RollType {
        RollType {
            index,
            color: "Black".to_string(),
            fabric_type: "Lycra".to_string(),
            gsm: Some(220),
            number_of_rolls: 10,
            weight_per_roll_kg: dec("18"),
            style_id,
            operations: vec![],
        }
    }

    fn quotation(style_id: Uuid, rate: &str, status: QuotationStatus) -> CmtQuotation {
        CmtQuotation {
            id: Uuid::new_v4(),
            style_id,
            style_number: "LEG-22".to_string(),
            client_name: None,
            status,
            quoted: RateBreakdown::default(),
            final_cmt_per_piece: Some(dec(rate)),
            approved_rates: None,
            updated_at: Utc::now(),
        }
    }

    /// One styled type with 100 cut pieces at ₹40, one expense of ₹1000 and
    /// a ₹2000 job-work order half paid
    async fn seeded() -> (Arc<MemoryEventStore>, Uuid, Uuid) {
        let store = Arc::new(MemoryEventStore::new());
        let style = Uuid::new_v4();
        let batch = Batch {
            id: Uuid::new_v4(),
            batch_number: "B-2024-101".to_string(),
            client_name: Some("Northwind Knits".to_string()),
            status: BatchStatus::Stitching,
            start_date: date(),
            gst_enabled: true,
            gst_percentage: dec("5"),
            created_at: Utc::now(),
        };
        let batch_id = batch.id;
        store.add_batch(batch, vec![roll(0, Some(style)), roll(1, None)]);
        store.add_quotation(quotation(style, "40", QuotationStatus::Sent));

        store
            .insert_cutting_log(&CuttingLogEntry {
                id: Uuid::new_v4(),
                batch_id,
                type_index: Some(0),
                log_date: date(),
                pieces_cut: 100,
                notes: None,
            })
            .await
            .unwrap();
        store
            .insert_expense(&ExpenseEntry {
                id: Uuid::new_v4(),
                batch_id,
                category: ExpenseCategory::Electricity,
                amount: dec("1000"),
                expense_date: date(),
                description: None,
            })
            .await
            .unwrap();
        store
            .save_job_work_order(&JobWorkOrder::new(
                Uuid::new_v4(),
                Some(batch_id),
                "JW-7",
                "Lotus Printers",
                vec![JobWorkVariation {
                    style_id: Some(style),
                    color: None,
                    quantity: 100,
                }],
                dec("2000"),
                dec("1000"),
                date(),
            ))
            .await
            .unwrap();

        (store, batch_id, style)
    }

    #[tokio::test]
    async fn test_batch_report_from_store() {
        let (store, batch_id, style) = seeded().await;
        let service = CostingService::new(store, CostingPolicy::default());

        let report = service.batch_report(batch_id).await.unwrap();
        assert_eq!(report.styles.len(), 1);
        let row = &report.styles[0];
        assert_eq!(row.style_id, style);
        assert_eq!(row.expected_revenue, dec("4000"));
        assert_eq!(row.total_cost, dec("3000"));
        assert_eq!(report.totals.total_actual_cost, dec("2000"));
        assert_eq!(report.billing.total_with_gst, dec("4200"));
    }

    #[tokio::test]
    async fn test_billed_policy_changes_actual_cost() {
        let (store, batch_id, _) = seeded().await;
        let policy = CostingPolicy {
            job_work_cost_basis: JobWorkCostBasis::Billed,
        };
        let service = CostingService::new(store, policy);
        let report = service.batch_report(batch_id).await.unwrap();
        assert_eq!(report.totals.total_actual_cost, dec("3000"));
        assert_eq!(report.totals.total_amount_paid, dec("2000"));
    }

    #[tokio::test]
    async fn test_approved_quotation_wins() {
        let (store, batch_id, style) = seeded().await;
        let mut draft = quotation(style, "45", QuotationStatus::Draft);
        draft.quoted.operations.push(shared::Operation {
            category: "Stitching".to_string(),
            machine_type: None,
            description: "Full garment".to_string(),
            smv: dec("6"),
            rate: dec("45"),
        });
        // older than the sent quotation, still preferred once approved
        let approved = draft.approve(Utc::now() - chrono::Duration::days(30));
        store.add_quotation(approved);

        let service = CostingService::new(store, CostingPolicy::default());
        let report = service.batch_report(batch_id).await.unwrap();
        assert_eq!(report.styles[0].cmt_rate, dec("45"));
        assert_eq!(report.styles[0].rate_source, shared::RateSource::Approved);
    }

    #[tokio::test]
    async fn test_wastage_report_from_cutting_data() {
        let (store, batch_id, style) = seeded().await;
        store
            .insert_cutting_wastage(&CuttingWastageEntry {
                id: Uuid::new_v4(),
                batch_id,
                type_index: Some(0),
                log_date: date(),
                wastage_pieces: 5,
                actual_weight_kg: None,
                notes: None,
            })
            .await
            .unwrap();
        let service = CostingService::new(store, CostingPolicy::default());

        let report = service.wastage_report(batch_id).await.unwrap();
        assert_eq!(report.total_wastage_pieces, 5);
        assert_eq!(report.wastage_percent_of_cut, dec("5"));
        assert_eq!(report.by_style.len(), 1);
        assert_eq!(report.by_style[0].style_id, Some(style));

        let err = service.wastage_report(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_batch_is_not_found() {
        let service = CostingService::new(Arc::new(MemoryEventStore::new()), CostingPolicy::default());
        let err = service.batch_report(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_outstanding_and_company_analytics() {
        let (store, batch_id, style) = seeded().await;
        let service = CostingService::new(store, CostingPolicy::default());

        let outstanding = service.outstanding_report(batch_id).await.unwrap();
        assert_eq!(outstanding.total_job_work_balance, dec("1000"));

        let analytics = service.company_analytics().await.unwrap();
        assert_eq!(analytics.batch_count, 1);
        assert_eq!(analytics.total_expected_revenue, dec("4000"));
        assert_eq!(analytics.styles[0].style_id, style);

        let collections = service.collections().await.unwrap();
        assert_eq!(collections.companies[0].company_name, "Lotus Printers");
        assert_eq!(collections.total_balance, dec("1000"));
    }
}
