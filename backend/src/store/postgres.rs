//! PostgreSQL event store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use shared::{
    ApprovedRates, Batch, CmtQuotation, CostSummary, CuttingLogEntry, CuttingWastageEntry,
    ExpenseEntry, GstSetting, JobWorkOrder, JobWorkVariation, RateBreakdown, RateCard, RollType,
    SalaryEntry, WorkStatus,
};

use super::EventStore;
use crate::error::{AppError, AppResult};

/// Event store backed by a sqlx connection pool
#[derive(Clone)]
pub struct PgEventStore {
    db: PgPool,
}

impl PgEventStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Counts are stored as INTEGER with CHECK constraints; a negative value
/// means the row was written around the constraints
fn count(value: i32, column: &str) -> AppResult<u32> {
    u32::try_from(value).map_err(|_| AppError::Internal(format!("negative {} in store", column)))
}

fn opt_count(value: Option<i32>, column: &str) -> AppResult<Option<u32>> {
    value.map(|v| count(v, column)).transpose()
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    batch_number: String,
    client_name: Option<String>,
    status: String,
    start_date: NaiveDate,
    gst_enabled: bool,
    gst_percentage: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<BatchRow> for Batch {
    type Error = AppError;

    fn try_from(row: BatchRow) -> AppResult<Self> {
        Ok(Batch {
            id: row.id,
            batch_number: row.batch_number,
            client_name: row.client_name,
            status: row.status.parse()?,
            start_date: row.start_date,
            gst_enabled: row.gst_enabled,
            gst_percentage: row.gst_percentage,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RollTypeRow {
    type_index: i32,
    color: String,
    fabric_type: String,
    gsm: Option<i32>,
    number_of_rolls: i32,
    weight_per_roll_kg: Decimal,
    style_id: Option<Uuid>,
    operations: Json<Vec<String>>,
}

impl TryFrom<RollTypeRow> for RollType {
    type Error = AppError;

    fn try_from(row: RollTypeRow) -> AppResult<Self> {
        Ok(RollType {
            index: count(row.type_index, "type_index")?,
            color: row.color,
            fabric_type: row.fabric_type,
            gsm: opt_count(row.gsm, "gsm")?,
            number_of_rolls: count(row.number_of_rolls, "number_of_rolls")?,
            weight_per_roll_kg: row.weight_per_roll_kg,
            style_id: row.style_id,
            operations: row.operations.0,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CuttingLogRow {
    id: Uuid,
    batch_id: Uuid,
    type_index: Option<i32>,
    log_date: NaiveDate,
    pieces_cut: i32,
    notes: Option<String>,
}

impl TryFrom<CuttingLogRow> for CuttingLogEntry {
    type Error = AppError;

    fn try_from(row: CuttingLogRow) -> AppResult<Self> {
        Ok(CuttingLogEntry {
            id: row.id,
            batch_id: row.batch_id,
            // a negative index can never resolve, so it reads as unassigned
            type_index: row.type_index.and_then(|i| u32::try_from(i).ok()),
            log_date: row.log_date,
            pieces_cut: count(row.pieces_cut, "pieces_cut")?,
            notes: row.notes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CuttingWastageRow {
    id: Uuid,
    batch_id: Uuid,
    type_index: Option<i32>,
    log_date: NaiveDate,
    wastage_pieces: i32,
    actual_weight_kg: Option<Decimal>,
    notes: Option<String>,
}

impl TryFrom<CuttingWastageRow> for CuttingWastageEntry {
    type Error = AppError;

    fn try_from(row: CuttingWastageRow) -> AppResult<Self> {
        Ok(CuttingWastageEntry {
            id: row.id,
            batch_id: row.batch_id,
            type_index: row.type_index.and_then(|i| u32::try_from(i).ok()),
            log_date: row.log_date,
            wastage_pieces: count(row.wastage_pieces, "wastage_pieces")?,
            actual_weight_kg: row.actual_weight_kg,
            notes: row.notes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SalaryRow {
    id: Uuid,
    batch_id: Uuid,
    style_id: Option<Uuid>,
    worker_name: String,
    operation: Option<String>,
    rate_per_piece: Decimal,
    quantity: i32,
    paid_amount: Decimal,
    entry_date: NaiveDate,
}

impl TryFrom<SalaryRow> for SalaryEntry {
    type Error = AppError;

    fn try_from(row: SalaryRow) -> AppResult<Self> {
        Ok(SalaryEntry {
            id: row.id,
            batch_id: row.batch_id,
            style_id: row.style_id,
            worker_name: row.worker_name,
            operation: row.operation,
            rate_per_piece: row.rate_per_piece,
            quantity: count(row.quantity, "quantity")?,
            paid_amount: row.paid_amount,
            entry_date: row.entry_date,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobWorkRow {
    id: Uuid,
    batch_id: Option<Uuid>,
    order_number: String,
    company_name: String,
    variations: Json<Vec<JobWorkVariation>>,
    total_amount: Decimal,
    paid_amount: Decimal,
    balance_amount: Decimal,
    work_status: String,
    payment_status: String,
    order_date: NaiveDate,
}

impl TryFrom<JobWorkRow> for JobWorkOrder {
    type Error = AppError;

    fn try_from(row: JobWorkRow) -> AppResult<Self> {
        Ok(JobWorkOrder {
            id: row.id,
            batch_id: row.batch_id,
            order_number: row.order_number,
            company_name: row.company_name,
            variations: row.variations.0,
            total_amount: row.total_amount,
            paid_amount: row.paid_amount,
            balance_amount: row.balance_amount,
            work_status: row.work_status.parse()?,
            payment_status: row.payment_status.parse()?,
            order_date: row.order_date,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    batch_id: Uuid,
    category: String,
    amount: Decimal,
    expense_date: NaiveDate,
    description: Option<String>,
}

impl TryFrom<ExpenseRow> for ExpenseEntry {
    type Error = AppError;

    fn try_from(row: ExpenseRow) -> AppResult<Self> {
        Ok(ExpenseEntry {
            id: row.id,
            batch_id: row.batch_id,
            category: row.category.parse()?,
            amount: row.amount,
            expense_date: row.expense_date,
            description: row.description,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: Uuid,
    style_id: Uuid,
    style_number: String,
    client_name: Option<String>,
    status: String,
    quoted: Json<RateBreakdown>,
    final_cmt_per_piece: Option<Decimal>,
    approved_rates: Option<Json<ApprovedRates>>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuotationRow> for CmtQuotation {
    type Error = AppError;

    fn try_from(row: QuotationRow) -> AppResult<Self> {
        Ok(CmtQuotation {
            id: row.id,
            style_id: row.style_id,
            style_number: row.style_number,
            client_name: row.client_name,
            status: row.status.parse()?,
            quoted: row.quoted.0,
            final_cmt_per_piece: row.final_cmt_per_piece,
            approved_rates: row.approved_rates.map(|r| r.0),
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RateCardRow {
    id: Uuid,
    name: String,
    category: String,
    rates: Json<RateBreakdown>,
}

impl From<RateCardRow> for RateCard {
    fn from(row: RateCardRow) -> Self {
        RateCard {
            id: row.id,
            name: row.name,
            category: row.category,
            rates: row.rates.0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CostSummaryRow {
    batch_id: Uuid,
    material_cost: Decimal,
    labour_cost: Decimal,
    transport_cost: Decimal,
    misc_cost: Decimal,
    total_cost: Decimal,
}

impl From<CostSummaryRow> for CostSummary {
    fn from(row: CostSummaryRow) -> Self {
        CostSummary {
            batch_id: row.batch_id,
            material_cost: row.material_cost,
            labour_cost: row.labour_cost,
            transport_cost: row.transport_cost,
            misc_cost: row.misc_cost,
            total_cost: row.total_cost,
        }
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

const BATCH_COLUMNS: &str =
    "id, batch_number, client_name, status, start_date, gst_enabled, gst_percentage, created_at";
const SALARY_COLUMNS: &str = "id, batch_id, style_id, worker_name, operation, rate_per_piece, \
     quantity, paid_amount, entry_date";
const JOB_WORK_COLUMNS: &str = "id, batch_id, order_number, company_name, variations, \
     total_amount, paid_amount, balance_amount, work_status, payment_status, order_date";
const COST_SUMMARY_COLUMNS: &str =
    "batch_id, material_cost, labour_cost, transport_cost, misc_cost, total_cost";
const QUOTATION_COLUMNS: &str = "id, style_id, style_number, client_name, status, quoted, \
     final_cmt_per_piece, approved_rates, updated_at";

/// Payment status derived in SQL from the new total and paid expressions,
/// checked in the same order as `PaymentStatus::derive`
fn payment_status_sql(total: &str, paid: &str) -> String {
    format!(
        "CASE WHEN {paid} > {total} THEN 'overpaid' \
         WHEN {paid} = {total} THEN 'paid' \
         WHEN {paid} <= 0 THEN 'unpaid' \
         ELSE 'partial' END"
    )
}

// ============================================================================
// EventStore implementation
// ============================================================================

#[async_trait]
impl EventStore for PgEventStore {
    async fn get_batch(&self, batch_id: Uuid) -> AppResult<Option<Batch>> {
        let row = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {} FROM batches WHERE id = $1",
            BATCH_COLUMNS
        ))
        .bind(batch_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Batch::try_from).transpose()
    }

    async fn list_batches(&self) -> AppResult<Vec<Batch>> {
        let rows = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {} FROM batches ORDER BY start_date DESC, batch_number",
            BATCH_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn get_roll_types(&self, batch_id: Uuid) -> AppResult<Vec<RollType>> {
        let rows = sqlx::query_as::<_, RollTypeRow>(
            r#"
            SELECT type_index, color, fabric_type, gsm, number_of_rolls, weight_per_roll_kg,
                   style_id, operations
            FROM roll_types
            WHERE batch_id = $1
            ORDER BY type_index
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn list_cutting_logs(&self, batch_id: Uuid) -> AppResult<Vec<CuttingLogEntry>> {
        let rows = sqlx::query_as::<_, CuttingLogRow>(
            r#"
            SELECT id, batch_id, type_index, log_date, pieces_cut, notes
            FROM cutting_logs
            WHERE batch_id = $1
            ORDER BY log_date, created_at
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn list_cutting_wastage(&self, batch_id: Uuid) -> AppResult<Vec<CuttingWastageEntry>> {
        let rows = sqlx::query_as::<_, CuttingWastageRow>(
            r#"
            SELECT id, batch_id, type_index, log_date, wastage_pieces, actual_weight_kg, notes
            FROM cutting_wastage
            WHERE batch_id = $1
            ORDER BY log_date, created_at
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn list_salary_entries(&self, batch_id: Uuid) -> AppResult<Vec<SalaryEntry>> {
        let rows = sqlx::query_as::<_, SalaryRow>(&format!(
            "SELECT {} FROM salary_entries WHERE batch_id = $1 ORDER BY entry_date",
            SALARY_COLUMNS
        ))
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn list_job_work_orders(&self, batch_id: Uuid) -> AppResult<Vec<JobWorkOrder>> {
        let rows = sqlx::query_as::<_, JobWorkRow>(&format!(
            "SELECT {} FROM job_work_orders WHERE batch_id = $1 ORDER BY order_date",
            JOB_WORK_COLUMNS
        ))
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn list_all_job_work_orders(&self) -> AppResult<Vec<JobWorkOrder>> {
        let rows = sqlx::query_as::<_, JobWorkRow>(&format!(
            "SELECT {} FROM job_work_orders ORDER BY order_date",
            JOB_WORK_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn list_expenses(&self, batch_id: Uuid) -> AppResult<Vec<ExpenseEntry>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, batch_id, category, amount, expense_date, description
            FROM expenses
            WHERE batch_id = $1
            ORDER BY expense_date
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;
        convert_all(rows)
    }

    async fn get_cmt_quotation(&self, style_id: Uuid) -> AppResult<Option<CmtQuotation>> {
        let row = sqlx::query_as::<_, QuotationRow>(&format!(
            r#"
            SELECT {}
            FROM cmt_quotations
            WHERE style_id = $1
            ORDER BY (status = 'approved') DESC, updated_at DESC
            LIMIT 1
            "#,
            QUOTATION_COLUMNS
        ))
        .bind(style_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(CmtQuotation::try_from).transpose()
    }

    async fn insert_cutting_log(&self, entry: &CuttingLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cutting_logs (id, batch_id, type_index, log_date, pieces_cut, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(entry.batch_id)
        .bind(entry.type_index.map(|i| i as i32))
        .bind(entry.log_date)
        .bind(entry.pieces_cut as i32)
        .bind(&entry.notes)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_cutting_log(&self, entry: &CuttingLogEntry) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cutting_logs
            SET type_index = $3, log_date = $4, pieces_cut = $5, notes = $6
            WHERE id = $1 AND batch_id = $2
            "#,
        )
        .bind(entry.id)
        .bind(entry.batch_id)
        .bind(entry.type_index.map(|i| i as i32))
        .bind(entry.log_date)
        .bind(entry.pieces_cut as i32)
        .bind(&entry.notes)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_cutting_log(&self, batch_id: Uuid, log_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cutting_logs WHERE id = $1 AND batch_id = $2")
            .bind(log_id)
            .bind(batch_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_cutting_wastage(&self, entry: &CuttingWastageEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cutting_wastage
                (id, batch_id, type_index, log_date, wastage_pieces, actual_weight_kg, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.batch_id)
        .bind(entry.type_index.map(|i| i as i32))
        .bind(entry.log_date)
        .bind(entry.wastage_pieces as i32)
        .bind(entry.actual_weight_kg)
        .bind(&entry.notes)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn insert_salary_entry(&self, entry: &SalaryEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO salary_entries
                (id, batch_id, style_id, worker_name, operation, rate_per_piece, quantity,
                 paid_amount, entry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(entry.batch_id)
        .bind(entry.style_id)
        .bind(&entry.worker_name)
        .bind(&entry.operation)
        .bind(entry.rate_per_piece)
        .bind(entry.quantity as i32)
        .bind(entry.paid_amount)
        .bind(entry.entry_date)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn record_salary_payment(
        &self,
        entry_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Option<SalaryEntry>> {
        let row = sqlx::query_as::<_, SalaryRow>(&format!(
            "UPDATE salary_entries SET paid_amount = paid_amount + $2 WHERE id = $1 RETURNING {}",
            SALARY_COLUMNS
        ))
        .bind(entry_id)
        .bind(amount)
        .fetch_optional(&self.db)
        .await?;
        row.map(SalaryEntry::try_from).transpose()
    }

    async fn get_job_work_order(&self, order_id: Uuid) -> AppResult<Option<JobWorkOrder>> {
        let row = sqlx::query_as::<_, JobWorkRow>(&format!(
            "SELECT {} FROM job_work_orders WHERE id = $1",
            JOB_WORK_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(JobWorkOrder::try_from).transpose()
    }

    async fn save_job_work_order(&self, order: &JobWorkOrder) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO job_work_orders
                (id, batch_id, order_number, company_name, variations, total_amount,
                 paid_amount, balance_amount, work_status, payment_status, order_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                batch_id = EXCLUDED.batch_id,
                order_number = EXCLUDED.order_number,
                company_name = EXCLUDED.company_name,
                variations = EXCLUDED.variations,
                total_amount = EXCLUDED.total_amount,
                paid_amount = EXCLUDED.paid_amount,
                balance_amount = EXCLUDED.balance_amount,
                work_status = EXCLUDED.work_status,
                payment_status = EXCLUDED.payment_status,
                order_date = EXCLUDED.order_date
            "#,
        )
        .bind(order.id)
        .bind(order.batch_id)
        .bind(&order.order_number)
        .bind(&order.company_name)
        .bind(Json(&order.variations))
        .bind(order.total_amount)
        .bind(order.paid_amount)
        .bind(order.balance_amount)
        .bind(order.work_status.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.order_date)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn record_job_work_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Option<JobWorkOrder>> {
        let row = sqlx::query_as::<_, JobWorkRow>(&format!(
            "UPDATE job_work_orders SET paid_amount = paid_amount + $2, \
             balance_amount = total_amount - (paid_amount + $2), payment_status = {} \
             WHERE id = $1 RETURNING {}",
            payment_status_sql("total_amount", "(paid_amount + $2)"),
            JOB_WORK_COLUMNS
        ))
        .bind(order_id)
        .bind(amount)
        .fetch_optional(&self.db)
        .await?;
        row.map(JobWorkOrder::try_from).transpose()
    }

    async fn update_job_work_terms(
        &self,
        order_id: Uuid,
        total_amount: Option<Decimal>,
        work_status: Option<WorkStatus>,
    ) -> AppResult<Option<JobWorkOrder>> {
        let row = sqlx::query_as::<_, JobWorkRow>(&format!(
            "UPDATE job_work_orders SET total_amount = COALESCE($2, total_amount), \
             balance_amount = COALESCE($2, total_amount) - paid_amount, \
             work_status = COALESCE($3, work_status), payment_status = {} \
             WHERE id = $1 RETURNING {}",
            payment_status_sql("COALESCE($2, total_amount)", "paid_amount"),
            JOB_WORK_COLUMNS
        ))
        .bind(order_id)
        .bind(total_amount)
        .bind(work_status.map(|s| s.as_str()))
        .fetch_optional(&self.db)
        .await?;
        row.map(JobWorkOrder::try_from).transpose()
    }

    async fn insert_expense(&self, entry: &ExpenseEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, batch_id, category, amount, expense_date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(entry.batch_id)
        .bind(entry.category.as_str())
        .bind(entry.amount)
        .bind(entry.expense_date)
        .bind(&entry.description)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn get_quotation(&self, quotation_id: Uuid) -> AppResult<Option<CmtQuotation>> {
        let row = sqlx::query_as::<_, QuotationRow>(&format!(
            "SELECT {} FROM cmt_quotations WHERE id = $1",
            QUOTATION_COLUMNS
        ))
        .bind(quotation_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(CmtQuotation::try_from).transpose()
    }

    async fn save_quotation(&self, quotation: &CmtQuotation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cmt_quotations
                (id, style_id, style_number, client_name, status, quoted,
                 final_cmt_per_piece, approved_rates, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                style_number = EXCLUDED.style_number,
                client_name = EXCLUDED.client_name,
                status = EXCLUDED.status,
                quoted = EXCLUDED.quoted,
                final_cmt_per_piece = EXCLUDED.final_cmt_per_piece,
                approved_rates = EXCLUDED.approved_rates,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(quotation.id)
        .bind(quotation.style_id)
        .bind(&quotation.style_number)
        .bind(&quotation.client_name)
        .bind(quotation.status.as_str())
        .bind(Json(&quotation.quoted))
        .bind(quotation.final_cmt_per_piece)
        .bind(quotation.approved_rates.as_ref().map(Json))
        .bind(quotation.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn get_rate_card(&self, rate_card_id: Uuid) -> AppResult<Option<RateCard>> {
        let row = sqlx::query_as::<_, RateCardRow>(
            "SELECT id, name, category, rates FROM rate_cards WHERE id = $1",
        )
        .bind(rate_card_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(RateCard::from))
    }

    async fn get_cost_summary(&self, batch_id: Uuid) -> AppResult<Option<CostSummary>> {
        let row = sqlx::query_as::<_, CostSummaryRow>(&format!(
            "SELECT {} FROM cost_summaries WHERE batch_id = $1",
            COST_SUMMARY_COLUMNS
        ))
        .bind(batch_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(CostSummary::from))
    }

    async fn save_cost_summary(&self, summary: &CostSummary) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cost_summaries
                (batch_id, material_cost, labour_cost, transport_cost, misc_cost, total_cost)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (batch_id) DO UPDATE SET
                material_cost = EXCLUDED.material_cost,
                labour_cost = EXCLUDED.labour_cost,
                transport_cost = EXCLUDED.transport_cost,
                misc_cost = EXCLUDED.misc_cost,
                total_cost = EXCLUDED.total_cost,
                updated_at = NOW()
            "#,
        )
        .bind(summary.batch_id)
        .bind(summary.material_cost)
        .bind(summary.labour_cost)
        .bind(summary.transport_cost)
        .bind(summary.misc_cost)
        .bind(summary.total_cost)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn refresh_cost_summary_labour(
        &self,
        batch_id: Uuid,
        labour_cost: Decimal,
    ) -> AppResult<CostSummary> {
        let row = sqlx::query_as::<_, CostSummaryRow>(&format!(
            "INSERT INTO cost_summaries \
                 (batch_id, material_cost, labour_cost, transport_cost, misc_cost, total_cost) \
             VALUES ($1, 0, $2, 0, 0, $2) \
             ON CONFLICT (batch_id) DO UPDATE SET \
                 labour_cost = EXCLUDED.labour_cost, \
                 total_cost = cost_summaries.material_cost + cost_summaries.transport_cost \
                     + cost_summaries.misc_cost + EXCLUDED.labour_cost, \
                 updated_at = NOW() \
             RETURNING {}",
            COST_SUMMARY_COLUMNS
        ))
        .bind(batch_id)
        .bind(labour_cost)
        .fetch_one(&self.db)
        .await?;
        Ok(CostSummary::from(row))
    }

    async fn save_batch_gst(&self, batch_id: Uuid, setting: GstSetting) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE batches SET gst_enabled = $2, gst_percentage = $3 WHERE id = $1")
                .bind(batch_id)
                .bind(setting.enabled)
                .bind(setting.percentage)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
