//! CMT quotation editing and approval

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use shared::{validate_profit_percent, CmtQuotation, ProfitEdit, QuotationStatus};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::EventStore;

#[derive(Clone)]
pub struct QuotationService {
    store: Arc<dyn EventStore>,
}

/// Which set of numbers a profit edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTarget {
    Quoted,
    Approved,
}

#[derive(Debug, Deserialize)]
pub struct ProfitEditInput {
    #[serde(default = "default_target")]
    pub target: RateTarget,
    pub edit: ProfitEdit,
}

fn default_target() -> RateTarget {
    RateTarget::Quoted
}

impl QuotationService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, quotation_id: Uuid) -> AppResult<CmtQuotation> {
        self.store
            .get_quotation(quotation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Quotation"))
    }

    /// Edit the company profit as a percent or in rupees
    ///
    /// The edited side is kept and the other recomputed from the current
    /// base, so the pair always agrees when saved.
    pub async fn edit_profit(
        &self,
        quotation_id: Uuid,
        input: ProfitEditInput,
    ) -> AppResult<CmtQuotation> {
        if let ProfitEdit::Percent(percent) = input.edit {
            validate_profit_percent(percent)
                .map_err(|m| AppError::invalid("company_profit_percent", m))?;
        }

        let current = self.get(quotation_id).await?;
        let mut updated = match input.target {
            RateTarget::Quoted => current.with_quoted_profit_edit(input.edit),
            RateTarget::Approved => {
                if current.approved_rates.is_none() {
                    return Err(AppError::Conflict {
                        resource: "Quotation".to_string(),
                        message: "Quotation has no approved rates to edit".to_string(),
                    });
                }
                current.with_approved_profit_edit(input.edit)
            }
        };
        updated.updated_at = Utc::now();

        self.store.save_quotation(&updated).await?;
        tracing::info!(
            quotation_id = %quotation_id,
            target = ?input.target,
            "Company profit updated"
        );
        Ok(updated)
    }

    /// Lock the quoted numbers in as approved rates
    pub async fn approve(&self, quotation_id: Uuid) -> AppResult<CmtQuotation> {
        let current = self.get(quotation_id).await?;
        if current.status == QuotationStatus::Approved {
            return Err(AppError::Conflict {
                resource: "Quotation".to_string(),
                message: "Quotation is already approved".to_string(),
            });
        }

        let approved = current.approve(Utc::now());
        self.store.save_quotation(&approved).await?;
        tracing::info!(
            quotation_id = %quotation_id,
            style_id = %approved.style_id,
            final_rate = ?approved.final_cmt_per_piece,
            "Quotation approved"
        );
        Ok(approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryEventStore;
    use rust_decimal::Decimal;
    use shared::{Operation, RateBreakdown};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Base of ₹50: operations 40, finishing 6, overheads 4
    fn quotation() -> CmtQuotation {
        CmtQuotation {
            id: Uuid::new_v4(),
            style_id: Uuid::new_v4(),
            style_number: "POLO-9".to_string(),
            client_name: Some("Harbour Apparel".to_string()),
            status: QuotationStatus::Draft,
            quoted: RateBreakdown {
                operations: vec![Operation {
                    category: "Stitching".to_string(),
                    machine_type: Some("Single Needle".to_string()),
                    description: "Placket".to_string(),
                    smv: dec("8.5"),
                    rate: dec("40"),
                }],
                finishing_packing_cost: dec("6"),
                overheads_cost: dec("4"),
                company_profit_percent: Decimal::ZERO,
                company_profit_rupees: Decimal::ZERO,
            },
            final_cmt_per_piece: None,
            approved_rates: None,
            updated_at: Utc::now(),
        }
    }

    fn service_with(quotation: CmtQuotation) -> QuotationService {
        let store = Arc::new(MemoryEventStore::new());
        store.add_quotation(quotation);
        QuotationService::new(store)
    }

    #[tokio::test]
    async fn test_percent_edit_derives_rupees() {
        let q = quotation();
        let id = q.id;
        let service = service_with(q);

        let updated = service
            .edit_profit(
                id,
                ProfitEditInput {
                    target: RateTarget::Quoted,
                    edit: ProfitEdit::Percent(dec("20")),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quoted.company_profit_rupees, dec("10"));
        assert_eq!(updated.final_cmt_per_piece, Some(dec("60")));

        let stored = service.get(id).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_rupee_edit_derives_percent() {
        let q = quotation();
        let id = q.id;
        let service = service_with(q);

        let updated = service
            .edit_profit(
                id,
                ProfitEditInput {
                    target: RateTarget::Quoted,
                    edit: ProfitEdit::Rupees(dec("12.50")),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quoted.company_profit_percent, dec("25"));
        assert_eq!(updated.final_cmt_per_piece, Some(dec("62.50")));
    }

    #[tokio::test]
    async fn test_approved_edit_requires_approval() {
        let q = quotation();
        let id = q.id;
        let service = service_with(q);

        let result = service
            .edit_profit(
                id,
                ProfitEditInput {
                    target: RateTarget::Approved,
                    edit: ProfitEdit::Percent(dec("10")),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));

        service.approve(id).await.unwrap();
        let updated = service
            .edit_profit(
                id,
                ProfitEditInput {
                    target: RateTarget::Approved,
                    edit: ProfitEdit::Percent(dec("10")),
                },
            )
            .await
            .unwrap();
        let approved = updated.approved_rates.unwrap();
        assert_eq!(approved.final_cmt_per_piece, dec("55"));
    }

    #[tokio::test]
    async fn test_double_approval_conflicts() {
        let q = quotation();
        let id = q.id;
        let service = service_with(q);

        let approved = service.approve(id).await.unwrap();
        assert_eq!(approved.status, QuotationStatus::Approved);
        assert_eq!(approved.final_cmt_per_piece, Some(dec("50")));
        assert!(matches!(service.approve(id).await, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_absurd_percent_rejected() {
        let q = quotation();
        let id = q.id;
        let service = service_with(q);
        let result = service
            .edit_profit(
                id,
                ProfitEditInput {
                    target: RateTarget::Quoted,
                    edit: ProfitEdit::Percent(dec("5000")),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
