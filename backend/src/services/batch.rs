//! Batch settings: GST toggle and percentage

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_gst_percentage, GstSetting};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::EventStore;

#[derive(Clone)]
pub struct BatchService {
    store: Arc<dyn EventStore>,
    default_gst_percentage: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGstInput {
    pub enabled: bool,
    /// Omitted when only the toggle changed
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct GstUpdate {
    pub batch_id: Uuid,
    pub setting: GstSetting,
}

impl BatchService {
    pub fn new(store: Arc<dyn EventStore>, default_gst_percentage: Decimal) -> Self {
        Self {
            store,
            default_gst_percentage,
        }
    }

    /// Save the batch GST setting
    ///
    /// A disabled setting is stored with a zero percent. Turning GST on
    /// without a percentage reuses the stored one, or the configured default
    /// when nothing was stored.
    pub async fn update_gst(&self, batch_id: Uuid, input: UpdateGstInput) -> AppResult<GstUpdate> {
        if let Some(percentage) = input.percentage {
            validate_gst_percentage(percentage).map_err(|m| AppError::invalid("percentage", m))?;
        }

        let batch = self
            .store
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| AppError::not_found("Batch"))?;

        let percentage = match input.percentage {
            Some(p) => p,
            None if batch.gst_percentage > Decimal::ZERO => batch.gst_percentage,
            None => self.default_gst_percentage,
        };
        let setting = GstSetting {
            enabled: input.enabled,
            percentage,
        }
        .persisted();

        if !self.store.save_batch_gst(batch_id, setting).await? {
            return Err(AppError::not_found("Batch"));
        }
        tracing::info!(
            batch_id = %batch_id,
            enabled = setting.enabled,
            percentage = %setting.percentage,
            "GST setting saved"
        );

        Ok(GstUpdate { batch_id, setting })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryEventStore;
    use chrono::{NaiveDate, Utc};
    use shared::{Batch, BatchStatus};

    fn store_with_batch(gst_enabled: bool, gst_percentage: Decimal) -> (Arc<MemoryEventStore>, Uuid) {
        let store = Arc::new(MemoryEventStore::new());
        let batch = Batch {
            id: Uuid::new_v4(),
            batch_number: "B-2025-004".to_string(),
            client_name: None,
            status: BatchStatus::Delivered,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            gst_enabled,
            gst_percentage,
            created_at: Utc::now(),
        };
        let id = batch.id;
        store.add_batch(batch, vec![]);
        (store, id)
    }

    #[tokio::test]
    async fn test_disabled_gst_persists_zero() {
        let (store, batch_id) = store_with_batch(true, Decimal::from(12));
        let service = BatchService::new(store.clone(), Decimal::from(5));

        let update = service
            .update_gst(
                batch_id,
                UpdateGstInput {
                    enabled: false,
                    percentage: Some(Decimal::from(12)),
                },
            )
            .await
            .unwrap();
        assert_eq!(update.setting, GstSetting::disabled());

        let batch = store.get_batch(batch_id).await.unwrap().unwrap();
        assert!(!batch.gst_enabled);
        assert_eq!(batch.gst_percentage, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_enable_without_percentage_uses_default() {
        let (store, batch_id) = store_with_batch(false, Decimal::ZERO);
        let service = BatchService::new(store, Decimal::from(5));

        let update = service
            .update_gst(
                batch_id,
                UpdateGstInput {
                    enabled: true,
                    percentage: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(update.setting, GstSetting::enabled(Decimal::from(5)));
    }

    #[tokio::test]
    async fn test_enable_without_percentage_keeps_stored() {
        let (store, batch_id) = store_with_batch(true, Decimal::from(18));
        let service = BatchService::new(store, Decimal::from(5));

        let update = service
            .update_gst(
                batch_id,
                UpdateGstInput {
                    enabled: true,
                    percentage: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(update.setting.percentage, Decimal::from(18));
    }

    #[tokio::test]
    async fn test_out_of_range_percentage_rejected() {
        let (store, batch_id) = store_with_batch(false, Decimal::ZERO);
        let service = BatchService::new(store, Decimal::from(5));

        let result = service
            .update_gst(
                batch_id,
                UpdateGstInput {
                    enabled: true,
                    percentage: Some(Decimal::from(140)),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
