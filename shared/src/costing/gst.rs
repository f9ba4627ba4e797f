//! GST calculator

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::apply_percent;

/// GST toggle plus the percentage last typed into the form
///
/// Toggling never clears `percentage`, so switching GST off and on again
/// restores the same total. What gets saved is [`GstSetting::persisted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstSetting {
    pub enabled: bool,
    pub percentage: Decimal,
}

impl GstSetting {
    pub fn enabled(percentage: Decimal) -> Self {
        Self {
            enabled: true,
            percentage,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            percentage: Decimal::ZERO,
        }
    }

    /// The only percent any calculation sees
    pub fn effective_percent(&self) -> Decimal {
        if self.enabled {
            self.percentage
        } else {
            Decimal::ZERO
        }
    }

    pub fn toggled(&self) -> Self {
        Self {
            enabled: !self.enabled,
            percentage: self.percentage,
        }
    }

    /// Value to store: a disabled setting is written with a zero percent so
    /// that every reader of the batch sees "no GST"
    pub fn persisted(&self) -> Self {
        Self {
            enabled: self.enabled,
            percentage: self.effective_percent(),
        }
    }
}

/// GST applied to a base amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstBreakdown {
    pub base_amount: Decimal,
    pub gst_percent: Decimal,
    pub gst_amount: Decimal,
    pub total_with_gst: Decimal,
}

/// `gst = base × percent / 100` when enabled, else zero; total = base + gst
pub fn calculate_gst(base_amount: Decimal, setting: &GstSetting) -> GstBreakdown {
    let gst_percent = setting.effective_percent();
    let gst_amount = apply_percent(base_amount, gst_percent);
    GstBreakdown {
        base_amount,
        gst_percent,
        gst_amount,
        total_with_gst: base_amount + gst_amount,
    }
}
