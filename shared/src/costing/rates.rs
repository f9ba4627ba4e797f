//! Rate resolver: per-piece CMT revenue and the company profit pair

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ApprovedRates, CmtQuotation, QuotationStatus, RateBreakdown, RateCard};
use crate::types::{apply_percent, percent_of};

/// One side of the profit pair, as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ProfitEdit {
    Percent(Decimal),
    Rupees(Decimal),
}

/// Company profit expressed both ways over the same base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitPair {
    pub percent: Decimal,
    pub rupees: Decimal,
}

impl ProfitPair {
    /// Treat the edited side as authoritative and derive the other
    ///
    /// A zero base has no percent to carry rupees, so both sides are zero.
    pub fn from_edit(base: Decimal, edit: ProfitEdit) -> Self {
        match edit {
            ProfitEdit::Percent(percent) => Self {
                percent,
                rupees: apply_percent(base, percent),
            },
            ProfitEdit::Rupees(_) if base.is_zero() => Self {
                percent: Decimal::ZERO,
                rupees: Decimal::ZERO,
            },
            ProfitEdit::Rupees(rupees) => Self {
                percent: percent_of(rupees, base),
                rupees,
            },
        }
    }
}

impl RateBreakdown {
    pub fn operations_total(&self) -> Decimal {
        self.operations.iter().map(|op| op.rate).sum()
    }

    pub fn total_smv(&self) -> Decimal {
        self.operations.iter().map(|op| op.smv).sum()
    }

    /// `Σ operation rates + finishing/packing + overheads`
    pub fn base(&self) -> Decimal {
        self.operations_total() + self.finishing_packing_cost + self.overheads_cost
    }

    pub fn profit(&self) -> ProfitPair {
        ProfitPair {
            percent: self.company_profit_percent,
            rupees: self.company_profit_rupees,
        }
    }

    /// `base × (1 + percent / 100)`, i.e. base plus the rupee side of the pair
    pub fn final_rate(&self) -> Decimal {
        self.base() + self.company_profit_rupees
    }

    /// New breakdown with the profit pair recomputed from `edit`
    pub fn with_profit_edit(&self, edit: ProfitEdit) -> Self {
        let pair = ProfitPair::from_edit(self.base(), edit);
        Self {
            company_profit_percent: pair.percent,
            company_profit_rupees: pair.rupees,
            ..self.clone()
        }
    }

    pub fn with_profit_percent(&self, percent: Decimal) -> Self {
        self.with_profit_edit(ProfitEdit::Percent(percent))
    }

    pub fn with_profit_rupees(&self, rupees: Decimal) -> Self {
        self.with_profit_edit(ProfitEdit::Rupees(rupees))
    }

    /// Rupees recomputed from percent
    ///
    /// Used whenever the base changes (operations, finishing or overheads
    /// edited): the negotiated margin stays fixed as a percentage.
    pub fn normalized(&self) -> Self {
        self.with_profit_percent(self.company_profit_percent)
    }

    /// Whether `rupees = base × percent / 100` holds, to within rounding
    pub fn is_consistent(&self) -> bool {
        let expected = apply_percent(self.base(), self.company_profit_percent);
        (expected - self.company_profit_rupees).abs() <= Decimal::new(1, 10)
    }
}

impl RateCard {
    /// The card's breakdown with a consistent profit pair
    pub fn breakdown(&self) -> RateBreakdown {
        self.rates.normalized()
    }
}

/// Where a style's CMT rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Approved,
    Quoted,
    /// No usable quotation: no revenue is attributed
    Unpriced,
}

/// Revenue per piece for a style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CmtRate {
    pub rate: Decimal,
    pub source: RateSource,
}

impl CmtRate {
    pub const UNPRICED: CmtRate = CmtRate {
        rate: Decimal::ZERO,
        source: RateSource::Unpriced,
    };

    pub fn expected_revenue(&self, cut_pieces: u64) -> Decimal {
        self.rate * Decimal::from(cut_pieces)
    }
}

/// Resolve the revenue rate for a style from its quotation
///
/// Approved quotations use the locked-in approved rate. Anything else falls
/// back to the saved quoted rate, and a quotation that was never priced
/// yields zero rather than a guess.
pub fn resolve_cmt_rate(quotation: Option<&CmtQuotation>) -> CmtRate {
    let Some(quotation) = quotation else {
        return CmtRate::UNPRICED;
    };

    if quotation.status == QuotationStatus::Approved {
        if let Some(approved) = &quotation.approved_rates {
            return CmtRate {
                rate: approved.final_cmt_per_piece,
                source: RateSource::Approved,
            };
        }
    }

    match quotation.final_cmt_per_piece {
        Some(rate) => CmtRate {
            rate,
            source: RateSource::Quoted,
        },
        None => CmtRate::UNPRICED,
    }
}

impl CmtQuotation {
    /// Apply a profit edit to the quoted draft and refresh the saved final rate
    pub fn with_quoted_profit_edit(&self, edit: ProfitEdit) -> Self {
        let quoted = self.quoted.with_profit_edit(edit);
        Self {
            final_cmt_per_piece: Some(quoted.final_rate()),
            quoted,
            ..self.clone()
        }
    }

    /// Apply a profit edit to the approved numbers, if any
    pub fn with_approved_profit_edit(&self, edit: ProfitEdit) -> Self {
        let approved_rates = self.approved_rates.as_ref().map(|approved| {
            let rates = approved.rates.with_profit_edit(edit);
            ApprovedRates {
                final_cmt_per_piece: rates.final_rate(),
                rates,
                approved_at: approved.approved_at,
            }
        });
        Self {
            approved_rates,
            ..self.clone()
        }
    }

    /// Lock the quoted numbers in as the approved rates
    pub fn approve(&self, approved_at: DateTime<Utc>) -> Self {
        let rates = self.quoted.normalized();
        Self {
            status: QuotationStatus::Approved,
            final_cmt_per_piece: Some(rates.final_rate()),
            approved_rates: Some(ApprovedRates {
                final_cmt_per_piece: rates.final_rate(),
                rates: rates.clone(),
                approved_at,
            }),
            quoted: rates,
            updated_at: approved_at,
            ..self.clone()
        }
    }
}
