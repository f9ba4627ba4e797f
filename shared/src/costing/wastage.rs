//! Wastage and fabric utilisation report

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregator::{CuttingAggregate, FabricUsage};
use crate::types::{percent_of, percent_of_opt, TypeIndex};

/// Wastage figures for a roll type or a style
///
/// Optional weights are `None` where the screens show "N/A".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WastageRow {
    pub type_index: Option<TypeIndex>,
    pub style_id: Option<Uuid>,
    pub cut_pieces: u64,
    pub wastage_pieces: u64,
    pub logged_weight_kg: Option<Decimal>,
    pub total_fabric_weight_kg: Decimal,
    pub fabric_waste_kg: Option<Decimal>,
    /// `logged weight / total fabric × 100`
    pub utilisation_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WastageReport {
    pub by_type: Vec<WastageRow>,
    pub by_style: Vec<WastageRow>,
    pub total_wastage_pieces: u64,
    /// Wastage pieces as a share of pieces cut, zero before any cutting
    pub wastage_percent_of_cut: Decimal,
}

fn row(
    usage: &impl FabricUsage,
    type_index: Option<TypeIndex>,
    style_id: Option<Uuid>,
    cut_pieces: u64,
    wastage_pieces: u64,
) -> WastageRow {
    let logged = usage.logged_weight_kg();
    WastageRow {
        type_index,
        style_id,
        cut_pieces,
        wastage_pieces,
        logged_weight_kg: logged,
        total_fabric_weight_kg: usage.total_fabric_weight_kg(),
        fabric_waste_kg: usage.fabric_waste_kg(),
        utilisation_percent: usage
            .fabric_waste_kg()
            .and_then(|_| percent_of_opt(usage.actual_weight_kg(), usage.total_fabric_weight_kg())),
    }
}

pub fn build_wastage_report(cutting: &CuttingAggregate) -> WastageReport {
    let by_type = cutting
        .by_type
        .values()
        .map(|t| row(t, Some(t.type_index), t.style_id, t.cut_pieces, t.wastage_pieces))
        .collect();
    let by_style = cutting
        .by_style
        .values()
        .map(|s| row(s, None, Some(s.style_id), s.cut_pieces, s.wastage_pieces))
        .collect();

    WastageReport {
        by_type,
        by_style,
        total_wastage_pieces: cutting.total_wastage_pieces,
        wastage_percent_of_cut: percent_of(
            Decimal::from(cutting.total_wastage_pieces),
            Decimal::from(cutting.total_cut_pieces),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::aggregate_cutting;
    use crate::models::{CuttingLogEntry, CuttingWastageEntry, RollType};
    use chrono::NaiveDate;

    fn roll(index: TypeIndex, style_id: Option<Uuid>) -> RollType {
        RollType {
            index,
            color: "Grey".to_string(),
            fabric_type: "Fleece".to_string(),
            gsm: Some(280),
            number_of_rolls: 4,
            weight_per_roll_kg: Decimal::from(25),
            style_id,
            operations: vec![],
        }
    }

    fn waste(index: TypeIndex, pieces: u32, weight: Option<i64>) -> CuttingWastageEntry {
        CuttingWastageEntry {
            id: Uuid::new_v4(),
            batch_id: Uuid::nil(),
            type_index: Some(index),
            log_date: NaiveDate::from_ymd_opt(2024, 10, 4).unwrap(),
            wastage_pieces: pieces,
            actual_weight_kg: weight.map(Decimal::from),
            notes: None,
        }
    }

    #[test]
    fn test_report_marks_unweighed_types_as_na() {
        let style = Uuid::new_v4();
        let rolls = vec![roll(0, Some(style)), roll(1, None)];
        let logs = vec![CuttingLogEntry {
            id: Uuid::new_v4(),
            batch_id: Uuid::nil(),
            type_index: Some(0),
            log_date: NaiveDate::from_ymd_opt(2024, 10, 4).unwrap(),
            pieces_cut: 200,
            notes: None,
        }];
        let wastage = vec![waste(0, 6, Some(80)), waste(1, 4, None)];
        let report = build_wastage_report(&aggregate_cutting(&rolls, &logs, &wastage));

        let weighed = &report.by_type[0];
        assert_eq!(weighed.logged_weight_kg, Some(Decimal::from(80)));
        assert_eq!(weighed.fabric_waste_kg, Some(Decimal::from(20)));
        assert_eq!(weighed.utilisation_percent, Some(Decimal::from(80)));

        let unweighed = &report.by_type[1];
        assert_eq!(unweighed.logged_weight_kg, None);
        assert_eq!(unweighed.fabric_waste_kg, None);
        assert_eq!(unweighed.utilisation_percent, None);

        assert_eq!(report.by_style.len(), 1);
        assert_eq!(report.by_style[0].style_id, Some(style));
        assert_eq!(report.total_wastage_pieces, 10);
        assert_eq!(report.wastage_percent_of_cut, Decimal::from(5));
    }

    #[test]
    fn test_no_cutting_gives_zero_percent() {
        let report = build_wastage_report(&CuttingAggregate::default());
        assert_eq!(report.wastage_percent_of_cut, Decimal::ZERO);
        assert!(report.by_type.is_empty());
    }
}
