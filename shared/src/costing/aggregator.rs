//! Cost aggregator: folds cutting logs and wastage into per-type and
//! per-style totals

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CuttingLogEntry, CuttingWastageEntry, RollType};
use crate::types::TypeIndex;

/// Running totals for one roll type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeTotals {
    pub type_index: TypeIndex,
    pub style_id: Option<Uuid>,
    pub cut_pieces: u64,
    pub wastage_pieces: u64,
    /// Sum of logged leftover weights, missing weights counted as zero
    pub actual_weight_kg: Decimal,
    /// Wastage entries that carried a weight at all
    pub weighed_entries: u32,
    pub total_fabric_weight_kg: Decimal,
}

/// Running totals for one style across all of its roll types
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleCutting {
    pub style_id: Uuid,
    pub type_indices: Vec<TypeIndex>,
    pub cut_pieces: u64,
    pub wastage_pieces: u64,
    pub actual_weight_kg: Decimal,
    pub weighed_entries: u32,
    pub total_fabric_weight_kg: Decimal,
}

/// Weight figures shared by type and style totals
pub trait FabricUsage {
    fn actual_weight_kg(&self) -> Decimal;
    fn weighed_entries(&self) -> u32;
    fn total_fabric_weight_kg(&self) -> Decimal;

    /// Logged weight, or `None` ("N/A") when no entry was ever weighed
    fn logged_weight_kg(&self) -> Option<Decimal> {
        (self.weighed_entries() > 0).then(|| self.actual_weight_kg())
    }

    /// `total fabric − actual weight`, undefined unless some weight was logged
    ///
    /// A missing weighing must not read as zero waste.
    fn fabric_waste_kg(&self) -> Option<Decimal> {
        let actual = self.actual_weight_kg();
        (actual > Decimal::ZERO).then(|| self.total_fabric_weight_kg() - actual)
    }
}

impl FabricUsage for TypeTotals {
    fn actual_weight_kg(&self) -> Decimal {
        self.actual_weight_kg
    }

    fn weighed_entries(&self) -> u32 {
        self.weighed_entries
    }

    fn total_fabric_weight_kg(&self) -> Decimal {
        self.total_fabric_weight_kg
    }
}

impl FabricUsage for StyleCutting {
    fn actual_weight_kg(&self) -> Decimal {
        self.actual_weight_kg
    }

    fn weighed_entries(&self) -> u32 {
        self.weighed_entries
    }

    fn total_fabric_weight_kg(&self) -> Decimal {
        self.total_fabric_weight_kg
    }
}

/// Result of folding one batch's cutting floor data
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CuttingAggregate {
    pub by_type: BTreeMap<TypeIndex, TypeTotals>,
    pub by_style: BTreeMap<Uuid, StyleCutting>,
    /// Pieces cut across every known roll type
    pub total_cut_pieces: u64,
    /// Pieces cut for roll types with no style
    pub unassigned_cut_pieces: u64,
    pub total_wastage_pieces: u64,
    /// Logs with no index or an index that no longer resolves
    pub orphaned_log_count: usize,
    pub orphaned_cut_pieces: u64,
    pub orphaned_wastage_count: usize,
}

impl CuttingAggregate {
    pub fn cut_pieces_for_style(&self, style_id: Uuid) -> u64 {
        self.by_style.get(&style_id).map_or(0, |s| s.cut_pieces)
    }

    pub fn has_orphans(&self) -> bool {
        self.orphaned_log_count > 0 || self.orphaned_wastage_count > 0
    }
}

/// Fold cutting logs and wastage into per-type and per-style totals
///
/// Logs pointing at an index that is not among `roll_types` are left out of
/// every total and only counted as orphans; historical rows may reference
/// roll types removed by a later batch edit.
pub fn aggregate_cutting(
    roll_types: &[RollType],
    logs: &[CuttingLogEntry],
    wastage: &[CuttingWastageEntry],
) -> CuttingAggregate {
    let mut aggregate = CuttingAggregate::default();

    for roll in roll_types {
        aggregate
            .by_type
            .entry(roll.index)
            .or_insert_with(|| TypeTotals {
                type_index: roll.index,
                style_id: roll.style_id,
                total_fabric_weight_kg: roll.total_fabric_weight_kg(),
                ..TypeTotals::default()
            });
    }

    for log in logs {
        match log.type_index.and_then(|i| aggregate.by_type.get_mut(&i)) {
            Some(totals) => totals.cut_pieces += u64::from(log.pieces_cut),
            None => {
                aggregate.orphaned_log_count += 1;
                aggregate.orphaned_cut_pieces += u64::from(log.pieces_cut);
            }
        }
    }

    for entry in wastage {
        match entry.type_index.and_then(|i| aggregate.by_type.get_mut(&i)) {
            Some(totals) => {
                totals.wastage_pieces += u64::from(entry.wastage_pieces);
                if let Some(weight) = entry.actual_weight_kg {
                    totals.actual_weight_kg += weight;
                    totals.weighed_entries += 1;
                }
            }
            None => aggregate.orphaned_wastage_count += 1,
        }
    }

    for totals in aggregate.by_type.values() {
        aggregate.total_cut_pieces += totals.cut_pieces;
        aggregate.total_wastage_pieces += totals.wastage_pieces;

        let Some(style_id) = totals.style_id else {
            aggregate.unassigned_cut_pieces += totals.cut_pieces;
            continue;
        };
        let style = aggregate
            .by_style
            .entry(style_id)
            .or_insert_with(|| StyleCutting {
                style_id,
                ..StyleCutting::default()
            });
        style.type_indices.push(totals.type_index);
        style.cut_pieces += totals.cut_pieces;
        style.wastage_pieces += totals.wastage_pieces;
        style.actual_weight_kg += totals.actual_weight_kg;
        style.weighed_entries += totals.weighed_entries;
        style.total_fabric_weight_kg += totals.total_fabric_weight_kg;
    }

    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn roll(index: TypeIndex, rolls: u32, weight: &str, style_id: Option<Uuid>) -> RollType {
        RollType {
            index,
            color: format!("Color {}", index),
            fabric_type: "Single Jersey".to_string(),
            gsm: Some(160),
            number_of_rolls: rolls,
            weight_per_roll_kg: dec(weight),
            style_id,
            operations: vec![],
        }
    }

    fn log(type_index: Option<TypeIndex>, pieces: u32) -> CuttingLogEntry {
        CuttingLogEntry {
            id: Uuid::new_v4(),
            batch_id: Uuid::nil(),
            type_index,
            log_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            pieces_cut: pieces,
            notes: None,
        }
    }

    fn waste(type_index: Option<TypeIndex>, pieces: u32, weight: Option<&str>) -> CuttingWastageEntry {
        CuttingWastageEntry {
            id: Uuid::new_v4(),
            batch_id: Uuid::nil(),
            type_index,
            log_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            wastage_pieces: pieces,
            actual_weight_kg: weight.map(dec),
            notes: None,
        }
    }

    #[test]
    fn test_same_day_entries_sum_per_type() {
        let rolls = vec![roll(0, 10, "20", None), roll(1, 10, "20", None)];
        let logs = vec![log(Some(0), 50), log(Some(0), 30), log(Some(1), 10), log(None, 99)];
        let agg = aggregate_cutting(&rolls, &logs, &[]);
        assert_eq!(agg.by_type[&0].cut_pieces, 80);
        assert_eq!(agg.by_type[&1].cut_pieces, 10);
        assert_eq!(agg.orphaned_cut_pieces, 99);
    }

    #[test]
    fn test_style_rollup() {
        let s1 = Uuid::new_v4();
        let rolls = vec![
            roll(0, 100, "2", Some(s1)),
            roll(1, 50, "3", Some(s1)),
            roll(2, 10, "1", None),
        ];
        let logs = vec![log(Some(0), 180), log(Some(1), 90), log(Some(2), 30)];
        let agg = aggregate_cutting(&rolls, &logs, &[]);

        assert_eq!(agg.total_cut_pieces, 300);
        assert_eq!(agg.unassigned_cut_pieces, 30);
        let style = &agg.by_style[&s1];
        assert_eq!(style.cut_pieces, 270);
        assert_eq!(style.type_indices, vec![0, 1]);
        assert_eq!(style.total_fabric_weight_kg, dec("350"));
    }

    #[test]
    fn test_orphaned_logs_are_ignored() {
        let rolls = vec![roll(0, 10, "2", None)];
        let logs = vec![log(Some(0), 40), log(Some(7), 25), log(None, 5)];
        let agg = aggregate_cutting(&rolls, &logs, &[waste(Some(9), 3, None)]);

        assert_eq!(agg.total_cut_pieces, 40);
        assert_eq!(agg.orphaned_log_count, 2);
        assert_eq!(agg.orphaned_cut_pieces, 30);
        assert_eq!(agg.orphaned_wastage_count, 1);
        assert!(agg.has_orphans());
    }

    #[test]
    fn test_wastage_weight_and_fabric_waste() {
        let rolls = vec![roll(0, 100, "2", None), roll(1, 50, "3", None)];
        let wastage = vec![
            waste(Some(0), 5, Some("12.5")),
            waste(Some(0), 3, None),
            waste(Some(1), 4, None),
        ];
        let agg = aggregate_cutting(&rolls, &[], &wastage);

        let weighed = &agg.by_type[&0];
        assert_eq!(weighed.wastage_pieces, 8);
        assert_eq!(weighed.logged_weight_kg(), Some(dec("12.5")));
        assert_eq!(weighed.fabric_waste_kg(), Some(dec("187.5")));

        let unweighed = &agg.by_type[&1];
        assert_eq!(unweighed.wastage_pieces, 4);
        assert_eq!(unweighed.logged_weight_kg(), None);
        assert_eq!(unweighed.fabric_waste_kg(), None);
        assert_eq!(agg.total_wastage_pieces, 12);
    }

    #[test]
    fn test_zero_weight_entry_is_logged_but_waste_undefined() {
        let rolls = vec![roll(0, 10, "2", None)];
        let agg = aggregate_cutting(&rolls, &[], &[waste(Some(0), 1, Some("0"))]);
        let totals = &agg.by_type[&0];
        assert_eq!(totals.logged_weight_kg(), Some(Decimal::ZERO));
        assert_eq!(totals.fabric_waste_kg(), None);
    }

    #[test]
    fn test_types_without_logs_still_listed() {
        let rolls = vec![roll(0, 10, "2", Some(Uuid::new_v4()))];
        let agg = aggregate_cutting(&rolls, &[], &[]);
        assert_eq!(agg.by_type.len(), 1);
        assert_eq!(agg.by_style.len(), 1);
        assert_eq!(agg.total_cut_pieces, 0);
    }
}
