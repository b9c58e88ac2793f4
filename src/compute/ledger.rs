//! ledger.rs
//! The time-series side of the model: the provider seam, the wide
//! (DATE, REAL, vectors...) table it returns, and the date-indexed table one
//! display request is assembled from.

use crate::error::{GroupTreeError, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Read-only access to an ensemble's summary vectors.
pub trait SummaryProvider: Send + Sync {
    fn signal_names(&self) -> BTreeSet<String>;

    /// Returns the requested vectors for the given realizations (all when `None`).
    fn get_values(&self, signal_names: &[String], realizations: Option<&[i32]>) -> Result<SummaryFrame>;
}

/// Wide table: one row per (date, realization), one column per vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFrame {
    dates: Vec<NaiveDate>,
    realizations: Vec<i32>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl SummaryFrame {
    pub fn new(dates: Vec<NaiveDate>, realizations: Vec<i32>, columns: BTreeMap<String, Vec<f64>>) -> Result<Self> {
        if dates.len() != realizations.len() {
            return Err(GroupTreeError::Provider(format!(
                "DATE has {} rows but REAL has {}",
                dates.len(),
                realizations.len()
            )));
        }
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != dates.len()) {
            return Err(GroupTreeError::Provider(format!(
                "Vector '{}' has {} rows, expected {}",
                name,
                values.len(),
                dates.len()
            )));
        }
        Ok(Self { dates, realizations, columns })
    }

    pub fn len(&self) -> usize { self.dates.len() }
    pub fn is_empty(&self) -> bool { self.dates.is_empty() }
    pub fn dates(&self) -> &[NaiveDate] { &self.dates }
    pub fn realization_column(&self) -> &[i32] { &self.realizations }
    pub fn columns(&self) -> &BTreeMap<String, Vec<f64>> { &self.columns }

    pub fn column(&self, name: &str) -> Option<&[f64]> { self.columns.get(name).map(|v| v.as_slice()) }

    pub fn realizations(&self) -> BTreeSet<i32> { self.realizations.iter().copied().collect() }

    /// Sorted, distinct dates over all realizations.
    pub fn unique_dates(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.dates.iter().copied().collect();
        dates.into_iter().collect()
    }

    /// Sum over all rows, skipping undefined samples. A missing vector sums to zero.
    pub fn sum(&self, name: &str) -> f64 {
        self.column(name).map_or(0.0, |values| values.iter().filter(|v| !v.is_nan()).sum())
    }

    pub fn any_equals(&self, name: &str, target: f64) -> bool {
        self.column(name).map_or(false, |values| values.iter().any(|&v| v == target))
    }

    /// Projects the rows of one realization onto a date-indexed table.
    pub fn for_realization(&self, realization: i32) -> SeriesTable {
        let mut rows: Vec<usize> = (0..self.len()).filter(|&i| self.realizations[i] == realization).collect();
        // Stable sort keeps the provider's order for repeated dates; the last one wins below.
        rows.sort_by_key(|&i| self.dates[i]);
        rows.dedup_by(|next, prev| {
            if self.dates[*next] == self.dates[*prev] {
                *prev = *next;
                true
            } else {
                false
            }
        });

        let dates = rows.iter().map(|&i| self.dates[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), rows.iter().map(|&i| values[i]).collect()))
            .collect();
        SeriesTable { dates, columns }
    }

    /// Row indices grouped by date, aligned with `unique_dates()`.
    pub fn rows_by_date(&self) -> (Vec<NaiveDate>, Vec<Vec<usize>>) {
        let dates = self.unique_dates();
        let mut groups = vec![Vec::new(); dates.len()];
        for (row, date) in self.dates.iter().enumerate() {
            if let Ok(pos) = dates.binary_search(date) {
                groups[pos].push(row);
            }
        }
        (dates, groups)
    }
}

/// One value per date and vector, dates sorted ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    pub dates: Vec<NaiveDate>,
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl SeriesTable {
    pub fn dates(&self) -> &[NaiveDate] { &self.dates }

    #[inline]
    pub fn get(&self, name: &str, date_idx: usize) -> Option<f64> {
        self.columns.get(name).and_then(|values| values.get(date_idx)).copied()
    }
}

/// A provider over a table already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySummary {
    frame: SummaryFrame,
}

impl InMemorySummary {
    pub fn new(frame: SummaryFrame) -> Self { Self { frame } }
}

impl SummaryProvider for InMemorySummary {
    fn signal_names(&self) -> BTreeSet<String> { self.frame.columns.keys().cloned().collect() }

    fn get_values(&self, signal_names: &[String], realizations: Option<&[i32]>) -> Result<SummaryFrame> {
        let rows: Vec<usize> = (0..self.frame.len())
            .filter(|&i| realizations.map_or(true, |reals| reals.contains(&self.frame.realizations[i])))
            .collect();

        let mut columns = BTreeMap::new();
        for name in signal_names {
            let values = self
                .frame
                .columns
                .get(name)
                .ok_or_else(|| GroupTreeError::Provider(format!("Unknown vector '{}'", name)))?;
            columns.insert(name.clone(), rows.iter().map(|&i| values[i]).collect());
        }

        SummaryFrame::new(
            rows.iter().map(|&i| self.frame.dates[i]).collect(),
            rows.iter().map(|&i| self.frame.realizations[i]).collect(),
            columns,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, 1).unwrap() }

    fn frame() -> SummaryFrame {
        SummaryFrame::new(
            vec![d(2020, 2), d(2020, 1), d(2020, 1), d(2020, 2)],
            vec![0, 0, 1, 1],
            BTreeMap::from([
                ("FOPR".to_string(), vec![2.0, 1.0, 3.0, f64::NAN]),
                ("WSTAT:W1".to_string(), vec![1.0, 3.0, 2.0, 2.0]),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_misaligned_columns_are_rejected() {
        let res = SummaryFrame::new(vec![d(2020, 1)], vec![0], BTreeMap::from([("FOPR".to_string(), vec![])]));
        assert!(matches!(res, Err(GroupTreeError::Provider(_))));
    }

    #[test]
    fn test_sum_skips_undefined() {
        let f = frame();
        assert_eq!(f.sum("FOPR"), 6.0);
        assert_eq!(f.sum("FWIR"), 0.0);
        assert!(f.any_equals("WSTAT:W1", 2.0));
        assert!(!f.any_equals("WSTAT:W2", 2.0));
    }

    #[test]
    fn test_for_realization_sorts_by_date() {
        let table = frame().for_realization(0);
        assert_eq!(table.dates, vec![d(2020, 1), d(2020, 2)]);
        assert_eq!(table.columns["FOPR"], vec![1.0, 2.0]);
        assert_eq!(table.get("FOPR", 1), Some(2.0));
        assert_eq!(table.get("FGPR", 0), None);
    }

    #[test]
    fn test_rows_by_date() {
        let (dates, groups) = frame().rows_by_date();
        assert_eq!(dates, vec![d(2020, 1), d(2020, 2)]);
        assert_eq!(groups, vec![vec![1, 2], vec![0, 3]]);
    }

    #[test]
    fn test_in_memory_provider_selects_columns_and_realizations() {
        let provider = InMemorySummary::new(frame());
        assert!(provider.signal_names().contains("FOPR"));

        let sub = provider.get_values(&["FOPR".to_string()], Some(&[1])).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.realizations(), BTreeSet::from([1]));
        assert!(sub.column("WSTAT:W1").is_none());

        let err = provider.get_values(&["GOPR:X".to_string()], None).unwrap_err();
        assert!(matches!(err, GroupTreeError::Provider(_)));
    }
}
