//! Partitions the timeline into the date ranges each topology snapshot is valid for.
use crate::store::{TopologySnapshot, TopologyTable};
use chrono::NaiveDate;
use std::ops::Range;
use tracing::info;

/// A contiguous date range over which one snapshot applies. The window owns its arena.
#[derive(Debug, Clone)]
pub struct ValidityWindow {
    pub start: NaiveDate,
    /// Exclusive; `None` for the last window.
    pub end: Option<NaiveDate>,
    /// Indices into the summary dates the window was cut from.
    pub dates: Range<usize>,
    pub snapshot: TopologySnapshot,
}

/// Cuts `summary_dates` (sorted ascending) at every distinct topology date.
///
/// Windows without any summary date are dropped; that happens when a tree is
/// redefined after the last report step, or twice between two report steps.
pub fn segment(table: &TopologyTable, terminal_node: &str, summary_dates: &[NaiveDate]) -> Vec<ValidityWindow> {
    let topology_dates = table.dates();
    let mut windows = Vec::with_capacity(topology_dates.len());

    for (i, &start) in topology_dates.iter().enumerate() {
        let end = topology_dates.get(i + 1).copied();
        let lo = summary_dates.partition_point(|&d| d < start);
        let hi = match end {
            Some(end) => summary_dates.partition_point(|&d| d < end),
            None => summary_dates.len(),
        };

        if lo >= hi {
            info!(
                start = %start,
                end = ?end,
                "No summary data in the validity window of the network defined at {}, skipping it",
                start
            );
            continue;
        }

        windows.push(ValidityWindow {
            start,
            end,
            dates: lo..hi,
            snapshot: table.snapshot(start, terminal_node),
        });
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Keyword, TopologyRow};

    fn d(y: i32, m: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, 1).unwrap() }

    fn table(dates: &[NaiveDate]) -> TopologyTable {
        TopologyTable::new(
            dates.iter().map(|&date| TopologyRow::new(date, "FIELD", "G1", Keyword::Gruptree)).collect(),
        )
    }

    fn monthly(from: u32, to: u32) -> Vec<NaiveDate> { (from..=to).map(|m| d(2020, m)).collect() }

    #[test]
    fn test_windows_cover_summary_dates_without_overlap() {
        let summary = monthly(1, 12);
        let windows = segment(&table(&[d(2020, 1), d(2020, 4), d(2020, 9)]), "FIELD", &summary);

        let ranges: Vec<Range<usize>> = windows.iter().map(|w| w.dates.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..8, 8..12]);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].dates.end, pair[1].dates.start);
            assert_eq!(pair[0].end, Some(pair[1].start));
        }
        assert_eq!(windows.last().unwrap().end, None);
        assert_eq!(windows[1].snapshot.date, d(2020, 4));
    }

    #[test]
    fn test_topology_after_last_report_is_dropped() {
        let summary = monthly(1, 6);
        let windows = segment(&table(&[d(2020, 1), d(2021, 1)]), "FIELD", &summary);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].dates, 0..6);
        // The first window now runs up to the second topology date, not the open end.
        assert_eq!(windows[0].end, Some(d(2021, 1)));
    }

    #[test]
    fn test_redefinition_between_report_steps_is_dropped() {
        let summary = vec![d(2020, 1), d(2020, 6)];
        let dates = [d(2020, 1), d(2020, 2), d(2020, 3)];
        let windows = segment(&table(&dates), "FIELD", &summary);
        let starts: Vec<NaiveDate> = windows.iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![d(2020, 1), d(2020, 3)]);
        assert_eq!(windows[1].dates, 1..2);
    }

    #[test]
    fn test_summary_before_first_topology_date_is_uncovered() {
        let summary = monthly(1, 4);
        let windows = segment(&table(&[d(2020, 3)]), "FIELD", &summary);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].dates, 2..4);
    }

    #[test]
    fn test_empty_table_gives_no_windows() {
        assert!(segment(&TopologyTable::default(), "FIELD", &monthly(1, 3)).is_empty());
    }
}
