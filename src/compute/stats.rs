//! Cross-realization statistics per date.
use super::ledger::{SeriesTable, SummaryFrame};
use crate::error::GroupTreeError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Ensemble statistic. P10/P90 follow the reservoir convention: P10 is the high
/// estimate (90th percentile) and P90 the low one (10th percentile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatOption {
    Mean,
    P10,
    P50,
    P90,
    Max,
    Min,
}

impl StatOption {
    /// Reduces one date's samples. Undefined samples are ignored; no samples gives NaN.
    pub fn reduce(&self, samples: &mut [f64]) -> f64 {
        if samples.is_empty() {
            return f64::NAN;
        }
        match self {
            StatOption::Mean => samples.iter().sum::<f64>() / samples.len() as f64,
            StatOption::Max => samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            StatOption::Min => samples.iter().copied().fold(f64::INFINITY, f64::min),
            StatOption::P10 => quantile(samples, 0.9),
            StatOption::P50 => quantile(samples, 0.5),
            StatOption::P90 => quantile(samples, 0.1),
        }
    }
}

impl FromStr for StatOption {
    type Err = GroupTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(StatOption::Mean),
            "p10" => Ok(StatOption::P10),
            "p50" => Ok(StatOption::P50),
            "p90" => Ok(StatOption::P90),
            "max" => Ok(StatOption::Max),
            "min" => Ok(StatOption::Min),
            other => Err(GroupTreeError::Configuration(format!("Unknown statistic '{}'", other))),
        }
    }
}

/// Linear-interpolated quantile, `q` in [0, 1]. Sorts `samples` in place.
pub fn quantile(samples: &mut [f64], q: f64) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    samples.sort_by(|a, b| a.total_cmp(b));
    let pos = q.clamp(0.0, 1.0) * (samples.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    samples[lo] + (samples[hi] - samples[lo]) * frac
}

/// Collapses the realization axis: one value per (date, vector).
///
/// Columns are independent, so they are reduced in parallel.
pub fn aggregate(frame: &SummaryFrame, stat: StatOption) -> SeriesTable {
    let (dates, groups) = frame.rows_by_date();

    let columns: BTreeMap<String, Vec<f64>> = frame
        .columns()
        .par_iter()
        .map(|(name, values)| {
            let reduced = groups
                .iter()
                .map(|rows| {
                    let mut samples: SmallVec<[f64; 32]> =
                        rows.iter().map(|&r| values[r]).filter(|v| !v.is_nan()).collect();
                    stat.reduce(&mut samples)
                })
                .collect();
            (name.clone(), reduced)
        })
        .collect();

    SeriesTable { dates, columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case(StatOption::Mean, 2.5)]
    #[case(StatOption::Max, 4.0)]
    #[case(StatOption::Min, 1.0)]
    #[case(StatOption::P50, 2.5)]
    #[case(StatOption::P10, 3.7)]
    #[case(StatOption::P90, 1.3)]
    fn test_reduce(#[case] stat: StatOption, #[case] expected: f64) {
        let mut samples = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(stat.reduce(&mut samples), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_reduce_empty_is_undefined() {
        assert!(StatOption::Mean.reduce(&mut []).is_nan());
    }

    #[test]
    fn test_aggregate_groups_by_date() {
        let d1 = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let frame = SummaryFrame::new(
            vec![d2, d1, d1, d2],
            vec![0, 0, 1, 1],
            BTreeMap::from([("GOPR:G1".to_string(), vec![10.0, 1.0, 3.0, f64::NAN])]),
        )
        .unwrap();

        let table = aggregate(&frame, StatOption::Mean);
        assert_eq!(table.dates, vec![d1, d2]);
        assert_eq!(table.columns["GOPR:G1"], vec![2.0, 10.0]);
    }

    #[test]
    fn test_parse_stat_option() {
        assert_eq!("P90".parse::<StatOption>().unwrap(), StatOption::P90);
        assert!("p75".parse::<StatOption>().is_err());
    }
}
