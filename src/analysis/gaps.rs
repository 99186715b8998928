//! Coverage gap detection.

use chrono::{Days, NaiveDate};

use crate::models::{GapInterval, InsuranceInterval};

/// Finds the uncovered periods between intervals.
///
/// Ranges are swept in start order while tracking the furthest covered day.
/// A gap is emitted whenever the next range starts more than one day after
/// that point. Nothing is reported before the first or after the last range.
///
/// # Example
///
/// ```
/// use coverage_audit::analysis::detect_gaps;
/// use coverage_audit::models::InsuranceInterval;
/// use chrono::NaiveDate;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let intervals = vec![
///     InsuranceInterval::new(d(2010, 1, 1), d(2010, 12, 31)).unwrap(),
///     InsuranceInterval::new(d(2012, 1, 1), d(2012, 12, 31)).unwrap(),
/// ];
///
/// let gaps = detect_gaps(&intervals);
/// assert_eq!(gaps.len(), 1);
/// assert_eq!(gaps[0].start_date, d(2011, 1, 1));
/// assert_eq!(gaps[0].end_date, d(2011, 12, 31));
/// ```
pub fn detect_gaps(intervals: &[InsuranceInterval]) -> Vec<GapInterval> {
    let ranges: Vec<(NaiveDate, NaiveDate)> = intervals
        .iter()
        .map(|i| (i.start_date, i.end_date))
        .collect();
    detect_gaps_in_ranges(&ranges)
}

/// Finds the uncovered periods between inclusive date ranges.
///
/// Ranges whose end precedes their start are ignored.
pub fn detect_gaps_in_ranges(ranges: &[(NaiveDate, NaiveDate)]) -> Vec<GapInterval> {
    let mut sorted: Vec<(NaiveDate, NaiveDate)> = ranges
        .iter()
        .copied()
        .filter(|(start, end)| start <= end)
        .collect();
    sorted.sort();

    let mut gaps = Vec::new();
    let mut iter = sorted.into_iter();
    let Some((_, mut covered_end)) = iter.next() else {
        return gaps;
    };

    for (start, end) in iter {
        if let Some(next_uncovered) = covered_end.checked_add_days(Days::new(1)) {
            if start > next_uncovered {
                if let Some(gap_end) = start.checked_sub_days(Days::new(1)) {
                    gaps.push(GapInterval::new(next_uncovered, gap_end));
                }
            }
        }
        covered_end = covered_end.max(end);
    }

    gaps
}
