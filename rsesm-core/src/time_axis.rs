//! Calendar-aware view of a time coordinate.
//!
//! Times are stored as decimal years, so `2000.0` is the start of January 2000
//! and `2000.5` is the start of July. Monthly model output is conventionally
//! stamped at mid-month, which is what [`TimeAxis::monthly`] produces.

use crate::errors::{RSESMError, RSESMResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub type FloatValue = f64;
pub type Time = f64;

/// Number of months used when splitting a year
const MONTHS_PER_YEAR: FloatValue = 12.0;

/// Shift (in years, about three seconds) applied before flooring to calendar fields
///
/// Start-of-month stamps such as `2000.0 + 1.0 / 12.0` carry rounding error
/// that can place them just before the boundary they sit on.
const CALENDAR_EPS: Time = 1e-7;

/// A strictly increasing sequence of decimal-year times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    values: Array1<Time>,
}

impl TimeAxis {
    /// Create a time axis, checking that the times are finite and strictly increasing
    pub fn from_values(values: Array1<Time>) -> RSESMResult<Self> {
        if values.iter().any(|t| !t.is_finite()) {
            return Err(RSESMError::NonMonotonicTime);
        }
        if values
            .iter()
            .zip(values.iter().skip(1))
            .any(|(a, b)| b <= a)
        {
            return Err(RSESMError::NonMonotonicTime);
        }
        Ok(Self { values })
    }

    /// Mid-month time stamps for `n_months` consecutive months starting in January of `start_year`
    ///
    /// ```rust
    /// use rsesm_core::time_axis::TimeAxis;
    ///
    /// let axis = TimeAxis::monthly(2000, 24);
    /// assert_eq!(axis.len(), 24);
    /// assert_eq!(axis.month(0), 1);
    /// assert_eq!(axis.month(13), 2);
    /// assert_eq!(axis.year(13), 2001);
    /// ```
    pub fn monthly(start_year: i32, n_months: usize) -> Self {
        let values = Array1::from_iter(
            (0..n_months)
                .map(|i| start_year as Time + (i as Time + 0.5) / MONTHS_PER_YEAR),
        );
        Self { values }
    }

    pub fn values(&self) -> &Array1<Time> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Calendar year of the time step at `index`
    pub fn year(&self, index: usize) -> i32 {
        (self.values[index] + CALENDAR_EPS).floor() as i32
    }

    /// Calendar month (1-12) of the time step at `index`
    pub fn month(&self, index: usize) -> u32 {
        let t = self.values[index] + CALENDAR_EPS;
        let month = ((t - t.floor()) * MONTHS_PER_YEAR).floor() as u32 + 1;
        month.clamp(1, 12)
    }

    /// Distinct calendar years present on the axis, in increasing order
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = (0..self.len()).map(|i| self.year(i)).collect();
        years.dedup();
        years
    }

    pub fn first_year(&self) -> Option<i32> {
        (!self.is_empty()).then(|| self.year(0))
    }

    pub fn last_year(&self) -> Option<i32> {
        (!self.is_empty()).then(|| self.year(self.len() - 1))
    }

    /// Indices of the time steps whose calendar year lies within `[first, last]`
    ///
    /// Both bounds are inclusive. Because the axis is monotonic the selection is
    /// always a contiguous range, possibly empty.
    pub fn year_range(&self, first: i32, last: i32) -> Range<usize> {
        let start = (0..self.len())
            .find(|&i| self.year(i) >= first)
            .unwrap_or(self.len());
        let end = (start..self.len())
            .find(|&i| self.year(i) > last)
            .unwrap_or(self.len());
        start..end
    }

    /// Indices grouped by calendar month, index 0 holding January
    pub fn month_groups(&self) -> [Vec<usize>; 12] {
        let mut groups: [Vec<usize>; 12] = Default::default();
        for i in 0..self.len() {
            groups[(self.month(i) - 1) as usize].push(i);
        }
        groups
    }

    /// Check that two axes describe the same time steps
    pub fn ensure_matches(&self, other: &TimeAxis) -> RSESMResult<()> {
        if self.len() != other.len() {
            return Err(RSESMError::TimeAxisMismatch(format!(
                "lengths differ ({} vs {})",
                self.len(),
                other.len()
            )));
        }
        let tolerance = 1e-6;
        if let Some((a, b)) = self
            .values
            .iter()
            .zip(other.values.iter())
            .find(|(a, b)| (*a - *b).abs() > tolerance)
        {
            return Err(RSESMError::TimeAxisMismatch(format!(
                "time {} does not match {}",
                a, b
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rejects_non_monotonic() {
        let err = TimeAxis::from_values(array![2000.0, 2000.5, 2000.25]).unwrap_err();
        assert_eq!(err, RSESMError::NonMonotonicTime);

        let err = TimeAxis::from_values(array![2000.0, 2000.0]).unwrap_err();
        assert_eq!(err, RSESMError::NonMonotonicTime);
    }

    #[test]
    fn calendar_fields() {
        let axis = TimeAxis::monthly(1990, 36);
        assert_eq!(axis.years(), vec![1990, 1991, 1992]);
        assert_eq!(axis.first_year(), Some(1990));
        assert_eq!(axis.last_year(), Some(1992));
        assert_eq!(axis.month(11), 12);
        assert_eq!(axis.month(12), 1);

        let groups = axis.month_groups();
        assert!(groups.iter().all(|g| g.len() == 3));
        assert_eq!(groups[0], vec![0, 12, 24]);
    }

    #[test]
    fn year_range_is_inclusive() {
        let axis = TimeAxis::monthly(2000, 60);
        assert_eq!(axis.year_range(2001, 2002), 12..36);
        assert_eq!(axis.year_range(2004, 2010), 48..60);
        assert_eq!(axis.year_range(2010, 2012), 60..60);
    }

    #[test]
    fn start_of_year_stamp_is_january() {
        let axis = TimeAxis::from_values(array![2000.0, 2000.5, 2001.0]).unwrap();
        assert_eq!(axis.month(0), 1);
        assert_eq!(axis.month(1), 7);
        assert_eq!(axis.year(2), 2001);
    }

    #[test]
    fn start_of_month_stamps() {
        let axis = TimeAxis::from_values(Array1::from_shape_fn(24, |k| {
            2000.0 + k as Time / MONTHS_PER_YEAR
        }))
        .unwrap();
        let months: Vec<u32> = (0..axis.len()).map(|i| axis.month(i)).collect();
        let expected: Vec<u32> = (1..=12).chain(1..=12).collect();
        assert_eq!(months, expected);
        assert_eq!(axis.years(), vec![2000, 2001]);
        assert_eq!(axis.year(12), 2001);
        assert!(axis.month_groups().iter().all(|g| g.len() == 2));

        let axis = TimeAxis::from_values(array![1999.5, 2000.0 - 1e-12]).unwrap();
        assert_eq!(axis.year(1), 2000);
        assert_eq!(axis.month(1), 1);
    }

    #[test]
    fn mismatch_detected() {
        let a = TimeAxis::monthly(2000, 12);
        let b = TimeAxis::monthly(2001, 12);
        assert!(a.ensure_matches(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_matches(&b),
            Err(RSESMError::TimeAxisMismatch(_))
        ));
    }
}
