//! Linking-length parameters and the transverse sweep.

use std::fmt;

use crate::error::{FofError, Result};

/// Sweep values are snapped to this many decimal places so integer stepping
/// reproduces `0.1, 0.2, 0.3, ...` instead of `0.30000000000000004`.
const SWEEP_DECIMALS: i32 = 12;

/// Smallest step that survives snapping to [`SWEEP_DECIMALS`] places.
const MIN_SWEEP_STEP: f64 = 1e-12;

/// Relative slack that keeps an inclusive `stop` reachable despite rounding.
const SWEEP_STOP_TOLERANCE: f64 = 1e-9;

/// Upper bound on the number of values a range may generate.
pub const MAX_SWEEP_VALUES: usize = 100_000;

/// A pair of linking lengths: line-of-sight (km/s) and transverse (Mpc).
///
/// # Examples
/// ```
/// use fofgroups_core::{FofError, LinkingLengths};
///
/// let lengths = LinkingLengths::new(500.0, 0.7)?;
/// assert_eq!(lengths.line_of_sight(), 500.0);
/// assert_eq!(lengths.transverse(), 0.7);
/// assert_eq!(lengths.to_string(), "500_0.7");
/// # Ok::<(), FofError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkingLengths {
    line_of_sight: f64,
    transverse: f64,
}

impl LinkingLengths {
    /// Validates and builds a linking-length pair.
    ///
    /// # Errors
    /// Returns [`FofError::InvalidLinkingLength`] when either value is
    /// negative, NaN, or infinite.
    pub fn new(line_of_sight: f64, transverse: f64) -> Result<Self> {
        validate_length("line-of-sight", line_of_sight)?;
        validate_length("transverse", transverse)?;
        Ok(Self {
            line_of_sight,
            transverse,
        })
    }

    /// Returns the line-of-sight velocity threshold.
    #[must_use]
    pub const fn line_of_sight(&self) -> f64 {
        self.line_of_sight
    }

    /// Returns the transverse separation threshold.
    #[must_use]
    pub const fn transverse(&self) -> f64 {
        self.transverse
    }

    /// Returns whether the given separations satisfy both thresholds.
    ///
    /// Both comparisons are inclusive.
    #[must_use]
    pub fn admits(&self, line_of_sight: f64, transverse: f64) -> bool {
        line_of_sight <= self.line_of_sight && transverse <= self.transverse
    }
}

/// Renders `<los>_<trans>` using the shortest round-trip form of each value,
/// the label used in artifact file names.
impl fmt::Display for LinkingLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.line_of_sight, self.transverse)
    }
}

pub(crate) fn validate_length(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FofError::InvalidLinkingLength { parameter, value })
    }
}

/// An ordered, non-empty sequence of transverse linking lengths.
///
/// # Examples
/// ```
/// use fofgroups_core::{FofError, TransverseSweep};
///
/// let sweep = TransverseSweep::range(0.1, 2.0, 0.1)?;
/// assert_eq!(sweep.len(), 20);
/// assert_eq!(sweep.values()[2], 0.3);
/// assert_eq!(sweep.values().last(), Some(&2.0));
/// # Ok::<(), FofError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseSweep {
    values: Vec<f64>,
}

impl TransverseSweep {
    /// Builds the inclusive range `start, start + step, ..., stop`.
    ///
    /// Each value is computed as `start + i * step` and snapped to twelve
    /// decimal places, so no error accumulates across the range.
    ///
    /// # Errors
    /// Returns [`FofError::InvalidSweepStep`] for a non-finite step, a step
    /// below `1e-12`, or a step too small to separate consecutive values at
    /// the magnitude of `start`. Returns [`FofError::InvalidSweepRange`] when
    /// `stop < start`, [`FofError::SweepTooLarge`] when the range holds more
    /// than [`MAX_SWEEP_VALUES`] values, and
    /// [`FofError::InvalidLinkingLength`] when `start` or `stop` is not a
    /// valid transverse length.
    pub fn range(start: f64, stop: f64, step: f64) -> Result<Self> {
        validate_length("transverse", start)?;
        validate_length("transverse", stop)?;
        if !(step.is_finite() && step >= MIN_SWEEP_STEP) {
            return Err(FofError::InvalidSweepStep { step });
        }
        if stop < start {
            return Err(FofError::InvalidSweepRange { start, stop });
        }

        let limit = stop + step * SWEEP_STOP_TOLERANCE;
        let values: Vec<f64> = (0_u32..)
            .take(MAX_SWEEP_VALUES + 1)
            .map(|index| snap(start + f64::from(index) * step))
            .take_while(|&value| value <= limit)
            .map(|value| value.min(stop))
            .collect();
        // Distinct values map to distinct artifact names.
        if values.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(FofError::InvalidSweepStep { step });
        }
        if values.len() > MAX_SWEEP_VALUES {
            return Err(FofError::SweepTooLarge {
                limit: MAX_SWEEP_VALUES,
            });
        }
        Self::from_values(values)
    }

    /// Builds a sweep from an explicit list, preserving its order.
    ///
    /// # Errors
    /// Returns [`FofError::EmptySweep`] for an empty list and
    /// [`FofError::InvalidLinkingLength`] for any invalid value.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(FofError::EmptySweep);
        }
        for &value in &values {
            validate_length("transverse", value)?;
        }
        Ok(Self { values })
    }

    /// Returns the transverse values in sweep order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of sweep values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; sweeps are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn snap(value: f64) -> f64 {
    let scale = 10_f64.powi(SWEEP_DECIMALS);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn reference_range_matches_tenths() {
        let sweep = TransverseSweep::range(0.1, 2.0, 0.1).expect("range must build");
        let expected: Vec<f64> = (1..=20).map(|tenths| f64::from(tenths) / 10.0).collect();
        assert_eq!(sweep.values(), expected.as_slice());
    }

    #[rstest]
    #[case::single_value(0.5, 0.5, 0.1, vec![0.5])]
    #[case::non_dividing_stop(0.0, 1.0, 0.3, vec![0.0, 0.3, 0.6, 0.9])]
    #[case::quarters(1.0, 2.0, 0.25, vec![1.0, 1.25, 1.5, 1.75, 2.0])]
    fn range_includes_reachable_stop(
        #[case] start: f64,
        #[case] stop: f64,
        #[case] step: f64,
        #[case] expected: Vec<f64>,
    ) {
        let sweep = TransverseSweep::range(start, stop, step).expect("range must build");
        assert_eq!(sweep.values(), expected.as_slice());
    }

    #[rstest]
    #[case::zero_step(0.1, 1.0, 0.0)]
    #[case::negative_step(0.1, 1.0, -0.1)]
    #[case::nan_step(0.1, 1.0, f64::NAN)]
    #[case::below_resolution(0.0, 2e-12, 4e-13)]
    #[case::lost_at_magnitude(1.0e6, 1.0e6 + 1.0e-9, 1.0e-12)]
    fn range_rejects_invalid_step(#[case] start: f64, #[case] stop: f64, #[case] step: f64) {
        let err = TransverseSweep::range(start, stop, step).expect_err("step must be rejected");
        assert!(matches!(err, FofError::InvalidSweepStep { .. }));
    }

    #[test]
    fn range_at_resolution_yields_distinct_values() {
        let sweep = TransverseSweep::range(0.0, 5e-12, 1e-12).expect("range must build");
        assert_eq!(sweep.values(), &[0.0, 1e-12, 2e-12, 3e-12, 4e-12, 5e-12]);
    }

    #[rstest]
    #[case::tiny_step(0.0, 1_000.0, 1e-6)]
    #[case::just_over(0.0, 100_000.0, 1.0)]
    fn range_rejects_oversized_sweeps(#[case] start: f64, #[case] stop: f64, #[case] step: f64) {
        let err = TransverseSweep::range(start, stop, step).expect_err("range must be rejected");
        assert_eq!(
            err,
            FofError::SweepTooLarge {
                limit: MAX_SWEEP_VALUES
            }
        );
    }

    #[test]
    fn range_accepts_the_largest_sweep() {
        let sweep = TransverseSweep::range(1.0, 100_000.0, 1.0).expect("range must build");
        assert_eq!(sweep.len(), MAX_SWEEP_VALUES);
        assert_eq!(sweep.values().last(), Some(&100_000.0));
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        let err = TransverseSweep::range(2.0, 1.0, 0.1).expect_err("reversed range must fail");
        assert_eq!(
            err,
            FofError::InvalidSweepRange {
                start: 2.0,
                stop: 1.0
            }
        );
    }

    #[test]
    fn explicit_values_keep_order_and_reject_empty() {
        let sweep = TransverseSweep::from_values(vec![1.5, 0.2]).expect("list must build");
        assert_eq!(sweep.values(), &[1.5, 0.2]);
        assert_eq!(
            TransverseSweep::from_values(Vec::new()),
            Err(FofError::EmptySweep)
        );
    }

    #[rstest]
    #[case::negative_los(-1.0, 0.5, "line-of-sight")]
    #[case::nan_trans(500.0, f64::NAN, "transverse")]
    #[case::infinite_trans(500.0, f64::INFINITY, "transverse")]
    fn linking_lengths_reject_invalid_values(
        #[case] los: f64,
        #[case] trans: f64,
        #[case] expected: &str,
    ) {
        let err = LinkingLengths::new(los, trans).expect_err("lengths must be rejected");
        match err {
            FofError::InvalidLinkingLength { parameter, .. } => assert_eq!(parameter, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn admits_is_inclusive_on_both_thresholds() {
        let lengths = LinkingLengths::new(500.0, 1.0).expect("lengths are valid");
        assert!(lengths.admits(500.0, 1.0));
        assert!(!lengths.admits(500.000_001, 0.0));
        assert!(!lengths.admits(0.0, 1.000_001));
    }

    #[rstest]
    #[case(500.0, 0.1, "500_0.1")]
    #[case(500.0, 2.0, "500_2")]
    #[case(350.5, 1.5, "350.5_1.5")]
    fn display_renders_file_label(#[case] los: f64, #[case] trans: f64, #[case] expected: &str) {
        let lengths = LinkingLengths::new(los, trans).expect("lengths are valid");
        assert_eq!(lengths.to_string(), expected);
    }
}
