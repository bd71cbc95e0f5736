//! Redshift-space separation metric.
//!
//! Galaxies are compared along two independent axes: the line-of-sight
//! velocity difference and the projected transverse separation. The
//! transverse separation multiplies the great-circle angle between the two
//! sky positions by the mean of their transverse comoving distances.

use crate::{error::MetricError, galaxy::Galaxy};

/// Controls how the inverse cosine argument of the angular separation is
/// bounded.
///
/// Rounding in `sin·sin + cos·cos·cos` can push the argument marginally past
/// ±1 for coincident or antipodal positions.
///
/// # Examples
/// ```
/// use fofgroups_core::ClampMode;
///
/// assert_eq!(ClampMode::default(), ClampMode::Symmetric);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClampMode {
    /// Clamp the argument into `[-1, 1]`.
    #[default]
    Symmetric,
    /// Clamp only the upper bound, matching the historical reference
    /// pipeline. Arguments below `-1` are reported as
    /// [`MetricError::OutOfDomain`] instead of producing NaN.
    UpperOnly,
}

/// Returns the absolute line-of-sight velocity difference `|v1 - v2|`.
///
/// # Examples
/// ```
/// use fofgroups_core::line_of_sight_separation;
///
/// assert_eq!(line_of_sight_separation(100.0, 600.0), 500.0);
/// assert_eq!(line_of_sight_separation(600.0, 100.0), 500.0);
/// ```
#[must_use]
pub fn line_of_sight_separation(v1: f64, v2: f64) -> f64 {
    (v1 - v2).abs()
}

/// Returns the great-circle angle in radians between two sky positions.
///
/// `theta = arccos(sin(dec1)·sin(dec2) + cos(dec1)·cos(dec2)·cos(ra1 - ra2))`
///
/// # Errors
/// Returns [`MetricError::OutOfDomain`] when `clamp` is
/// [`ClampMode::UpperOnly`] and the argument falls below `-1`.
///
/// # Examples
/// ```
/// use std::f64::consts::FRAC_PI_2;
/// use fofgroups_core::{ClampMode, MetricError, angular_separation};
///
/// let theta = angular_separation(0.0, 0.0, 0.0, FRAC_PI_2, ClampMode::Symmetric)?;
/// assert!((theta - FRAC_PI_2).abs() < 1e-12);
/// # Ok::<(), MetricError>(())
/// ```
pub fn angular_separation(
    dec1: f64,
    ra1: f64,
    dec2: f64,
    ra2: f64,
    clamp: ClampMode,
) -> Result<f64, MetricError> {
    let cosine = dec1.sin() * dec2.sin() + dec1.cos() * dec2.cos() * (ra1 - ra2).cos();
    Ok(clamp_cosine(cosine, clamp)?.acos())
}

/// Returns the projected transverse separation in Mpc between two galaxies.
///
/// The separation is `theta · (d1 + d2) / 2` where `d1` and `d2` are the
/// transverse comoving distances.
///
/// # Errors
/// Propagates [`MetricError`] from [`angular_separation`].
///
/// # Examples
/// ```
/// use fofgroups_core::{ClampMode, Galaxy, GalaxyId, MetricError, transverse_separation};
///
/// let a = Galaxy::new(GalaxyId::new(1), 0.0, 0.0, 0.0, 100.0);
/// let b = Galaxy::new(GalaxyId::new(2), 0.01, 0.0, 0.0, 300.0);
/// let separation = transverse_separation(&a, &b, ClampMode::Symmetric)?;
/// assert!((separation - 2.0).abs() < 1e-9);
/// # Ok::<(), MetricError>(())
/// ```
pub fn transverse_separation(
    left: &Galaxy,
    right: &Galaxy,
    clamp: ClampMode,
) -> Result<f64, MetricError> {
    let theta = angular_separation(left.dec(), left.ra(), right.dec(), right.ra(), clamp)?;
    Ok(theta * (left.transverse_distance() + right.transverse_distance()) / 2.0)
}

fn clamp_cosine(cosine: f64, clamp: ClampMode) -> Result<f64, MetricError> {
    match clamp {
        ClampMode::Symmetric => Ok(cosine.clamp(-1.0, 1.0)),
        ClampMode::UpperOnly => {
            let bounded = cosine.min(1.0);
            if bounded < -1.0 {
                Err(MetricError::OutOfDomain { cosine })
            } else {
                Ok(bounded)
            }
        }
    }
}
