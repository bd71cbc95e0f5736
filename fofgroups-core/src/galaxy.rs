//! Per-object input records.

use std::fmt;

/// Catalog identifier of a galaxy (`CATAID`).
///
/// # Examples
/// ```
/// use fofgroups_core::GalaxyId;
///
/// let id = GalaxyId::new(6802);
/// assert_eq!(id.get(), 6802);
/// assert_eq!(id.to_string(), "6802");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GalaxyId(u64);

impl GalaxyId {
    /// Creates a new galaxy identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for GalaxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GalaxyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A galaxy with the precomputed quantities the linking metric needs.
///
/// Sky coordinates are in radians, the line-of-sight velocity is
/// `c * ln(1 + z)` in km/s and the transverse comoving distance is in Mpc.
///
/// # Examples
/// ```
/// use fofgroups_core::{Galaxy, GalaxyId};
///
/// let galaxy = Galaxy::new(GalaxyId::new(1), 0.5, -0.1, 30_000.0, 420.0);
/// assert_eq!(galaxy.id(), GalaxyId::new(1));
/// assert_eq!(galaxy.line_of_sight_velocity(), 30_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galaxy {
    id: GalaxyId,
    ra: f64,
    dec: f64,
    line_of_sight_velocity: f64,
    transverse_distance: f64,
}

impl Galaxy {
    /// Creates a galaxy record.
    ///
    /// Values are validated when the galaxy is added to a [`crate::Catalog`].
    #[must_use]
    pub const fn new(
        id: GalaxyId,
        ra: f64,
        dec: f64,
        line_of_sight_velocity: f64,
        transverse_distance: f64,
    ) -> Self {
        Self {
            id,
            ra,
            dec,
            line_of_sight_velocity,
            transverse_distance,
        }
    }

    /// Returns the catalog identifier.
    #[must_use]
    pub const fn id(&self) -> GalaxyId {
        self.id
    }

    /// Returns the right ascension in radians.
    #[must_use]
    pub const fn ra(&self) -> f64 {
        self.ra
    }

    /// Returns the declination in radians.
    #[must_use]
    pub const fn dec(&self) -> f64 {
        self.dec
    }

    /// Returns the line-of-sight recession velocity in km/s.
    #[must_use]
    pub const fn line_of_sight_velocity(&self) -> f64 {
        self.line_of_sight_velocity
    }

    /// Returns the transverse comoving distance in Mpc.
    #[must_use]
    pub const fn transverse_distance(&self) -> f64 {
        self.transverse_distance
    }
}
