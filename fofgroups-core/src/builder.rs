//! Builder utilities for configuring friends-of-friends runs.
//!
//! Collects the fixed line-of-sight linking length together with the metric
//! and neighbour-enumeration options, and validates them before constructing
//! a [`FriendsOfFriends`] instance.

use crate::{
    Result, fof::FriendsOfFriends, linking::validate_length, metric::ClampMode,
    pairs::PairStrategy,
};

/// Default line-of-sight velocity linking length in km/s.
pub(crate) const DEFAULT_LINE_OF_SIGHT: f64 = 500.0;

/// Configures and constructs [`FriendsOfFriends`] instances.
///
/// # Examples
/// ```
/// use fofgroups_core::{ClampMode, FriendsOfFriendsBuilder, PairStrategy};
///
/// let fof = FriendsOfFriendsBuilder::new()
///     .with_line_of_sight(350.0)
///     .with_pair_strategy(PairStrategy::BruteForce)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(fof.line_of_sight(), 350.0);
/// assert_eq!(fof.pair_strategy(), PairStrategy::BruteForce);
/// assert_eq!(fof.clamp_mode(), ClampMode::Symmetric);
/// ```
#[derive(Debug, Clone)]
pub struct FriendsOfFriendsBuilder {
    line_of_sight: f64,
    clamp_mode: ClampMode,
    pair_strategy: PairStrategy,
}

impl Default for FriendsOfFriendsBuilder {
    fn default() -> Self {
        Self {
            line_of_sight: DEFAULT_LINE_OF_SIGHT,
            clamp_mode: ClampMode::default(),
            pair_strategy: PairStrategy::default(),
        }
    }
}

impl FriendsOfFriendsBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use fofgroups_core::{ClampMode, FriendsOfFriendsBuilder, PairStrategy};
    ///
    /// let builder = FriendsOfFriendsBuilder::new();
    /// assert_eq!(builder.line_of_sight(), 500.0);
    /// assert_eq!(builder.clamp_mode(), ClampMode::Symmetric);
    /// assert_eq!(builder.pair_strategy(), PairStrategy::VelocityWindow);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the line-of-sight velocity linking length.
    #[must_use]
    pub fn with_line_of_sight(mut self, line_of_sight: f64) -> Self {
        self.line_of_sight = line_of_sight;
        self
    }

    /// Returns the configured line-of-sight velocity linking length.
    #[must_use]
    pub fn line_of_sight(&self) -> f64 {
        self.line_of_sight
    }

    /// Selects how the inverse cosine argument is clamped.
    ///
    /// # Examples
    /// ```
    /// use fofgroups_core::{ClampMode, FriendsOfFriendsBuilder};
    ///
    /// let builder = FriendsOfFriendsBuilder::new().with_clamp_mode(ClampMode::UpperOnly);
    /// assert_eq!(builder.clamp_mode(), ClampMode::UpperOnly);
    /// ```
    #[must_use]
    pub fn with_clamp_mode(mut self, clamp_mode: ClampMode) -> Self {
        self.clamp_mode = clamp_mode;
        self
    }

    /// Returns the configured clamp mode.
    #[must_use]
    pub fn clamp_mode(&self) -> ClampMode {
        self.clamp_mode
    }

    /// Selects how candidate neighbours are enumerated.
    #[must_use]
    pub fn with_pair_strategy(mut self, pair_strategy: PairStrategy) -> Self {
        self.pair_strategy = pair_strategy;
        self
    }

    /// Returns the configured pair strategy.
    #[must_use]
    pub fn pair_strategy(&self) -> PairStrategy {
        self.pair_strategy
    }

    /// Validates the configuration and constructs a [`FriendsOfFriends`]
    /// instance.
    ///
    /// # Errors
    /// Returns [`crate::FofError::InvalidLinkingLength`] when the
    /// line-of-sight linking length is negative, NaN, or infinite.
    ///
    /// # Examples
    /// ```
    /// use fofgroups_core::{FofErrorCode, FriendsOfFriendsBuilder};
    ///
    /// let err = FriendsOfFriendsBuilder::new()
    ///     .with_line_of_sight(-1.0)
    ///     .build()
    ///     .expect_err("negative linking length must be rejected");
    /// assert_eq!(err.code(), FofErrorCode::InvalidLinkingLength);
    /// ```
    pub fn build(self) -> Result<FriendsOfFriends> {
        validate_length("line-of-sight", self.line_of_sight)?;
        Ok(FriendsOfFriends::new(
            self.line_of_sight,
            self.clamp_mode,
            self.pair_strategy,
        ))
    }
}
