//! Error types for the fofgroups core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::galaxy::GalaxyId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while validating a [`crate::Catalog`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A galaxy carried a NaN or infinite value in a numeric field.
    #[error("galaxy {id} has non-finite `{field}` ({value})")]
    NonFiniteField {
        /// Identifier of the offending galaxy.
        id: GalaxyId,
        /// Name of the field holding the non-finite value.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A galaxy carried a negative transverse comoving distance.
    #[error("galaxy {id} has negative transverse comoving distance ({value})")]
    NegativeDistance {
        /// Identifier of the offending galaxy.
        id: GalaxyId,
        /// The rejected distance.
        value: f64,
    },
    /// Two catalog rows share one identifier.
    #[error("galaxy identifier {id} appears at rows {first_row} and {duplicate_row}")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: GalaxyId,
        /// Zero-based row of the first occurrence.
        first_row: usize,
        /// Zero-based row of the repeated occurrence.
        duplicate_row: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`CatalogError`] variants.
    enum CatalogErrorCode for CatalogError {
        /// A galaxy carried a NaN or infinite value in a numeric field.
        NonFiniteField => NonFiniteField { .. } => "CATALOG_NON_FINITE_FIELD",
        /// A galaxy carried a negative transverse comoving distance.
        NegativeDistance => NegativeDistance { .. } => "CATALOG_NEGATIVE_DISTANCE",
        /// Two catalog rows share one identifier.
        DuplicateIdentifier => DuplicateIdentifier { .. } => "CATALOG_DUPLICATE_IDENTIFIER",
    }
}

/// An error produced by the separation metric.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MetricError {
    /// The inverse cosine argument fell below -1 while only the upper bound
    /// was clamped.
    #[error("angular separation cosine {cosine} lies outside [-1, 1]")]
    OutOfDomain {
        /// Cosine value passed to the inverse cosine.
        cosine: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`MetricError`] variants.
    enum MetricErrorCode for MetricError {
        /// The inverse cosine argument fell outside its domain.
        OutOfDomain => OutOfDomain { .. } => "METRIC_OUT_OF_DOMAIN",
    }
}

/// Error type produced when configuring or running [`crate::FriendsOfFriends`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FofError {
    /// A linking length was negative, NaN, or infinite.
    #[error("{parameter} linking length must be finite and non-negative (got {value})")]
    InvalidLinkingLength {
        /// Which linking length was rejected (`line-of-sight` or `transverse`).
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A transverse sweep step was zero, negative, or non-finite.
    #[error("transverse sweep step must be finite and positive (got {step})")]
    InvalidSweepStep {
        /// The rejected step.
        step: f64,
    },
    /// A transverse sweep range ended before it started.
    #[error("transverse sweep stop {stop} precedes start {start}")]
    InvalidSweepRange {
        /// First value of the range.
        start: f64,
        /// Inclusive upper bound of the range.
        stop: f64,
    },
    /// A transverse sweep contained no values.
    #[error("transverse sweep contains no values")]
    EmptySweep,
    /// A transverse sweep range would generate more values than allowed.
    #[error("transverse sweep range generates more than {limit} values")]
    SweepTooLarge {
        /// Maximum number of values a range may generate.
        limit: usize,
    },
    /// The separation metric rejected a galaxy pair.
    #[error("separation between galaxies {left} and {right} failed: {error}")]
    NumericDomain {
        /// Galaxy whose neighbour scan failed.
        left: GalaxyId,
        /// Candidate neighbour for which the metric failed.
        right: GalaxyId,
        #[source]
        /// Underlying metric error.
        error: MetricError,
    },
    /// The catalog failed validation.
    #[error(transparent)]
    Catalog {
        /// Underlying catalog validation error.
        #[from]
        error: CatalogError,
    },
}

define_error_codes! {
    /// Stable codes describing [`FofError`] variants.
    enum FofErrorCode for FofError {
        /// A linking length was negative, NaN, or infinite.
        InvalidLinkingLength => InvalidLinkingLength { .. } => "FOF_INVALID_LINKING_LENGTH",
        /// A transverse sweep step was zero, negative, or non-finite.
        InvalidSweepStep => InvalidSweepStep { .. } => "FOF_INVALID_SWEEP_STEP",
        /// A transverse sweep range ended before it started.
        InvalidSweepRange => InvalidSweepRange { .. } => "FOF_INVALID_SWEEP_RANGE",
        /// A transverse sweep contained no values.
        EmptySweep => EmptySweep => "FOF_EMPTY_SWEEP",
        /// A transverse sweep range generated too many values.
        SweepTooLarge => SweepTooLarge { .. } => "FOF_SWEEP_TOO_LARGE",
        /// The separation metric rejected a galaxy pair.
        NumericDomain => NumericDomain { .. } => "FOF_NUMERIC_DOMAIN",
        /// The catalog failed validation.
        CatalogFailure => Catalog { .. } => "FOF_CATALOG_FAILURE",
    }
}

impl FofError {
    /// Retrieve the inner [`CatalogErrorCode`] when the error originated in
    /// catalog validation.
    pub const fn catalog_code(&self) -> Option<CatalogErrorCode> {
        match self {
            Self::Catalog { error } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, FofError>;
