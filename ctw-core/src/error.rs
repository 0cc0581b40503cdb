//! Error types for the CTW meta-variable generator.
//!
//! Defines the validation, per-record rejection, and run-level error enums
//! exposed by the public API together with their stable error codes.

use std::fmt;

use thiserror::Error;

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

/// A fixed override that violates a range or relational constraint.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// Fixed insertion-job count outside `1..=198`.
    #[error("insertion jobs must lie in 1..=198 (got {value})")]
    InsertionJobsOutOfRange {
        /// The rejected value.
        value: i64,
    },
    /// Fixed two-sided cable count outside `0..=100`.
    #[error("two-sided cables must lie in 0..=100 (got {value})")]
    TwoSidedCablesOutOfRange {
        /// The rejected value.
        value: i64,
    },
    /// Fixed one-sided cable count outside `0..=20`.
    #[error("one-sided cables must lie in 0..=20 (got {value})")]
    OneSidedCablesOutOfRange {
        /// The rejected value.
        value: i64,
    },
    /// Fixed side-cable count outside `0..=65`.
    #[error("side cables must lie in 0..=65 (got {value})")]
    SideCablesOutOfRange {
        /// The rejected value.
        value: i64,
    },
    /// `k`, `B` and `O` were all fixed but `k != 2B + O`.
    #[error(
        "insertion jobs ({insertion_jobs}) must equal 2 * two-sided cables ({two_sided_cables}) + one-sided cables ({one_sided_cables})"
    )]
    InsertionJobsMismatch {
        /// Fixed insertion-job count.
        insertion_jobs: i64,
        /// Fixed two-sided cable count.
        two_sided_cables: i64,
        /// Fixed one-sided cable count.
        one_sided_cables: i64,
    },
    /// `k` and `B` were fixed but `2B > k`.
    #[error(
        "two-sided cables ({two_sided_cables}) are too many for {insertion_jobs} insertion jobs; 2 * two-sided cables must not exceed insertion jobs"
    )]
    TwoSidedCablesExceedInsertionJobs {
        /// Fixed insertion-job count.
        insertion_jobs: i64,
        /// Fixed two-sided cable count.
        two_sided_cables: i64,
    },
    /// `k` and `O` were fixed but `O > k`.
    #[error(
        "one-sided cables ({one_sided_cables}) cannot exceed insertion jobs ({insertion_jobs})"
    )]
    OneSidedCablesExceedInsertionJobs {
        /// Fixed insertion-job count.
        insertion_jobs: i64,
        /// Fixed one-sided cable count.
        one_sided_cables: i64,
    },
    /// `k` and `O` were fixed but `k - O` is odd.
    #[error(
        "insertion jobs ({insertion_jobs}) minus one-sided cables ({one_sided_cables}) must be even"
    )]
    OddTwoSidedRemainder {
        /// Fixed insertion-job count.
        insertion_jobs: i64,
        /// Fixed one-sided cable count.
        one_sided_cables: i64,
    },
    /// Side cables and `B` were fixed but side cables exceed `B`.
    #[error(
        "side cables ({side_cables}) cannot exceed two-sided cables ({two_sided_cables})"
    )]
    SideCablesExceedTwoSidedCables {
        /// Fixed side-cable count.
        side_cables: i64,
        /// Fixed two-sided cable count.
        two_sided_cables: i64,
    },
    /// `B` was fixed without `k` and `2B + O` exceeds 198 insertion jobs.
    #[error(
        "two-sided cables ({two_sided_cables}) and one-sided cables ({one_sided_cables}) exceed 198 insertion jobs"
    )]
    CablesExceedInsertionJobLimit {
        /// Fixed two-sided cable count.
        two_sided_cables: i64,
        /// Fixed one-sided cable count, or zero when unset.
        one_sided_cables: i64,
    },
    /// Side cables and `k` were fixed but `k < 2 * side cables (+ O)`.
    #[error(
        "insertion jobs ({insertion_jobs}) must be at least 2 * side cables ({side_cables}) + one-sided cables ({one_sided_cables})"
    )]
    SideCablesExceedInsertionJobs {
        /// Fixed insertion-job count.
        insertion_jobs: i64,
        /// Fixed side-cable count.
        side_cables: i64,
        /// Fixed one-sided cable count, or zero when unset.
        one_sided_cables: i64,
    },
}

define_error_codes! {
    /// Stable codes describing [`ValidationError`] variants.
    enum ValidationErrorCode for ValidationError {
        /// Fixed insertion-job count out of range.
        InsertionJobsOutOfRange => InsertionJobsOutOfRange { .. } => "CTW_INSERTION_JOBS_OUT_OF_RANGE",
        /// Fixed two-sided cable count out of range.
        TwoSidedCablesOutOfRange => TwoSidedCablesOutOfRange { .. } => "CTW_TWO_SIDED_OUT_OF_RANGE",
        /// Fixed one-sided cable count out of range.
        OneSidedCablesOutOfRange => OneSidedCablesOutOfRange { .. } => "CTW_ONE_SIDED_OUT_OF_RANGE",
        /// Fixed side-cable count out of range.
        SideCablesOutOfRange => SideCablesOutOfRange { .. } => "CTW_SIDE_CABLES_OUT_OF_RANGE",
        /// `k != 2B + O`.
        InsertionJobsMismatch => InsertionJobsMismatch { .. } => "CTW_INSERTION_JOBS_MISMATCH",
        /// `2B > k`.
        TwoSidedCablesExceedInsertionJobs => TwoSidedCablesExceedInsertionJobs { .. } => "CTW_TWO_SIDED_EXCEEDS_JOBS",
        /// `O > k`.
        OneSidedCablesExceedInsertionJobs => OneSidedCablesExceedInsertionJobs { .. } => "CTW_ONE_SIDED_EXCEEDS_JOBS",
        /// `k - O` is odd.
        OddTwoSidedRemainder => OddTwoSidedRemainder { .. } => "CTW_ODD_TWO_SIDED_REMAINDER",
        /// Side cables exceed `B`.
        SideCablesExceedTwoSidedCables => SideCablesExceedTwoSidedCables { .. } => "CTW_SIDE_CABLES_EXCEED_TWO_SIDED",
        /// Fixed `B` and `O` exceed the insertion-job limit.
        CablesExceedInsertionJobLimit => CablesExceedInsertionJobLimit { .. } => "CTW_CABLES_EXCEED_JOB_LIMIT",
        /// Side cables exceed what `k` allows.
        SideCablesExceedInsertionJobs => SideCablesExceedInsertionJobs { .. } => "CTW_SIDE_CABLES_EXCEED_JOBS",
    }
}

/// Every constraint violated by a set of overrides, in checking order.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid overrides: {}", join_violations(.violations))]
pub struct ValidationReport {
    violations: Vec<ValidationError>,
}

impl ValidationReport {
    pub(crate) const fn new(violations: Vec<ValidationError>) -> Self {
        Self { violations }
    }

    /// Returns the violated constraints.
    #[must_use]
    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    /// Returns `true` when the report contains a violation with `code`.
    #[must_use]
    pub fn contains(&self, code: ValidationErrorCode) -> bool {
        self.violations.iter().any(|violation| violation.code() == code)
    }
}

fn join_violations(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why the sampling pipeline could not complete a single record.
///
/// Rejections are returned as values so the caller chooses between aborting
/// the run and resampling the record (see [`crate::CapacityPolicy`]).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum RejectionReason {
    /// A single housing configuration needs more than 95 central cavities.
    #[error(
        "a single housing cannot host {insertion_jobs} insertion jobs within 95 central cavities"
    )]
    SingleHousingOverflow {
        /// Insertion jobs that had to fit into the central plug.
        insertion_jobs: u32,
    },
    /// More than 95 two-sided cable ends land in the central plug.
    #[error("central plug cannot take {central_load} two-sided cable ends (limit 95)")]
    CentralPlugOverflow {
        /// Two-sided cables minus side cables.
        central_load: u32,
    },
    /// Needed central and small cavities already exceed 260.
    #[error("{needed} required cavities exceed the instance limit of 260")]
    NormalCavityOverflow {
        /// Needed central plus needed small cavities.
        needed: u32,
    },
    /// A fixed side-cable count exceeds the record's two-sided cables.
    #[error(
        "fixed side cables ({side_cables}) exceed the sampled two-sided cables ({two_sided_cables})"
    )]
    SideCablesExceedTwoSided {
        /// Fixed side-cable count.
        side_cables: u32,
        /// Two-sided cables of the record.
        two_sided_cables: u32,
    },
    /// The record's cables need more than 198 insertion jobs.
    #[error("{insertion_jobs} insertion jobs exceed the limit of 198")]
    InsertionJobsExceedLimit {
        /// Insertion jobs `2B + O` of the draw.
        insertion_jobs: u32,
    },
    /// The record drew zero cables altogether.
    #[error("record has no insertion jobs")]
    NoInsertionJobs,
    /// No rule of a piecewise model matched the record.
    #[error("no rule of `{table}` matched the record")]
    RuleTableExhausted {
        /// Name of the exhausted rule table.
        table: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`RejectionReason`] variants.
    enum RejectionReasonCode for RejectionReason {
        /// Single housing over capacity.
        SingleHousingOverflow => SingleHousingOverflow { .. } => "CTW_SINGLE_HOUSING_OVERFLOW",
        /// Central plug over capacity.
        CentralPlugOverflow => CentralPlugOverflow { .. } => "CTW_CENTRAL_PLUG_OVERFLOW",
        /// Instance cavity total over capacity.
        NormalCavityOverflow => NormalCavityOverflow { .. } => "CTW_NORMAL_CAVITY_OVERFLOW",
        /// Fixed side cables exceed two-sided cables.
        SideCablesExceedTwoSided => SideCablesExceedTwoSided { .. } => "CTW_SIDE_CABLES_EXCEED_TWO_SIDED",
        /// More than 198 insertion jobs.
        InsertionJobsExceedLimit => InsertionJobsExceedLimit { .. } => "CTW_INSERTION_JOBS_EXCEED_LIMIT",
        /// Zero insertion jobs.
        NoInsertionJobs => NoInsertionJobs => "CTW_NO_INSERTION_JOBS",
        /// Rule table without a matching rule.
        RuleTableExhausted => RuleTableExhausted { .. } => "CTW_RULE_TABLE_EXHAUSTED",
    }
}

/// Error type produced when configuring or running [`crate::Generator`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// The fixed overrides failed validation; no record was sampled.
    #[error(transparent)]
    Validation {
        /// Every violated constraint.
        #[from]
        source: ValidationReport,
    },
    /// At least one record must be requested.
    #[error("record count must be at least 1 (got {got})")]
    InvalidRecordCount {
        /// The rejected record count.
        got: usize,
    },
    /// The resample policy needs at least one attempt per record.
    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,
    /// A statistical model rejected its parameters.
    #[error("invalid parameters for the {model} model: {reason}")]
    InvalidModel {
        /// Name of the model that failed to build.
        model: &'static str,
        /// Error reported by the distribution constructor.
        reason: String,
    },
    /// A record was rejected under [`crate::CapacityPolicy::Abort`].
    #[error("record {record} rejected: {reason}")]
    Rejected {
        /// Zero-based index of the rejected record.
        record: usize,
        /// Why the record was rejected.
        reason: RejectionReason,
    },
    /// A record kept being rejected under [`crate::CapacityPolicy::Resample`].
    #[error("record {record} rejected {attempts} times; last reason: {last}")]
    AttemptsExhausted {
        /// Zero-based index of the record.
        record: usize,
        /// Attempts made before giving up.
        attempts: u32,
        /// Reason reported by the final attempt.
        last: RejectionReason,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// Overrides failed validation.
        Validation => Validation { .. } => "CTW_INVALID_OVERRIDES",
        /// Record count was zero.
        InvalidRecordCount => InvalidRecordCount { .. } => "CTW_INVALID_RECORD_COUNT",
        /// Resample policy with zero attempts.
        InvalidMaxAttempts => InvalidMaxAttempts => "CTW_INVALID_MAX_ATTEMPTS",
        /// Model parameters rejected.
        InvalidModel => InvalidModel { .. } => "CTW_INVALID_MODEL",
        /// Record rejected under the abort policy.
        Rejected => Rejected { .. } => "CTW_RECORD_REJECTED",
        /// Record rejected on every resample attempt.
        AttemptsExhausted => AttemptsExhausted { .. } => "CTW_ATTEMPTS_EXHAUSTED",
    }
}

impl GenerationError {
    /// Retrieve the inner [`RejectionReasonCode`] when a record was rejected.
    pub const fn rejection_code(&self) -> Option<RejectionReasonCode> {
        match self {
            Self::Rejected { reason, .. } | Self::AttemptsExhausted { last: reason, .. } => {
                Some(reason.code())
            }
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GenerationError>;
