//! Validation of the fixed overrides supplied by the caller.
//!
//! Range checks run first, then the relational checks between the overrides
//! that are set. Every violated rule is collected so the caller sees all
//! problems at once.

use crate::{
    error::{ValidationError, ValidationReport},
    limits::{MAX_INSERTION_JOBS, MAX_ONE_SIDED_CABLES, MAX_SIDE_CABLES, MAX_TWO_SIDED_CABLES},
};

/// Optional fixed values for the cable-related meta variables.
///
/// `None` means the value is sampled per record.
///
/// # Examples
/// ```
/// use ctw_core::Overrides;
///
/// let overrides = Overrides {
///     insertion_jobs: Some(50),
///     ..Overrides::default()
/// };
/// assert!(overrides.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Overrides {
    /// Fixed insertion jobs `k`.
    pub insertion_jobs: Option<i64>,
    /// Fixed two-sided cables `B`.
    pub two_sided_cables: Option<i64>,
    /// Fixed one-sided cables `O`.
    pub one_sided_cables: Option<i64>,
    /// Fixed side cables.
    pub side_cables: Option<i64>,
}

/// Overrides that passed validation, narrowed to their unsigned domain.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FixedValues {
    /// Fixed insertion jobs `k`.
    pub insertion_jobs: Option<u32>,
    /// Fixed two-sided cables `B`.
    pub two_sided_cables: Option<u32>,
    /// Fixed one-sided cables `O`.
    pub one_sided_cables: Option<u32>,
    /// Fixed side cables.
    pub side_cables: Option<u32>,
}

impl Overrides {
    /// Checks the range and relational constraints of the set overrides.
    ///
    /// # Errors
    /// Returns a [`ValidationReport`] listing every violated constraint.
    ///
    /// # Examples
    /// ```
    /// use ctw_core::{Overrides, ValidationErrorCode};
    ///
    /// let overrides = Overrides {
    ///     two_sided_cables: Some(3),
    ///     side_cables: Some(5),
    ///     ..Overrides::default()
    /// };
    /// let report = overrides.validate().expect_err("5 side cables need 5 two-sided cables");
    /// assert!(report.contains(ValidationErrorCode::SideCablesExceedTwoSidedCables));
    /// ```
    pub fn validate(&self) -> Result<FixedValues, ValidationReport> {
        let mut violations = Vec::new();
        self.check_ranges(&mut violations);
        self.check_relations(&mut violations);
        if !violations.is_empty() {
            return Err(ValidationReport::new(violations));
        }
        Ok(FixedValues {
            insertion_jobs: narrow(self.insertion_jobs),
            two_sided_cables: narrow(self.two_sided_cables),
            one_sided_cables: narrow(self.one_sided_cables),
            side_cables: narrow(self.side_cables),
        })
    }

    fn check_ranges(&self, violations: &mut Vec<ValidationError>) {
        if let Some(value) = self.insertion_jobs {
            if !(1..=i64::from(MAX_INSERTION_JOBS)).contains(&value) {
                violations.push(ValidationError::InsertionJobsOutOfRange { value });
            }
        }
        if let Some(value) = self.two_sided_cables {
            if !(0..=i64::from(MAX_TWO_SIDED_CABLES)).contains(&value) {
                violations.push(ValidationError::TwoSidedCablesOutOfRange { value });
            }
        }
        if let Some(value) = self.one_sided_cables {
            if !(0..=i64::from(MAX_ONE_SIDED_CABLES)).contains(&value) {
                violations.push(ValidationError::OneSidedCablesOutOfRange { value });
            }
        }
        if let Some(value) = self.side_cables {
            if !(0..=i64::from(MAX_SIDE_CABLES)).contains(&value) {
                violations.push(ValidationError::SideCablesOutOfRange { value });
            }
        }
    }

    fn check_relations(&self, violations: &mut Vec<ValidationError>) {
        match (
            self.insertion_jobs,
            self.two_sided_cables,
            self.one_sided_cables,
        ) {
            (Some(insertion_jobs), Some(two_sided_cables), Some(one_sided_cables)) => {
                if insertion_jobs != insertion_jobs_of(two_sided_cables, one_sided_cables) {
                    violations.push(ValidationError::InsertionJobsMismatch {
                        insertion_jobs,
                        two_sided_cables,
                        one_sided_cables,
                    });
                }
            }
            (Some(insertion_jobs), Some(two_sided_cables), None) => {
                if insertion_jobs_of(two_sided_cables, 0) > insertion_jobs {
                    violations.push(ValidationError::TwoSidedCablesExceedInsertionJobs {
                        insertion_jobs,
                        two_sided_cables,
                    });
                }
            }
            (Some(insertion_jobs), None, Some(one_sided_cables)) => {
                if one_sided_cables > insertion_jobs {
                    violations.push(ValidationError::OneSidedCablesExceedInsertionJobs {
                        insertion_jobs,
                        one_sided_cables,
                    });
                }
                if insertion_jobs.wrapping_sub(one_sided_cables).rem_euclid(2) != 0 {
                    violations.push(ValidationError::OddTwoSidedRemainder {
                        insertion_jobs,
                        one_sided_cables,
                    });
                }
            }
            (None, Some(two_sided_cables), one_sided_cables) => {
                let one_sided_cables = one_sided_cables.unwrap_or(0);
                let insertion_jobs = insertion_jobs_of(two_sided_cables, one_sided_cables);
                if insertion_jobs > i64::from(MAX_INSERTION_JOBS) {
                    violations.push(ValidationError::CablesExceedInsertionJobLimit {
                        two_sided_cables,
                        one_sided_cables,
                    });
                }
            }
            _ => {}
        }

        let Some(side_cables) = self.side_cables else {
            return;
        };
        match (self.two_sided_cables, self.insertion_jobs) {
            (Some(two_sided_cables), _) => {
                if side_cables > two_sided_cables {
                    violations.push(ValidationError::SideCablesExceedTwoSidedCables {
                        side_cables,
                        two_sided_cables,
                    });
                }
            }
            (None, Some(insertion_jobs)) => {
                let one_sided_cables = self.one_sided_cables.unwrap_or(0);
                if insertion_jobs < insertion_jobs_of(side_cables, one_sided_cables) {
                    violations.push(ValidationError::SideCablesExceedInsertionJobs {
                        insertion_jobs,
                        side_cables,
                        one_sided_cables,
                    });
                }
            }
            (None, None) => {}
        }
    }
}

/// `2B + O`, saturating for overrides far outside their range.
const fn insertion_jobs_of(two_sided_cables: i64, one_sided_cables: i64) -> i64 {
    two_sided_cables.saturating_mul(2).saturating_add(one_sided_cables)
}

/// Narrows a validated override; range checks guarantee the conversion.
fn narrow(value: Option<i64>) -> Option<u32> {
    value.and_then(|raw| u32::try_from(raw).ok())
}
