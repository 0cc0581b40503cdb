//! Structural invariant checks for generated records.
//!
//! The checks are public so downstream tooling can audit tables produced by
//! other runs, and so property tests can assert record health without
//! restating the domain limits.

use thiserror::Error;

use crate::{
    MetaVariableRecord,
    limits::{
        CENTRAL_PLUG_CAPACITY, INSTANCE_CAVITY_CAPACITY, MAX_HOUSINGS, MAX_INSERTION_JOBS,
        MAX_ONE_SIDED_CABLES, MAX_SIDE_CABLES, MAX_TWO_SIDED_CABLES,
    },
};

/// Below this many insertion jobs the housing count may exceed `floor(k / 2)`.
const SMALL_INSTANCE_JOBS: u32 = 5;

/// Reports the first invariant a record violates.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum InvariantViolation {
    /// `k` fell outside `1..=198`.
    #[error("insertion jobs {insertion_jobs} outside 1..={MAX_INSERTION_JOBS}")]
    InsertionJobs {
        /// Observed `k`.
        insertion_jobs: u32,
    },
    /// A cable count exceeded its range.
    #[error("{field} is {value}, above {limit}")]
    CableRange {
        /// Column name of the offending field.
        field: &'static str,
        /// Observed value.
        value: u32,
        /// Largest permitted value.
        limit: u32,
    },
    /// More side cables than two-sided cables.
    #[error("side cables {side_cables} exceed two-sided cables {two_sided_cables}")]
    SideCables {
        /// Observed side cables.
        side_cables: u32,
        /// Observed two-sided cables.
        two_sided_cables: u32,
    },
    /// Housing count outside its permitted range.
    #[error("housings {housings} outside 1..={limit}")]
    Housings {
        /// Observed housings.
        housings: u32,
        /// Largest permitted housing count for the record.
        limit: u32,
    },
    /// Housing types outside `1..=housings`.
    #[error("housing types {housing_types} outside 1..={housings}")]
    HousingTypes {
        /// Observed housing types.
        housing_types: u32,
        /// Observed housings.
        housings: u32,
    },
    /// Central plug holds more than 95 cavities.
    #[error("central plug needs {needed} cavities, above {CENTRAL_PLUG_CAPACITY}")]
    CentralCapacity {
        /// Free central cavities plus the central load.
        needed: u32,
    },
    /// Instance holds more than 260 cavities.
    #[error("instance needs {needed} cavities, above {INSTANCE_CAVITY_CAPACITY}")]
    InstanceCapacity {
        /// Free normal cavities plus needed central and small cavities.
        needed: u32,
    },
}

/// Checks `record` against every record invariant.
///
/// # Errors
/// Returns the first [`InvariantViolation`] found.
///
/// # Examples
/// ```
/// use ctw_core::{MetaVariableRecord, invariants};
///
/// let record = MetaVariableRecord {
///     two_sided_cables: 10,
///     one_sided_cables: 0,
///     side_cables: 0,
///     housings: 3,
///     housing_types: 2,
///     free_central_cavities: 20,
///     free_normal_cavities: 15,
/// };
/// assert!(invariants::check(&record).is_ok());
/// ```
pub fn check(record: &MetaVariableRecord) -> Result<(), InvariantViolation> {
    check_cables(record)?;
    check_housings(record)?;
    check_cavities(record)
}

fn check_cables(record: &MetaVariableRecord) -> Result<(), InvariantViolation> {
    let insertion_jobs = record.insertion_jobs();
    if insertion_jobs == 0 || insertion_jobs > MAX_INSERTION_JOBS {
        return Err(InvariantViolation::InsertionJobs { insertion_jobs });
    }
    let ranges = [
        ("numTwoSidedCables", record.two_sided_cables, MAX_TWO_SIDED_CABLES),
        ("numOneSidedCables", record.one_sided_cables, MAX_ONE_SIDED_CABLES),
        ("numSideCables", record.side_cables, MAX_SIDE_CABLES),
    ];
    for (field, value, limit) in ranges {
        if value > limit {
            return Err(InvariantViolation::CableRange {
                field,
                value,
                limit,
            });
        }
    }
    if record.side_cables > record.two_sided_cables {
        return Err(InvariantViolation::SideCables {
            side_cables: record.side_cables,
            two_sided_cables: record.two_sided_cables,
        });
    }
    Ok(())
}

fn check_housings(record: &MetaVariableRecord) -> Result<(), InvariantViolation> {
    let insertion_jobs = record.insertion_jobs();
    let limit = if insertion_jobs < SMALL_INSTANCE_JOBS {
        MAX_HOUSINGS
    } else {
        MAX_HOUSINGS.min(insertion_jobs / 2)
    };
    if record.housings == 0 || record.housings > limit {
        return Err(InvariantViolation::Housings {
            housings: record.housings,
            limit,
        });
    }
    if record.housing_types == 0 || record.housing_types > record.housings {
        return Err(InvariantViolation::HousingTypes {
            housing_types: record.housing_types,
            housings: record.housings,
        });
    }
    Ok(())
}

fn check_cavities(record: &MetaVariableRecord) -> Result<(), InvariantViolation> {
    let central_load = if record.housings == 1 {
        record.insertion_jobs()
    } else {
        record.central_load()
    };
    let needed_central = record.free_central_cavities + central_load;
    if needed_central > CENTRAL_PLUG_CAPACITY {
        return Err(InvariantViolation::CentralCapacity {
            needed: needed_central,
        });
    }
    let needed = record.free_normal_cavities
        + record.needed_central_cavities()
        + record.needed_small_cavities();
    if needed > INSTANCE_CAVITY_CAPACITY {
        return Err(InvariantViolation::InstanceCapacity { needed });
    }
    Ok(())
}
