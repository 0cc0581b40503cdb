//! Free cavities of the central plug.
//!
//! A candidate is drawn from the insertion-job model, nudged by the housing
//! types and finally fitted into the 95-cavity central plug.

use rand::{Rng, RngCore};

use crate::{
    error::RejectionReason,
    limits::CENTRAL_PLUG_CAPACITY,
    rules::{Rule, RuleTable},
};

/// Housing counts whose instances rarely leave fewer than ten central
/// cavities free.
const BIASED_HOUSINGS: std::ops::RangeInclusive<u32> = 11..=13;

/// Inputs of the central-cavity model.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CentralCavityContext {
    /// Insertion jobs `k`.
    pub insertion_jobs: u32,
    /// Normal housings.
    pub housings: u32,
    /// Distinct housing types.
    pub housing_types: u32,
    /// Two-sided cables `B`.
    pub two_sided_cables: u32,
    /// Side cables.
    pub side_cables: u32,
}

impl CentralCavityContext {
    /// Two-sided cable ends plugged into the central plug.
    #[must_use]
    pub const fn central_load(&self) -> u32 {
        self.two_sided_cables.saturating_sub(self.side_cables)
    }
}

static CANDIDATE_RULES: [Rule<CentralCavityContext, u32>; 4] = [
    Rule {
        label: "tiny",
        applies: tiny,
        draw: draw_tiny,
    },
    Rule {
        label: "small",
        applies: small,
        draw: draw_small,
    },
    Rule {
        label: "medium",
        applies: medium,
        draw: draw_medium,
    },
    Rule {
        label: "large",
        applies: large,
        draw: draw_large,
    },
];

/// Candidate model keyed on insertion jobs.
pub static CENTRAL_CAVITIES: RuleTable<CentralCavityContext, u32> =
    RuleTable::new("central_cavities", &CANDIDATE_RULES);

/// Draws the free central cavities of a record.
///
/// # Errors
/// Returns [`RejectionReason::SingleHousingOverflow`] or
/// [`RejectionReason::CentralPlugOverflow`] when the cables alone overfill
/// the central plug.
pub fn sample_central_cavities(
    context: &CentralCavityContext,
    rng: &mut dyn RngCore,
) -> Result<u32, RejectionReason> {
    let candidate = CENTRAL_CAVITIES.evaluate(context, rng)?;
    let candidate = adjust_for_housing_types(context, candidate, rng);
    enforce_capacity(context, candidate, rng)
}

/// Redraws candidates that are implausible for the record's housing types.
pub fn adjust_for_housing_types(
    context: &CentralCavityContext,
    candidate: u32,
    rng: &mut dyn RngCore,
) -> u32 {
    if context.housing_types == 1 && candidate > 14 {
        rng.gen_range(0..=14)
    } else if context.housing_types > 7 && candidate < 18 {
        rng.gen_range(18..=47)
    } else {
        candidate
    }
}

/// Fits the candidate into the central plug.
///
/// # Errors
/// Returns a rejection when no non-negative candidate fits.
pub fn enforce_capacity(
    context: &CentralCavityContext,
    candidate: u32,
    rng: &mut dyn RngCore,
) -> Result<u32, RejectionReason> {
    if context.housings == 1 {
        return fit_single_housing(context.insertion_jobs, candidate, rng);
    }
    let candidate = if BIASED_HOUSINGS.contains(&context.housings)
        && candidate < 10
        && rng.gen_bool(0.9)
    {
        rng.gen_range(10..=40)
    } else {
        candidate
    };
    fit_central_plug(context.central_load(), candidate)
}

/// With a single housing every insertion job lands in the central plug.
fn fit_single_housing(
    insertion_jobs: u32,
    candidate: u32,
    rng: &mut dyn RngCore,
) -> Result<u32, RejectionReason> {
    if candidate + insertion_jobs <= CENTRAL_PLUG_CAPACITY {
        return Ok(candidate);
    }
    let reduced = CENTRAL_PLUG_CAPACITY
        .checked_sub(insertion_jobs)
        .ok_or(RejectionReason::SingleHousingOverflow { insertion_jobs })?;
    if reduced > 12 {
        Ok(rng.gen_range(0..=10))
    } else {
        Ok(reduced)
    }
}

fn fit_central_plug(central_load: u32, candidate: u32) -> Result<u32, RejectionReason> {
    if candidate + central_load <= CENTRAL_PLUG_CAPACITY {
        return Ok(candidate);
    }
    CENTRAL_PLUG_CAPACITY
        .checked_sub(central_load)
        .ok_or(RejectionReason::CentralPlugOverflow { central_load })
}

const fn tiny(context: &CentralCavityContext) -> bool {
    context.insertion_jobs < 6
}

const fn small(context: &CentralCavityContext) -> bool {
    context.insertion_jobs < 70
}

const fn medium(context: &CentralCavityContext) -> bool {
    context.insertion_jobs < 86
}

const fn large(_: &CentralCavityContext) -> bool {
    true
}

fn draw_tiny(_: &CentralCavityContext, rng: &mut dyn RngCore) -> u32 {
    if rng.gen_bool(0.75) {
        rng.gen_range(0..=19)
    } else {
        rng.gen_range(20..=39)
    }
}

fn draw_small(_: &CentralCavityContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(0..=47)
}

fn draw_medium(_: &CentralCavityContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(0..=19)
}

fn draw_large(_: &CentralCavityContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(0..=14)
}
