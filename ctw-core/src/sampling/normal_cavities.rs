//! Free cavities summed over all normal housings.

use rand::{Rng, RngCore};
use rand_distr::Distribution;

use crate::{
    distributions::{ScaledInverseGaussian, round_count},
    error::{GenerationError, RejectionReason},
    limits::INSTANCE_CAVITY_CAPACITY,
    rules::{Rule, RuleTable},
};

/// Inputs of the normal-cavity model.
#[derive(Clone, Copy, Debug)]
pub struct NormalCavityContext {
    /// Insertion jobs `k`.
    pub insertion_jobs: u32,
    /// Normal housings.
    pub housings: u32,
    /// Distinct housing types.
    pub housing_types: u32,
    /// Cavities occupied in normal housings.
    pub needed_small_cavities: u32,
    /// Central-plug cavities, free ones included.
    pub needed_central_cavities: u32,
    /// Fitted model for lightly loaded instances.
    pub light_load: ScaledInverseGaussian,
}

impl NormalCavityContext {
    /// Cavities the record needs before any free normal cavity.
    #[must_use]
    pub const fn needed_cavities(&self) -> u32 {
        self.needed_small_cavities + self.needed_central_cavities
    }
}

/// Builds the fitted light-load model.
///
/// # Errors
/// Returns [`GenerationError::InvalidModel`] when the parameters are rejected.
pub fn light_load_model() -> Result<ScaledInverseGaussian, GenerationError> {
    ScaledInverseGaussian::new(4.09, -0.41, 1.51).map_err(|reason| GenerationError::InvalidModel {
        model: "free normal cavities",
        reason,
    })
}

static CANDIDATE_RULES: [Rule<NormalCavityContext, u32>; 4] = [
    Rule {
        label: "light",
        applies: light,
        draw: draw_light,
    },
    Rule {
        label: "moderate",
        applies: moderate,
        draw: draw_moderate,
    },
    Rule {
        label: "heavy",
        applies: heavy,
        draw: draw_heavy,
    },
    Rule {
        label: "very_heavy",
        applies: very_heavy,
        draw: draw_very_heavy,
    },
];

/// Candidate model keyed on needed small cavities.
pub static NORMAL_CAVITIES: RuleTable<NormalCavityContext, u32> =
    RuleTable::new("normal_cavities", &CANDIDATE_RULES);

/// Draws the free normal cavities of a record.
///
/// # Errors
/// Returns [`RejectionReason::NormalCavityOverflow`] when the needed cavities
/// alone exceed the instance limit.
pub fn sample_normal_cavities(
    context: &NormalCavityContext,
    rng: &mut dyn RngCore,
) -> Result<u32, RejectionReason> {
    let mut candidate = NORMAL_CAVITIES.evaluate(context, rng)?;
    if context.insertion_jobs < 6 && candidate > 16 {
        candidate = rng.gen_range(0..=16);
    }
    let ceiling = housing_count_ceiling(context.housings);
    if candidate > ceiling {
        candidate = rng.gen_range(0..=ceiling);
    }
    let ceiling = housing_type_ceiling(context.housing_types);
    if candidate > ceiling {
        candidate = rng.gen_range(0..=ceiling);
    }
    let needed = context.needed_cavities();
    if candidate + needed <= INSTANCE_CAVITY_CAPACITY {
        return Ok(candidate);
    }
    INSTANCE_CAVITY_CAPACITY
        .checked_sub(needed)
        .ok_or(RejectionReason::NormalCavityOverflow { needed })
}

/// Largest free normal-cavity count observed for `housings`.
#[must_use]
pub const fn housing_count_ceiling(housings: u32) -> u32 {
    match housings {
        1 => 0,
        2 => 15,
        3..=9 => 15 * housings - 11,
        11..=13 => 85,
        _ => 180,
    }
}

/// Largest free normal-cavity count observed for `housing_types`.
#[must_use]
pub const fn housing_type_ceiling(housing_types: u32) -> u32 {
    match housing_types {
        1 => 18,
        4..=7 => 55,
        types if types >= 8 => 20,
        _ => 180,
    }
}

const fn light(context: &NormalCavityContext) -> bool {
    context.needed_small_cavities < 40
}

const fn moderate(context: &NormalCavityContext) -> bool {
    context.needed_small_cavities < 66
}

const fn heavy(context: &NormalCavityContext) -> bool {
    context.needed_small_cavities < 120
}

const fn very_heavy(_: &NormalCavityContext) -> bool {
    true
}

fn draw_light(context: &NormalCavityContext, rng: &mut dyn RngCore) -> u32 {
    let roll: f64 = rng.r#gen();
    if roll < 0.85 {
        let value = round_count(context.light_load.sample(rng));
        // Out-of-range fits fall back to the observed bulk.
        u32::try_from(value)
            .ok()
            .filter(|value| *value <= 20)
            .unwrap_or_else(|| rng.gen_range(0..=20))
    } else if roll < 0.95 {
        rng.gen_range(21..=40)
    } else {
        rng.gen_range(41..=180)
    }
}

fn draw_moderate(_: &NormalCavityContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(16..=160)
}

fn draw_heavy(_: &NormalCavityContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(0..=140)
}

fn draw_very_heavy(_: &NormalCavityContext, rng: &mut dyn RngCore) -> u32 {
    rng.gen_range(0..=70)
}
