//! Side cables from empirical bucketed probabilities over two-sided cables.

use rand::{Rng, RngCore};

use crate::{
    distributions::{gaussian_noise, round_count},
    error::RejectionReason,
    limits::CENTRAL_PLUG_CAPACITY,
    rules::{Rule, RuleTable},
};

use super::to_count;

/// Inputs of the side-cable model.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SideCableContext {
    /// Two-sided cables `B`.
    pub two_sided_cables: u32,
    /// Normal housings.
    pub housings: u32,
}

static SIDE_CABLE_RULES: [Rule<SideCableContext, u32>; 6] = [
    Rule {
        label: "too_few_housings",
        applies: too_few_housings,
        draw: draw_none,
    },
    Rule {
        label: "few_two_sided",
        applies: few_two_sided,
        draw: draw_none,
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
    Rule {
        label: "linear",
        applies: linear,
        draw: draw_linear,
    },
];

/// Side-cable model keyed on housings and two-sided cables.
pub static SIDE_CABLES: RuleTable<SideCableContext, u32> =
    RuleTable::new("side_cables", &SIDE_CABLE_RULES);

/// Returns the fixed side cables when configured, otherwise draws them.
///
/// # Errors
/// Returns [`RejectionReason::SideCablesExceedTwoSided`] when a fixed value
/// exceeds the record's two-sided cables, or
/// [`RejectionReason::RuleTableExhausted`] if the model does not cover the
/// context.
pub fn sample_side_cables(
    context: &SideCableContext,
    fixed: Option<u32>,
    rng: &mut dyn RngCore,
) -> Result<u32, RejectionReason> {
    match fixed {
        Some(side_cables) if side_cables > context.two_sided_cables => {
            Err(RejectionReason::SideCablesExceedTwoSided {
                side_cables,
                two_sided_cables: context.two_sided_cables,
            })
        }
        Some(side_cables) => Ok(side_cables),
        None => SIDE_CABLES.evaluate(context, rng),
    }
}

/// No observed instance has more than 80% side cables.
const fn side_cable_cap(two_sided_cables: u32) -> u32 {
    two_sided_cables * 4 / 5
}

const fn too_few_housings(context: &SideCableContext) -> bool {
    context.housings < 3
}

const fn few_two_sided(context: &SideCableContext) -> bool {
    context.two_sided_cables < 3
}

const fn small(context: &SideCableContext) -> bool {
    context.two_sided_cables < 9
}

const fn medium(context: &SideCableContext) -> bool {
    context.two_sided_cables < 18
}

const fn large(context: &SideCableContext) -> bool {
    context.two_sided_cables < 35
}

const fn linear(_: &SideCableContext) -> bool {
    true
}

fn draw_none(_: &SideCableContext, _: &mut dyn RngCore) -> u32 {
    0
}

fn draw_small(_: &SideCableContext, rng: &mut dyn RngCore) -> u32 {
    u32::from(!rng.gen_bool(0.94))
}

fn draw_medium(_: &SideCableContext, rng: &mut dyn RngCore) -> u32 {
    if rng.gen_bool(0.89) {
        0
    } else {
        rng.gen_range(1..=4)
    }
}

fn draw_large(context: &SideCableContext, rng: &mut dyn RngCore) -> u32 {
    if rng.gen_bool(0.66) {
        0
    } else {
        rng.gen_range(1..=16_u32).min(side_cable_cap(context.two_sided_cables))
    }
}

fn draw_linear(context: &SideCableContext, rng: &mut dyn RngCore) -> u32 {
    let two_sided_cables = i64::from(context.two_sided_cables);
    let trend = -23.3 + 0.842 * f64::from(context.two_sided_cables);
    let mut value = round_count(trend + gaussian_noise(rng, 10.0));
    if value > 63 {
        value = rng.gen_range(50..=63);
    }
    value = value.min(i64::from(side_cable_cap(context.two_sided_cables)));
    if two_sided_cables - value > i64::from(CENTRAL_PLUG_CAPACITY) {
        value = two_sided_cables - i64::from(CENTRAL_PLUG_CAPACITY);
    }
    if value < 0 {
        value = rng.gen_range(0..=10);
    }
    to_count(value)
}
