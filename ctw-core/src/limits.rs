//! Hard domain limits shared by the validator, the samplers and the invariant
//! checks.

/// Largest fixed insertion-job count accepted by the validator.
pub const MAX_INSERTION_JOBS: u32 = 198;
/// Largest two-sided cable count accepted by the validator.
pub const MAX_TWO_SIDED_CABLES: u32 = 100;
/// Largest two-sided cable count drawn by the empirical sampler.
pub const MAX_SAMPLED_TWO_SIDED_CABLES: u32 = 99;
/// Largest one-sided cable count.
pub const MAX_ONE_SIDED_CABLES: u32 = 20;
/// Largest side-cable count accepted by the validator.
pub const MAX_SIDE_CABLES: u32 = 65;
/// Largest number of normal housings.
pub const MAX_HOUSINGS: u32 = 18;
/// Cavities available in the largest central plug.
pub const CENTRAL_PLUG_CAPACITY: u32 = 95;
/// Cavities available in an instance, central plug included.
pub const INSTANCE_CAVITY_CAPACITY: u32 = 260;
