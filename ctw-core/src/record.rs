//! The generated meta-variable record.

/// Column names of the output table, in field order.
pub const COLUMNS: [&str; 7] = [
    "numTwoSidedCables",
    "numOneSidedCables",
    "numSideCables",
    "numHousings",
    "numDifferentHousingTypes",
    "numFreeCentralCavs",
    "numFreeNormalCavs",
];

/// The seven meta variables summarising one CTW instance.
///
/// Records are only constructed once every sampling stage has produced its
/// value, so a record never exists in a partially filled state.
///
/// # Examples
/// ```
/// use ctw_core::MetaVariableRecord;
///
/// let record = MetaVariableRecord {
///     two_sided_cables: 20,
///     one_sided_cables: 3,
///     side_cables: 2,
///     housings: 5,
///     housing_types: 4,
///     free_central_cavities: 12,
///     free_normal_cavities: 30,
/// };
/// assert_eq!(record.insertion_jobs(), 43);
/// assert_eq!(record.central_load(), 18);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MetaVariableRecord {
    /// Cables with both ends plugged (`B`).
    pub two_sided_cables: u32,
    /// Cables with one loose end (`O`).
    pub one_sided_cables: u32,
    /// Two-sided cables with neither end in the central plug.
    pub side_cables: u32,
    /// Normal (non-central) housings.
    pub housings: u32,
    /// Distinct housing types among the normal housings.
    pub housing_types: u32,
    /// Unused cavities in the central plug.
    pub free_central_cavities: u32,
    /// Unused cavities summed over all normal housings.
    pub free_normal_cavities: u32,
}

impl MetaVariableRecord {
    /// Total insertion jobs `k = 2B + O`.
    #[must_use]
    pub const fn insertion_jobs(&self) -> u32 {
        2 * self.two_sided_cables + self.one_sided_cables
    }

    /// Two-sided cable ends landing in the central plug (`B - side cables`).
    #[must_use]
    pub const fn central_load(&self) -> u32 {
        self.two_sided_cables.saturating_sub(self.side_cables)
    }

    /// Cavities needed in normal housings (`side cables + B + O`).
    #[must_use]
    pub const fn needed_small_cavities(&self) -> u32 {
        self.side_cables + self.two_sided_cables + self.one_sided_cables
    }

    /// Central-plug cavities the record occupies, free ones included.
    #[must_use]
    pub const fn needed_central_cavities(&self) -> u32 {
        self.central_load() + self.free_central_cavities
    }

    /// Field values in [`COLUMNS`] order.
    #[must_use]
    pub const fn to_row(&self) -> [u32; 7] {
        [
            self.two_sided_cables,
            self.one_sided_cables,
            self.side_cables,
            self.housings,
            self.housing_types,
            self.free_central_cavities,
            self.free_normal_cavities,
        ]
    }
}
