//! Derived analysis kinds cached by a module.

use std::fmt;
use std::ops::BitOr;

/// A set of derived analyses.
///
/// Used to name the analyses a mutation leaves intact; everything outside
/// the set is marked stale.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AnalysisSet(u8);

impl AnalysisSet {
    pub const NONE: AnalysisSet = AnalysisSet(0);
    pub const DEF_USE: AnalysisSet = AnalysisSet(1 << 0);
    pub const TYPES: AnalysisSet = AnalysisSet(1 << 1);
    pub const CONSTANTS: AnalysisSet = AnalysisSet(1 << 2);
    pub const ALL: AnalysisSet = AnalysisSet(0b111);

    /// Returns true if every analysis in `other` is in this set
    pub fn contains(self, other: AnalysisSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AnalysisSet {
    type Output = AnalysisSet;

    fn bitor(self, rhs: AnalysisSet) -> AnalysisSet {
        AnalysisSet(self.0 | rhs.0)
    }
}

impl fmt::Debug for AnalysisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (AnalysisSet::DEF_USE, "DefUse"),
            (AnalysisSet::TYPES, "Types"),
            (AnalysisSet::CONSTANTS, "Constants"),
        ];
        f.debug_set()
            .entries(
                names
                    .iter()
                    .filter(|(set, _)| self.contains(*set))
                    .map(|(_, name)| name),
            )
            .finish()
    }
}
