//! Defines the region catalog entry used by the forecast download flow.

use serde::{Deserialize, Serialize};

/// A forecast region as listed by the portal's region catalog.
///
/// Regions follow the three-level Korean administrative hierarchy
/// (province / city or district / neighborhood). The `code` is the grid
/// code the backend resolves to forecast coordinates and uniquely
/// identifies a region within the catalog.
///
/// # Examples
///
/// ```
/// use kma_portal::Region;
///
/// let region = Region {
///     level1: "서울특별시".to_string(),
///     level2: "종로구".to_string(),
///     level3: "청운효자동".to_string(),
///     code: "1111051500".to_string(),
/// };
/// assert_eq!(region.display_name(), "서울특별시 / 종로구 / 청운효자동");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Region {
    /// Top administrative level (province or metropolitan city).
    pub level1: String,
    /// Middle administrative level (city, county or district).
    pub level2: String,
    /// Bottom administrative level (town or neighborhood).
    pub level3: String,
    /// Grid code identifying the region to the backend.
    pub code: String,
}

impl Region {
    /// The "level1 / level2 / level3" label the portal shows in pickers.
    pub fn display_name(&self) -> String {
        format!("{} / {} / {}", self.level1, self.level2, self.level3)
    }

    /// Case-insensitive match of `term` against any of the three levels.
    pub(crate) fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.level1.to_lowercase().contains(&term)
            || self.level2.to_lowercase().contains(&term)
            || self.level3.to_lowercase().contains(&term)
    }
}
