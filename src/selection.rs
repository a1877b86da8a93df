//! In-memory selection state for the forecast download flow.
//!
//! Mirrors what the portal page keeps between user actions: the ordered
//! list of chosen regions (unique by grid code) and a search filter over
//! the region catalog.

use crate::types::region::Region;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("region with code '{code}' is already selected")]
    AlreadySelected { code: String },
}

/// The ordered set of regions picked for a download request.
///
/// Insertion order is preserved and duplicates (same `code`) are
/// rejected, so the selection can be handed to a
/// [`DownloadRequest`](crate::DownloadRequest) as-is.
#[derive(Debug, Clone, Default)]
pub struct RegionSelection {
    chosen: Vec<Region>,
}

impl RegionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region to the selection.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::AlreadySelected`] when a region with the
    /// same code is already in the selection; the existing entry and the
    /// overall order are left untouched.
    pub fn select(&mut self, region: Region) -> Result<(), SelectionError> {
        if self.chosen.iter().any(|r| r.code == region.code) {
            return Err(SelectionError::AlreadySelected {
                code: region.code,
            });
        }
        self.chosen.push(region);
        Ok(())
    }

    /// Removes the region at `index`, as the "×" button on a selected
    /// entry does. Returns the removed region, or `None` if the index is
    /// out of range.
    pub fn remove(&mut self, index: usize) -> Option<Region> {
        if index < self.chosen.len() {
            Some(self.chosen.remove(index))
        } else {
            None
        }
    }

    /// Removes a region by its grid code.
    pub fn remove_by_code(&mut self, code: &str) -> Option<Region> {
        let index = self.chosen.iter().position(|r| r.code == code)?;
        Some(self.chosen.remove(index))
    }

    pub fn clear(&mut self) {
        self.chosen.clear();
    }

    /// The selected regions in insertion order.
    pub fn regions(&self) -> &[Region] {
        &self.chosen
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

/// Filters a region catalog by a search term.
///
/// A region matches when any of its three administrative levels contains
/// the term, case-insensitively. An empty or whitespace-only term returns
/// the whole catalog, matching the behavior of the portal's search box.
pub fn filter_regions<'a>(regions: &'a [Region], term: &str) -> Vec<&'a Region> {
    let term = term.trim();
    if term.is_empty() {
        return regions.iter().collect();
    }
    regions.iter().filter(|r| r.matches(term)).collect()
}
