//! ASOS observation station identifiers.

use serde::{Deserialize, Serialize};

/// An ASOS (Automated Synoptic Observing System) station.
///
/// The `code` is the station id (`stnIds`) passed as a query parameter to
/// the hourly-observation download endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AsosStation {
    /// Station name, e.g. "서울".
    pub name: String,
    /// Numeric station id in string form, e.g. "108".
    pub code: String,
}
