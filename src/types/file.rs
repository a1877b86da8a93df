//! Entries of the produced-file listing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A file produced by a finished download job, as listed by `/api/files`.
///
/// `path` is relative to the backend's download root and is the value to
/// pass when fetching the file. The listing arrives sorted newest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoteFile {
    /// Bare file name.
    pub name: String,
    /// Path relative to the download root, may contain `/` separators.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified timestamp (naive, backend-local time).
    pub modified: NaiveDateTime,
}

impl RemoteFile {
    /// Human-readable size with two decimals, e.g. "1.50 MB".
    ///
    /// Uses 1024-based units up to GB, the same scale the portal's file
    /// tab renders.
    pub fn human_size(&self) -> String {
        const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
        if self.size == 0 {
            return "0 Bytes".to_string();
        }
        let exp = ((self.size as f64).ln() / 1024_f64.ln()).floor() as usize;
        let exp = exp.min(UNITS.len() - 1);
        let value = self.size as f64 / 1024_f64.powi(exp as i32);
        format!("{:.2} {}", value, UNITS[exp])
    }
}
