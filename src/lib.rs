mod api;
mod error;
mod jobs;
mod portal;
mod selection;
mod storage;
mod types;
mod utils;

pub use error::PortalError;
pub use portal::*;

pub use selection::{filter_regions, RegionSelection, SelectionError};

pub use types::config::{ForecastConfig, Variable};
pub use types::file::RemoteFile;
pub use types::job::{JobState, JobStatus, SubmittedJob};
pub use types::region::Region;
pub use types::request::DownloadRequest;
pub use types::station::AsosStation;

pub use jobs::{AsosFailure, AsosReport, JobError, ProgressSink};
pub use storage::token::StoredToken;

pub use api::error::ApiError;
pub use storage::error::StorageError;
