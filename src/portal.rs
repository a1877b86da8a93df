//! This module provides the main entry point for interacting with the
//! weather-data download portal. It covers the full page-controller flow:
//! loading reference data (regions, forecast configs, ASOS stations),
//! authenticating, submitting bulk download jobs, polling their status,
//! and fetching produced files.

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::error::PortalError;
use crate::jobs::{AsosFailure, AsosReport, JobError, ProgressSink};
use crate::storage::files::{checked_relative_path, save_response};
use crate::storage::token::{StoredToken, TokenStore};
use crate::types::config::ForecastConfig;
use crate::types::file::RemoteFile;
use crate::types::job::{JobStatus, SubmittedJob};
use crate::types::region::Region;
use crate::types::request::DownloadRequest;
use crate::types::station::AsosStation;
use crate::utils::{ensure_dir_exists, get_data_dir};
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Default spacing between two status polls, matching the portal page's
/// one-second timer.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const DOWNLOADS_DIR_NAME: &str = "downloads";

/// The main client for the weather-data download portal.
///
/// A `Portal` wraps the backend's REST API with typed operations and a
/// small amount of local state: the data directory that holds the
/// persisted access token and, by default, downloaded files.
///
/// Create an instance with [`Portal::new()`] for the default data
/// directory or [`Portal::with_data_folder()`] to control where the token
/// and downloads live.
///
/// # Examples
///
/// ```no_run
/// # use kma_portal::{Portal, PortalError};
/// # async fn run() -> Result<(), PortalError> {
/// let portal = Portal::new("http://localhost:8000").await?;
/// let configs = portal.configs().await?;
/// println!("{} forecast products available", configs.len());
/// # Ok(())
/// # }
/// ```
pub struct Portal {
    api: ApiClient,
    tokens: TokenStore,
    data_dir: PathBuf,
}

#[bon]
impl Portal {
    /// Creates a client against `base_url` with a custom data folder.
    ///
    /// The folder is created if missing and will hold the token file and
    /// the default download destination.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::DataDirCreation`] if the folder cannot be
    /// created or is not a directory.
    pub async fn with_data_folder(
        base_url: &str,
        data_folder: PathBuf,
    ) -> Result<Self, PortalError> {
        ensure_dir_exists(&data_folder)
            .await
            .map_err(|e| PortalError::DataDirCreation(data_folder.clone(), e))?;
        Ok(Self {
            api: ApiClient::new(base_url),
            tokens: TokenStore::new(&data_folder),
            data_dir: data_folder,
        })
    }

    /// Creates a client against `base_url` using the default data
    /// directory (e.g. `~/.local/share/kma_portal` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::DataDirResolution`] when the system data
    /// directory cannot be determined, or [`PortalError::DataDirCreation`]
    /// when it cannot be created.
    pub async fn new(base_url: &str) -> Result<Self, PortalError> {
        let data_folder = get_data_dir().map_err(PortalError::DataDirResolution)?;
        Self::with_data_folder(base_url, data_folder).await
    }

    /// Logs in to the portal and persists the issued bearer token.
    ///
    /// Subsequent [`Portal::submit_download`] calls pick the token up
    /// automatically, also from later client instances sharing the same
    /// data folder.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with the backend's detail message on
    /// rejected credentials (HTTP 401), or a storage error if the token
    /// cannot be written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use kma_portal::{Portal, PortalError};
    /// # async fn run() -> Result<(), PortalError> {
    /// let portal = Portal::new("http://localhost:8000").await?;
    /// portal
    ///     .login()
    ///     .username("kma-user")
    ///     .password("secret")
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<StoredToken, PortalError> {
        let response = self.api.login(username, password).await?;
        let token = StoredToken {
            access_token: response.access_token,
            token_type: response.token_type,
        };
        self.tokens.save(&token).await?;
        Ok(token)
    }

    /// Forgets the stored token. Missing token counts as logged out.
    pub async fn logout(&self) -> Result<(), PortalError> {
        self.tokens.clear().await.map_err(PortalError::from)
    }

    /// The currently persisted token, if any.
    pub async fn stored_token(&self) -> Result<Option<StoredToken>, PortalError> {
        self.tokens.load().await.map_err(PortalError::from)
    }

    /// Loads the region catalog, optionally filtered server-side.
    ///
    /// For interactive filtering of an already-loaded catalog use
    /// [`filter_regions`](crate::filter_regions) instead of re-fetching.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use kma_portal::{Portal, PortalError};
    /// # async fn run() -> Result<(), PortalError> {
    /// let portal = Portal::new("http://localhost:8000").await?;
    /// let all = portal.regions().call().await?;
    /// let jongno = portal.regions().search("종로").call().await?;
    /// assert!(jongno.len() <= all.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn regions(&self, search: Option<&str>) -> Result<Vec<Region>, PortalError> {
        self.api.regions(search).await.map_err(PortalError::from)
    }

    /// Loads the forecast configs and their variable catalogs.
    pub async fn configs(&self) -> Result<Vec<ForecastConfig>, PortalError> {
        self.api.configs().await.map_err(PortalError::from)
    }

    /// Loads the ASOS station list.
    pub async fn asos_stations(&self) -> Result<Vec<AsosStation>, PortalError> {
        self.api.asos_stations().await.map_err(PortalError::from)
    }

    /// Submits a bulk forecast download job.
    ///
    /// Requires a stored token from a previous [`Portal::login`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when nobody has logged in, or
    /// [`ApiError::Status`] when the backend rejects the request.
    pub async fn submit_download(
        &self,
        request: DownloadRequest,
    ) -> Result<SubmittedJob, PortalError> {
        let token = self
            .tokens
            .load()
            .await?
            .ok_or(ApiError::MissingToken)?;
        self.api
            .submit_download(&token.access_token, request)
            .await
            .map_err(PortalError::from)
    }

    /// Fetches a single status snapshot of a job.
    pub async fn job_status(&self, task_id: &str) -> Result<JobStatus, PortalError> {
        self.api.status(task_id).await.map_err(PortalError::from)
    }

    /// Polls a job on a fixed interval until it reaches a terminal state.
    ///
    /// The first status request is sent after one full interval has
    /// elapsed, then one request per interval.
    ///
    /// Each snapshot is forwarded to `sink` before the terminal check, so
    /// a caller rendering a progress bar sees the final state too. The
    /// loop stops and returns the snapshot once the job is `completed` or
    /// `error`; whether a completed-with-error job is a failure is the
    /// caller's call, via [`JobStatus::status`] and [`JobStatus::error`].
    ///
    /// # Arguments
    ///
    /// * `.task_id(&str)`: **Required.** Id from [`Portal::submit_download`].
    /// * `.interval(Option<Duration>)`: Optional. Poll spacing, default 1 s.
    /// * `.sink(Option<&dyn ProgressSink>)`: Optional. Progress observer.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::StatusRequest`] as soon as one status request
    /// fails; the loop does not retry, mirroring the page controller
    /// clearing its timer on the first fetch failure.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use kma_portal::{JobState, Portal, PortalError};
    /// # async fn run(portal: Portal, task_id: String) -> Result<(), PortalError> {
    /// let done = portal.poll_job().task_id(&task_id).call().await?;
    /// match done.status {
    ///     JobState::Completed => println!("downloaded {} files", done.files.len()),
    ///     _ => eprintln!("job failed: {:?}", done.error),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn poll_job(
        &self,
        task_id: &str,
        interval: Option<Duration>,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<JobStatus, PortalError> {
        let interval = interval.unwrap_or(DEFAULT_POLL_INTERVAL);
        // The first status request fires after one full interval, not at
        // once, the same cadence as the page's one-second timer.
        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let status = self
                .api
                .status(task_id)
                .await
                .map_err(|source| JobError::StatusRequest {
                    task_id: task_id.to_string(),
                    source,
                })?;
            if let Some(sink) = sink {
                sink.job_status(&status);
            }
            if status.status.is_terminal() {
                info!(
                    "Job {} finished as {} ({}/{})",
                    task_id, status.status, status.progress, status.total
                );
                return Ok(status);
            }
        }
    }

    /// Submits a download job and polls it to completion in one call.
    ///
    /// Equivalent to [`Portal::submit_download`] followed by
    /// [`Portal::poll_job`] with the returned task id.
    #[builder]
    pub async fn execute_download(
        &self,
        request: DownloadRequest,
        interval: Option<Duration>,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<JobStatus, PortalError> {
        let submitted = self.submit_download(request).await?;
        self.poll_job()
            .task_id(&submitted.task_id)
            .maybe_interval(interval)
            .maybe_sink(sink)
            .call()
            .await
    }

    /// Lists files produced by finished jobs, newest first.
    pub async fn files(&self) -> Result<Vec<RemoteFile>, PortalError> {
        self.api.files().await.map_err(PortalError::from)
    }

    /// Downloads one produced file to disk and returns its local path.
    ///
    /// The file's listing path is kept as a relative hierarchy under the
    /// destination directory, so two jobs producing same-named files in
    /// different region folders never collide.
    ///
    /// # Arguments
    ///
    /// * `.path(&str)`: **Required.** The `path` of a [`RemoteFile`].
    /// * `.dest_dir(Option<PathBuf>)`: Optional. Defaults to `downloads/`
    ///   inside the portal data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnsafePath`](crate::StorageError::UnsafePath)
    /// for a listing path that is absolute or contains `..` segments; such
    /// a path could otherwise place the file outside the destination
    /// directory.
    #[builder]
    pub async fn fetch_file(
        &self,
        path: &str,
        dest_dir: Option<PathBuf>,
    ) -> Result<PathBuf, PortalError> {
        let dest_dir = dest_dir.unwrap_or_else(|| self.data_dir.join(DOWNLOADS_DIR_NAME));
        let dest = dest_dir.join(checked_relative_path(path)?);
        let response = self.api.fetch_file(path).await?;
        save_response(response, &dest).await?;
        Ok(dest)
    }

    /// Downloads hourly ASOS observations for a set of stations, one CSV
    /// per station, sequentially.
    ///
    /// Stations are processed in the given order; a failed station is
    /// recorded in the report and the batch moves on, so one bad station
    /// id does not sink the rest. Files are named
    /// `ASOS_{code}_{start}_{end}.csv` with dates in `YYYYMMDD`.
    ///
    /// # Arguments
    ///
    /// * `.service_key(&str)`: **Required.** KMA open-API service key.
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** Date range.
    /// * `.stations(Vec<String>)`: **Required.** Station codes to fetch.
    /// * `.dest_dir(Option<PathBuf>)`: Optional. Defaults to `downloads/`
    ///   inside the portal data directory.
    /// * `.sink(Option<&dyn ProgressSink>)`: Optional. Per-station progress.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use chrono::NaiveDate;
    /// # use kma_portal::{Portal, PortalError};
    /// # async fn run(portal: Portal) -> Result<(), PortalError> {
    /// let report = portal
    ///     .download_asos()
    ///     .service_key("my-service-key")
    ///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
    ///     .stations(vec!["108".to_string(), "112".to_string()])
    ///     .call()
    ///     .await?;
    /// println!(
    ///     "saved {} files, {} stations failed",
    ///     report.saved.len(),
    ///     report.failures.len()
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn download_asos(
        &self,
        service_key: &str,
        start: NaiveDate,
        end: NaiveDate,
        stations: Vec<String>,
        dest_dir: Option<PathBuf>,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<AsosReport, PortalError> {
        let dest_dir = dest_dir.unwrap_or_else(|| self.data_dir.join(DOWNLOADS_DIR_NAME));
        let start = start.format("%Y%m%d").to_string();
        let end = end.format("%Y%m%d").to_string();
        let total = stations.len();

        let mut report = AsosReport::default();
        for (done, code) in stations.iter().enumerate() {
            if let Some(sink) = sink {
                sink.station_started(done, total, code);
            }
            let outcome = self
                .fetch_asos_station(&dest_dir, service_key, &start, &end, code)
                .await;
            match outcome {
                Ok(path) => report.saved.push(path),
                Err(error) => {
                    warn!("ASOS download failed for station {}: {}", code, error);
                    report.failures.push(AsosFailure {
                        station: code.clone(),
                        error,
                    });
                }
            }
            if let Some(sink) = sink {
                sink.station_finished(done + 1, total, code);
            }
        }
        info!(
            "ASOS batch finished: {} saved, {} failed",
            report.saved.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn fetch_asos_station(
        &self,
        dest_dir: &std::path::Path,
        service_key: &str,
        start: &str,
        end: &str,
        code: &str,
    ) -> Result<PathBuf, PortalError> {
        let response = self.api.fetch_asos(service_key, start, end, code).await?;
        let dest = dest_dir.join(format!("ASOS_{}_{}_{}.csv", code, start, end));
        save_response(response, &dest).await?;
        Ok(dest)
    }
}
