use crate::api::error::ApiError;
use crate::types::config::ForecastConfig;
use crate::types::file::RemoteFile;
use crate::types::job::{JobStatus, SubmittedJob};
use crate::types::region::Region;
use crate::types::request::DownloadRequest;
use crate::types::station::AsosStation;
use log::{info, warn};
use reqwest::{Client, Response};
use serde::Deserialize;

// Response envelopes used by the backend.
#[derive(Deserialize)]
struct RegionList {
    regions: Vec<Region>,
}

#[derive(Deserialize)]
struct ConfigList {
    configs: Vec<ForecastConfig>,
}

#[derive(Deserialize)]
struct StationList {
    stations: Vec<AsosStation>,
}

#[derive(Deserialize)]
struct FileList {
    files: Vec<RemoteFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// FastAPI error bodies look like {"detail": "..."}.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Thin typed wrapper over the portal's REST endpoints.
///
/// Every method maps one endpoint, turns non-2xx responses into
/// [`ApiError::Status`] with the backend's `detail` message when one is
/// present, and decodes the JSON envelope.
pub(crate) struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.endpoint("/api/token");
        info!("Requesting access token for user {}", username);
        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("login", response).await?;
        response
            .json::<TokenResponse>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "login",
                source,
            })
    }

    pub async fn regions(&self, search: Option<&str>) -> Result<Vec<Region>, ApiError> {
        let url = self.endpoint("/api/regions");
        let mut request = self.http.get(&url);
        if let Some(term) = search {
            request = request.query(&[("search", term)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("regions", response).await?;
        let list = response
            .json::<RegionList>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "regions",
                source,
            })?;
        Ok(list.regions)
    }

    pub async fn configs(&self) -> Result<Vec<ForecastConfig>, ApiError> {
        let url = self.endpoint("/api/configs");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("configs", response).await?;
        let list = response
            .json::<ConfigList>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "configs",
                source,
            })?;
        Ok(list.configs)
    }

    pub async fn asos_stations(&self) -> Result<Vec<AsosStation>, ApiError> {
        let url = self.endpoint("/api/asos/stations");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("asos stations", response).await?;
        let list = response
            .json::<StationList>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "asos stations",
                source,
            })?;
        Ok(list.stations)
    }

    pub async fn submit_download(
        &self,
        token: &str,
        request: DownloadRequest,
    ) -> Result<SubmittedJob, ApiError> {
        let url = self.endpoint("/api/download");
        let form = request.into_form().map_err(ApiError::FormEncode)?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("download submission", response).await?;
        let job = response
            .json::<SubmittedJob>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "download submission",
                source,
            })?;
        info!("Download job {} accepted", job.task_id);
        Ok(job)
    }

    pub async fn status(&self, task_id: &str) -> Result<JobStatus, ApiError> {
        let url = self.endpoint(&format!("/api/status/{}", task_id));
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("job status", response).await?;
        response
            .json::<JobStatus>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "job status",
                source,
            })
    }

    pub async fn files(&self) -> Result<Vec<RemoteFile>, ApiError> {
        let url = self.endpoint("/api/files");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        let response = check_status("file listing", response).await?;
        let list = response
            .json::<FileList>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "file listing",
                source,
            })?;
        Ok(list.files)
    }

    /// Opens a streamed response for one produced file. The caller owns
    /// writing the body to disk.
    pub async fn fetch_file(&self, path: &str) -> Result<Response, ApiError> {
        let url = self.endpoint(&format!("/api/download-file/{}", encode_path(path)));
        info!("Fetching produced file {}", path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        check_status("file download", response).await
    }

    /// Opens a streamed CSV response for one station of an ASOS download.
    pub async fn fetch_asos(
        &self,
        service_key: &str,
        start: &str,
        end: &str,
        station_code: &str,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint("/api/download/asos");
        info!(
            "Requesting ASOS data for station {} ({}~{})",
            station_code, start, end
        );
        let response = self
            .http
            .get(&url)
            .query(&[
                ("service_key", service_key),
                ("start", start),
                ("end", end),
                ("stnIds", station_code),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Network(url.clone(), e))?;
        check_status("asos download", response).await
    }
}

/// Turns a non-2xx response into [`ApiError::Status`].
///
/// The backend's `detail` message is preferred; failing that, the raw
/// body, and finally the bare status line.
async fn check_status(operation: &'static str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    warn!("{} returned HTTP {}", operation, status);
    let detail = match response.text().await {
        Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.detail,
            Err(_) if !body.is_empty() => body,
            Err(_) => status.to_string(),
        },
        Err(_) => status.to_string(),
    };
    Err(ApiError::Status {
        operation,
        status,
        detail,
    })
}

/// Percent-encodes a download-root-relative path, segment by segment.
///
/// Path separators stay literal so the backend's `{file_path:path}` route
/// sees the same hierarchy the listing reported.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
