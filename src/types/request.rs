//! The payload of a bulk forecast download request.

use crate::types::config::Variable;
use crate::types::region::Region;
use bon::Builder;
use chrono::NaiveDate;
use reqwest::multipart::Form;

/// Everything the backend needs to run one bulk forecast download.
///
/// `login_id`/`password` are the upstream KMA data-portal credentials the
/// backend uses to open its crawling session; they are distinct from the
/// bearer token that authorizes the request itself.
///
/// The request travels as a multipart form: `regions` and `variables` are
/// JSON-encoded into their form fields, dates as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use kma_portal::{DownloadRequest, Region, Variable};
///
/// let request = DownloadRequest::builder()
///     .login_id("kma-user")
///     .password("secret")
///     .config_name("단기예보")
///     .regions(vec![Region {
///         level1: "서울특별시".into(),
///         level2: "종로구".into(),
///         level3: "청운효자동".into(),
///         code: "1111051500".into(),
///     }])
///     .variables(vec![Variable { code: "TMP".into(), name: "1시간기온".into() }])
///     .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
///     .build();
/// assert_eq!(request.config_name, "단기예보");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DownloadRequest {
    /// Upstream portal login id.
    #[builder(into)]
    pub login_id: String,
    /// Upstream portal password.
    #[builder(into)]
    pub password: String,
    /// Name of the forecast config to download.
    #[builder(into)]
    pub config_name: String,
    /// Chosen regions; must be non-empty for the backend to accept it.
    pub regions: Vec<Region>,
    /// Chosen variables of the config.
    pub variables: Vec<Variable>,
    /// First day of the requested range.
    pub start_date: NaiveDate,
    /// Last day of the requested range.
    pub end_date: NaiveDate,
}

impl DownloadRequest {
    /// Serializes the request into the multipart form the backend expects.
    pub(crate) fn into_form(self) -> Result<Form, serde_json::Error> {
        let regions = serde_json::to_string(&self.regions)?;
        let variables = serde_json::to_string(&self.variables)?;
        Ok(Form::new()
            .text("login_id", self.login_id)
            .text("password", self.password)
            .text("regions", regions)
            .text("config_name", self.config_name)
            .text("variables", variables)
            .text("start_date", self.start_date.format("%Y-%m-%d").to_string())
            .text("end_date", self.end_date.format("%Y-%m-%d").to_string()))
    }
}
