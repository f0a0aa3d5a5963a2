use super::auth::{AuthContext, Credentials, Token};
use super::error::{ApiError, ApiResult};
use crate::models::{
    AttendanceSummary, ExistingSchedule, Homework, HomeworkQuery, LeaderEntry, Mark, Page,
    Period, ProgressSummary, ScheduleKind, WeekSchedule,
};
use chrono::{NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://mapi.itstep.org/v1/mystat/aqtobe";
pub const DEFAULT_AUTH_URL: &str = "https://mapi.itstep.org/v1/mystat/auth/login";

/// Where the data endpoints and the login endpoint live.
///
/// The login endpoint sits outside the city-scoped base path, so the two are
/// configured separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub auth_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>, auth_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_url: auth_url.into(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_AUTH_URL)
    }
}

pub struct MyStatClient {
    client: reqwest::Client,
    endpoints: Endpoints,
    auth: Option<AuthContext>,
}

impl MyStatClient {
    /// Unauthenticated client. Data calls go out without an Authorization header
    /// until `authenticate` or `set_token` succeeds.
    pub fn new(endpoints: Endpoints) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            endpoints,
            auth: None,
        })
    }

    pub fn with_token(endpoints: Endpoints, token: Token) -> ApiResult<Self> {
        let mut client = Self::new(endpoints)?;
        client.set_token(token);
        Ok(client)
    }

    /// Build a client and log in right away.
    ///
    /// A rejected login is logged and leaves the client unauthenticated; check
    /// `is_authenticated` afterwards.
    pub async fn with_credentials(
        endpoints: Endpoints,
        credentials: &Credentials,
    ) -> ApiResult<Self> {
        let mut client = Self::new(endpoints)?;
        client.authenticate(credentials).await.ok();
        Ok(client)
    }

    pub fn auth(&self) -> Option<&AuthContext> {
        self.auth.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn set_token(&mut self, token: Token) {
        self.auth = Some(AuthContext::new(token));
    }

    /// POST the credentials to the login endpoint and keep the returned token.
    ///
    /// The token is the response body with surrounding whitespace trimmed, since
    /// a trailing newline cannot travel in a header; an empty body is a failure.
    /// On failure the current auth state is left untouched.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> ApiResult<()> {
        match self.request_token(credentials).await {
            Ok(token) => {
                info!(login = %credentials.login, "Authenticated with MyStat");
                self.auth = Some(AuthContext::new(token));
                Ok(())
            }
            Err(e) => {
                warn!(login = %credentials.login, error = %e, "MyStat authentication failed");
                Err(e)
            }
        }
    }

    async fn request_token(&self, credentials: &Credentials) -> ApiResult<Token> {
        let url = self.endpoints.auth_url.clone();
        let form = [
            ("login", credentials.login.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .headers(self.base_headers())
            .form(&form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status { url, status, body });
        }

        // The body is the token itself; only surrounding whitespace is dropped
        // since it cannot travel in a header.
        let token = Token::new(body.trim());
        if token.is_empty() {
            return Err(ApiError::EmptyToken);
        }

        Ok(token)
    }

    fn base_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("mystat-dashboard"));
        headers
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = self.base_headers();

        if let Some(auth) = &self.auth {
            if auth.is_expired(Utc::now()) {
                warn!(
                    obtained_at = %auth.obtained_at(),
                    "Token is past its expiry and refresh is not supported; sending it anyway"
                );
            }

            match HeaderValue::from_str(&auth.bearer()) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Token is not a valid header value; request goes out without it"),
            }
        }

        headers
    }

    /// GET a data endpoint, logging any failure once here.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> ApiResult<T> {
        let result = self.fetch(path, query).await;
        if let Err(e) = &result {
            warn!(error = %e, "Failed to fetch {}", what);
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.endpoints.base_url, path);
        debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .headers(self.build_headers())
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();

        // Read the body for both error and success cases
        let response_text = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status,
                body: response_text,
            });
        }

        serde_json::from_str(&response_text).map_err(|source| ApiError::Decode {
            url,
            source,
            snippet: response_text.chars().take(500).collect(),
        })
    }

    pub async fn get_marks(&self) -> ApiResult<Vec<Mark>> {
        self.get("/statistic/marks", &[], "marks").await
    }

    pub async fn get_leader_table(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> ApiResult<Vec<LeaderEntry>> {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = per_page {
            query.push(("per_page", per_page.to_string()));
        }

        self.get("/progress/leader-table", &query, "leader table")
            .await
    }

    pub async fn get_progress(&self, period: Period) -> ApiResult<ProgressSummary> {
        let query = [("period", period.to_string())];
        self.get("/statistic/progress", &query, "progress").await
    }

    pub async fn get_schedule(&self, date_filter: Option<NaiveDate>) -> ApiResult<ExistingSchedule> {
        let mut query = Vec::new();
        if let Some(date) = date_filter {
            query.push(("date_filter", iso_date(date)));
        }

        self.get("/schedule/get-existing-schedule", &query, "schedule")
            .await
    }

    pub async fn get_week_schedule(
        &self,
        date_filter: NaiveDate,
        kind: ScheduleKind,
    ) -> ApiResult<WeekSchedule> {
        let query = [
            ("date_filter", iso_date(date_filter)),
            ("type", kind.to_string()),
        ];
        self.get("/schedule/get-month", &query, "week schedule")
            .await
    }

    pub async fn get_attendance(&self, period: Period) -> ApiResult<AttendanceSummary> {
        let query = [("period", period.to_string())];
        self.get("/statistic/attendance", &query, "attendance").await
    }

    pub async fn get_homeworks(&self, homework: &HomeworkQuery) -> ApiResult<Page<Homework>> {
        let query = [
            ("status", homework.status.to_string()),
            ("limit", homework.limit.to_string()),
            ("sort", homework.sort.clone()),
        ];
        self.get("/homework/list", &query, "homeworks").await
    }
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
