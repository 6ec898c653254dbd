//! HTTP client for the school portal.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

use myxb_core::model::{EvaluationProject, Semester, SemesterScore, SubjectDetail, SubjectSummary};
use myxb_core::traits::ScoreSource;

use crate::auth;
use crate::config::Credentials;
use crate::error::ApiError;
use crate::models::{
    ApiEnvelope, DynamicScoreData, LoginRequest, SemesterDynamicData, TaskPage,
};

pub const DEFAULT_BASE_URL: &str = "https://tsinglanstudent.schoolis.cn";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const STATE_INCORRECT_CAPTCHA: i64 = 1_180_038;
const STATE_INVALID_CREDENTIALS: i64 = 13;
const STATE_AUTH_FAILED: i64 = 1_010_076;

/// A logged-in (or about to be) portal session. Cookies persist across calls.
pub struct PortalClient {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl PortalClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Send a request and decode the envelope, without checking its state.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                ApiError::Network(format!("portal not reachable at {}", self.base_url))
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status,
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET an endpoint and return the envelope's data, failing on a non-zero state.
    async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ApiError> {
        let request = self.client.get(self.url(endpoint)).query(query);
        let envelope: ApiEnvelope<T> = self.send(request).await?;
        if envelope.state != 0 {
            return Err(ApiError::Api {
                state: envelope.state,
                message: envelope.message(),
            });
        }
        Ok(envelope.data)
    }

    /// The login captcha image as base64, or `None` if none is required.
    #[instrument(skip(self))]
    pub async fn captcha(&self) -> Result<Option<String>, ApiError> {
        let data: Option<String> = self
            .get_data("/api/MemberShip/GetStudentCaptchaForLogin", &[])
            .await?;
        Ok(data.filter(|d| !d.is_empty()))
    }

    /// Log in with the first-stage password hash. The second stage is
    /// applied here with the current timestamp.
    #[instrument(skip(self, password_hash, captcha))]
    pub async fn login(
        &self,
        username: &str,
        password_hash: &str,
        captcha: &str,
    ) -> Result<(), ApiError> {
        let timestamp = auth::unix_timestamp();
        let body = LoginRequest {
            name: username,
            password: auth::second_hash(password_hash, timestamp),
            timestamp,
        };

        let request = self
            .client
            .post(self.url("/api/MemberShip/Login"))
            .query(&[("captcha", captcha)])
            .json(&body);
        let envelope: ApiEnvelope<serde_json::Value> = self.send(request).await?;

        match envelope.state {
            0 => {
                tracing::info!("logged in");
                Ok(())
            }
            STATE_INCORRECT_CAPTCHA => Err(ApiError::IncorrectCaptcha),
            STATE_INVALID_CREDENTIALS | STATE_AUTH_FAILED => Err(ApiError::InvalidCredentials),
            _ => Err(ApiError::LoginFailed(envelope.message())),
        }
    }

    /// Log in with saved credentials. Fails with `CaptchaRequired` if the
    /// portal asks for a captcha, since there is nobody to solve it.
    pub async fn login_saved(&self, credentials: &Credentials) -> Result<(), ApiError> {
        if self.captcha().await?.is_some() {
            return Err(ApiError::CaptchaRequired);
        }
        self.login(&credentials.username, &credentials.password_hash, "")
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_semesters(&self) -> Result<Vec<Semester>, ApiError> {
        let data: Option<Vec<Semester>> =
            self.get_data("/api/School/GetSchoolSemesters", &[]).await?;
        Ok(data.unwrap_or_default())
    }

    /// Subjects of a semester, deduplicated by id keeping the first occurrence.
    #[instrument(skip(self))]
    pub async fn fetch_subjects(&self, semester_id: u64) -> Result<Vec<SubjectSummary>, ApiError> {
        let data: Option<Vec<SubjectSummary>> = self
            .get_data(
                "/api/LearningTask/GetStuSubjectListForSelect",
                &[("semesterId", semester_id.to_string())],
            )
            .await?;

        let mut seen = std::collections::HashSet::new();
        let subjects: Vec<SubjectSummary> = data
            .unwrap_or_default()
            .into_iter()
            .filter(|s| seen.insert(s.id))
            .collect();
        Ok(subjects)
    }

    /// Ids of the subject's learning tasks (first page, one entry).
    #[instrument(skip(self))]
    pub async fn fetch_task_ids(
        &self,
        semester_id: u64,
        subject_id: u64,
    ) -> Result<Vec<u64>, ApiError> {
        let page: Option<TaskPage> = self
            .get_data(
                "/api/LearningTask/GetList",
                &[
                    ("semesterId", semester_id.to_string()),
                    ("subjectId", subject_id.to_string()),
                    ("pageIndex", "1".to_string()),
                    ("pageSize", "1".to_string()),
                ],
            )
            .await?;
        Ok(page
            .and_then(|p| p.list)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.id)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn fetch_task_detail(&self, task_id: u64) -> Result<SubjectDetail, ApiError> {
        let data: Option<SubjectDetail> = self
            .get_data(
                "/api/LearningTask/GetDetail",
                &[("learningTaskId", task_id.to_string())],
            )
            .await?;
        data.ok_or_else(|| ApiError::Decode(format!("learning task {task_id} has no detail")))
    }

    #[instrument(skip(self))]
    pub async fn fetch_dynamic_score(
        &self,
        class_id: u64,
        subject_id: u64,
        semester_id: u64,
    ) -> Result<Vec<EvaluationProject>, ApiError> {
        let data: Option<DynamicScoreData> = self
            .get_data(
                "/api/DynamicScore/GetDynamicScoreDetail",
                &[
                    ("classId", class_id.to_string()),
                    ("subjectId", subject_id.to_string()),
                    ("semesterId", semester_id.to_string()),
                ],
            )
            .await?;
        Ok(data
            .and_then(|d| d.evaluation_project_list)
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn fetch_semester_scores(
        &self,
        semester_id: u64,
    ) -> Result<Vec<SemesterScore>, ApiError> {
        let data: Option<SemesterDynamicData> = self
            .get_data(
                "/api/DynamicScore/GetStuSemesterDynamicScore",
                &[("semesterId", semester_id.to_string())],
            )
            .await?;
        Ok(data
            .and_then(|d| d.student_semester_dynamic_score_basic_dtos)
            .unwrap_or_default())
    }

    /// The published GPA. The portal reports "not published" as null or 0.
    #[instrument(skip(self))]
    pub async fn fetch_gpa(&self, semester_id: u64) -> Result<Option<f64>, ApiError> {
        let data: Option<f64> = self
            .get_data(
                "/api/DynamicScore/GetGpa",
                &[("semesterId", semester_id.to_string())],
            )
            .await?;
        Ok(data.filter(|gpa| *gpa != 0.0))
    }
}

#[async_trait]
impl ScoreSource for PortalClient {
    fn name(&self) -> &str {
        "portal"
    }

    async fn semesters(&self) -> anyhow::Result<Vec<Semester>> {
        Ok(self.fetch_semesters().await?)
    }

    async fn subjects(&self, semester_id: u64) -> anyhow::Result<Vec<SubjectSummary>> {
        Ok(self.fetch_subjects(semester_id).await?)
    }

    async fn subject_detail(
        &self,
        semester_id: u64,
        subject_id: u64,
    ) -> anyhow::Result<Option<SubjectDetail>> {
        let Some(task_id) = self
            .fetch_task_ids(semester_id, subject_id)
            .await?
            .first()
            .copied()
        else {
            return Ok(None);
        };
        Ok(Some(self.fetch_task_detail(task_id).await?))
    }

    async fn evaluation_tree(
        &self,
        class_id: u64,
        subject_id: u64,
        semester_id: u64,
    ) -> anyhow::Result<Vec<EvaluationProject>> {
        Ok(self
            .fetch_dynamic_score(class_id, subject_id, semester_id)
            .await?)
    }

    async fn semester_scores(&self, semester_id: u64) -> anyhow::Result<Vec<SemesterScore>> {
        Ok(self.fetch_semester_scores(semester_id).await?)
    }

    async fn official_gpa(&self, semester_id: u64) -> anyhow::Result<Option<f64>> {
        Ok(self.fetch_gpa(semester_id).await?)
    }
}
