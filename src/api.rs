use crate::errors::{ApiError, GENERIC_FAILURE};
use crate::models::{ErrorBody, SurveySubmission};
use crate::storage::TokenStore;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub const SURVEY_PATH: &str = "/api/v1/survey";

/// Shared HTTP plumbing for the backend API: one connection pool, one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Sends the request and decodes a JSON body, mapping non-2xx answers to
    /// `ApiError::Rejected` with the backend's `detail`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let response = ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::UnexpectedResponse(err.to_string()))
    }

    /// Like `send_json`, but the success body is ignored.
    pub async fn send(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(detail)),
        }) if !detail.is_empty() => detail,
        Ok(_) => GENERIC_FAILURE.to_string(),
        Err(err) => {
            warn!("unreadable error body ({status}): {err}");
            GENERIC_FAILURE.to_string()
        }
    };
    Err(ApiError::Rejected { status, detail })
}

pub fn bearer(tokens: &dyn TokenStore) -> Result<String, ApiError> {
    tokens
        .token()
        .map(|token| format!("Bearer {token}"))
        .ok_or(ApiError::MissingToken)
}

#[derive(Clone, Debug)]
pub struct SurveyClient {
    api: ApiClient,
}

impl SurveyClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn submit(
        &self,
        tokens: &dyn TokenStore,
        submission: &SurveySubmission,
    ) -> Result<(), ApiError> {
        let authorization = bearer(tokens)?;
        let request = self
            .api
            .post(SURVEY_PATH)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(submission);
        match self.api.send(request).await {
            Ok(()) => {
                info!("survey submitted");
                Ok(())
            }
            Err(err) => {
                warn!("survey submission failed: {err}");
                Err(err)
            }
        }
    }
}
