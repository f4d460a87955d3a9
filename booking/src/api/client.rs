//! Backend REST client implementation

use super::error::ApiError;
use crate::config::ApiConfig;
use crate::session::SessionContext;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Backend REST client
///
/// Attaches the bearer token of its [`SessionContext`] to every request and
/// clears that session when the backend answers 401 or 403.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidUrl`]: the base URL does not parse
    /// - [`ApiError::Network`]: the HTTP client cannot be built
    pub fn new(config: &ApiConfig, session: Arc<SessionContext>) -> Result<Self, ApiError> {
        // A trailing slash makes `join` append instead of replacing the last segment.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The session this client authenticates with
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// `GET path`, decoding a JSON body.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or parsing failures
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, |request| request).await?;
        decode(response).await
    }

    /// `POST path` with a JSON body, decoding a JSON body.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or parsing failures
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::POST, path, |request| request.json(body))
            .await?;
        decode(response).await
    }

    /// `PUT path` with a JSON body, decoding a JSON body.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or parsing failures
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::PUT, path, |request| request.json(body))
            .await?;
        decode(response).await
    }

    /// `PATCH path` with a JSON body, decoding a JSON body.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or parsing failures
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::PATCH, path, |request| request.json(body))
            .await?;
        decode(response).await
    }

    /// `PATCH path` without a body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or non-success statuses
    pub async fn patch_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::PATCH, path, |request| request).await?;
        Ok(())
    }

    /// `DELETE path`, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or non-success statuses
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, |request| request).await?;
        Ok(())
    }

    /// Send one request and map the status.
    ///
    /// `build` adds the body and headers to the prepared request.
    pub(crate) async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        build: F,
    ) -> Result<Response, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = build(request).send().await.map_err(|e| {
            metrics::counter!("api.requests", "status" => "network_error").increment(1);
            tracing::warn!(%method, path, error = %e, "Backend unreachable");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        metrics::counter!("api.requests", "status" => status_class(status)).increment(1);
        tracing::debug!(%method, path, status = status.as_u16(), "Backend request");

        if status.is_success() {
            return Ok(response);
        }

        let error = match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
            status => {
                let body = response.text().await.unwrap_or_default();
                ApiError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                }
            },
        };

        if error.ends_session() {
            tracing::warn!(status = status.as_u16(), "Backend rejected the token, signing out");
            if let Err(e) = self.session.clear().await {
                tracing::warn!(error = %e, "Failed to clear rejected session");
            }
        }

        Err(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

const fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// The backend reports errors as `{"message": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
