//! reqwest-backed Miniflux client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{ErrorBody, UpdateEntriesRequest};
use super::{ApiError, ApiResult, EntryResultSet, EntryStatus, FeedApi, Filter, User};

const AUTH_HEADER: &str = "x-auth-token";

/// Client for the Miniflux REST API
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MinifluxClient {
    endpoint: String,
    http_client: Client,
}

impl MinifluxClient {
    /// Create a client for `endpoint` authenticated with an API token
    ///
    /// A trailing `/` or `/v1` on the endpoint is ignored.
    pub fn new(endpoint: &str, token: &str) -> ApiResult<Self> {
        let endpoint = normalize_endpoint(endpoint);
        url::Url::parse(&endpoint).map_err(|e| ApiError::InvalidConfig(format!("{endpoint}: {e}")))?;

        let mut token = HeaderValue::from_str(token)
            .map_err(|_| ApiError::InvalidConfig("API token contains invalid characters".to_string()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .user_agent(format!("fluxsave/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }

    /// Normalized base endpoint, without the `/v1` suffix
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.endpoint, path)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl FeedApi for MinifluxClient {
    async fn entries(&self, filter: &Filter) -> ApiResult<EntryResultSet> {
        let request = self
            .http_client
            .get(self.url("/entries"))
            .query(&filter.to_query());

        self.send_json(request).await
    }

    async fn save_entry(&self, entry_id: i64) -> ApiResult<()> {
        let request = self
            .http_client
            .post(self.url(&format!("/entries/{entry_id}/save")));

        self.send(request).await.map(|_| ())
    }

    async fn update_entries(&self, entry_ids: &[i64], status: EntryStatus) -> ApiResult<()> {
        let body = UpdateEntriesRequest { entry_ids, status };
        let request = self.http_client.put(self.url("/entries")).json(&body);

        self.send(request).await.map(|_| ())
    }

    async fn me(&self) -> ApiResult<User> {
        let request = self.http_client.get(self.url("/me"));
        self.send_json(request).await
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    let endpoint = endpoint.strip_suffix("/v1").unwrap_or(endpoint);
    endpoint.to_string()
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::BAD_REQUEST => Err(ApiError::BadRequest(error_message(response).await)),
        s if s.is_server_error() => Err(ApiError::Server {
            status: s.as_u16(),
            message: error_message(response).await,
        }),
        s => Err(ApiError::UnexpectedStatus(s.as_u16())),
    }
}

/// Extract `error_message` from a failure body, falling back to the raw text
async fn error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error_message)
        .unwrap_or(text)
}
