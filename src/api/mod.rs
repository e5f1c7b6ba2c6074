//! HTTP access to the learning backend.
//!
//! [`ApiClient::call`] is the only place requests are sent. Endpoint wrappers
//! live in the submodules, one per backend blueprint.

mod analytics;
mod assignments;
mod auth;
mod tasks;
mod vocab;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// The client keeps a cookie jar, so the backend's session cookie is
    /// replayed on every later call.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(Method::POST, path, Some(body)).await
    }

    pub async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request: RequestBuilder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, path, error = %err, "request failed");
                return Err(ApiError::from(err));
            }
        };

        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%method, path, status = status.as_u16(), "api call");

        if !status.is_success() {
            let err = ApiError::from_response(status, &bytes);
            tracing::info!(%method, path, status = status.as_u16(), error = %err, "api error");
            return Err(err);
        }

        decode_body(&bytes)
    }
}

/// A success body that is empty or not JSON reads as `{}`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_slice(b"{}").map_err(|err| ApiError::decode(err.to_string())),
    }
}
