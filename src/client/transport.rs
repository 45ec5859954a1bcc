// HTTP transport bound to one Configuration snapshot

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::config::Configuration;
use crate::error::ApiError;

/// Issues requests against `configuration.base_path()` + `prefix`.
///
/// The bearer credential is resolved when each request is built, so a
/// transport created before login still picks up the new token. Failures
/// are returned once; nothing here retries.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    config: Arc<Configuration>,
    prefix: Arc<str>,
}

impl Transport {
    pub fn new(http: reqwest::Client, config: Arc<Configuration>, prefix: &str) -> Self {
        Self {
            http,
            config,
            prefix: Arc::from(prefix.trim_end_matches('/')),
        }
    }

    /// Same client and configuration, addressing the server root.
    pub fn at_root(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            prefix: Arc::from(""),
        }
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_path(), self.prefix, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "API request");

        let request = self.http.request(method, url);
        match self.config.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "API error response");
            return Err(ApiError::from_body(status, &body));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        Self::decode(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::decode(response).await
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::POST, path)).await?;
        Self::decode(response).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::PATCH, path).json(body)).await?;
        Self::decode(response).await
    }

    /// DELETE, discarding any response body (204 or a message).
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn delete_with<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        Self::decode(response).await
    }
}
