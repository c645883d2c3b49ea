//! HTTP request pipeline with silent token refresh
//!
//! Every request carries `Authorization: Bearer <token>` when one is stored.
//! A 401 on anything but login/register triggers a single refresh against
//! the HTTP-only cookie and one replay of the original request; a failed
//! refresh forces a client-side logout. The retry is strictly one-shot per
//! original request.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, ClientResult},
    models::{AccessTokenData, ApiEnvelope},
    store::SessionStore,
};

/// API client wrapping a reqwest client and the session store
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a new API client. The cookie store holds the HTTP-only
    /// refresh cookie the same way a browser would.
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }

    /// The session store behind this client
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiEnvelope<T>> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiEnvelope<T>> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<ApiEnvelope<T>> {
        self.request::<(), T>(Method::POST, path, None).await
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiEnvelope<T>> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ClientResult<ApiEnvelope<T>> {
        self.request::<(), T>(Method::DELETE, path, None).await
    }

    async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<ApiEnvelope<T>> {
        let response = self.send(method.clone(), path, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !is_auth_entry_point(path) {
            debug!("Got 401 on {}, attempting silent refresh", path);
            match self.refresh_access_token().await {
                Ok(access_token) => {
                    self.store.set_access_token(access_token);
                    // One replay only; a second 401 surfaces as-is
                    let retried = self.send(method, path, body).await?;
                    return Self::parse(retried).await;
                }
                Err(e) => {
                    warn!("Token refresh failed, logging out: {}", e);
                    self.store.logout();
                    return Err(e);
                }
            }
        }

        Self::parse(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<reqwest::Response> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        if let Some(token) = self.store.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Ask the server for a fresh access token. Relies on the HTTP-only
    /// refresh cookie held by the cookie store, not on the in-memory token,
    /// so no Authorization header is attached.
    async fn refresh_access_token(&self) -> ClientResult<String> {
        let response = self
            .http
            .post(format!("{}/api/auth/refresh", self.base_url))
            .send()
            .await?;

        let envelope: ApiEnvelope<AccessTokenData> = Self::parse(response).await?;
        envelope
            .data
            .map(|data| data.access_token)
            .ok_or(ClientError::MissingData)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<ApiEnvelope<T>> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .map(|envelope| envelope.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Login and register must fail straight through: a 401 there is a real
/// credential rejection, not a stale access token.
fn is_auth_entry_point(path: &str) -> bool {
    path.contains("/auth/login") || path.contains("/auth/register")
}
