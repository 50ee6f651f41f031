//! HTTP implementation of the service-client seam.
//!
//! Calls carry a bearer credential when bound to an identity and a fresh
//! request id for correlation. Responses use the backend's envelope shape:
//! `{ "data": ... }` on success, `{ "error": { code, message } }` on
//! application failure.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use veritag_core::{AuthContext, Principal, Role, VerificationStatus};
use veritag_identity::IdentityHandle;

use crate::{ClientError, ClientFactory, ServiceClient};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    code: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: Option<T>,
    error: Option<ApiErrorBody>,
}

/// Factory binding identities to HTTP clients against one backend.
///
/// The underlying `reqwest::Client` and base URL are shared; only the signing
/// credential differs per binding, so `bind` stays pure in its inputs.
#[derive(Clone)]
pub struct HttpClientFactory {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClientFactory {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to construct HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl ClientFactory for HttpClientFactory {
    fn bind(&self, identity: Option<&IdentityHandle>) -> Arc<dyn ServiceClient> {
        Arc::new(HttpServiceClient {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            binding: identity.map(|handle| Binding {
                principal: handle.principal().clone(),
                token: handle.bearer_token().to_string(),
            }),
        })
    }
}

#[derive(Clone)]
struct Binding {
    principal: Principal,
    token: String,
}

/// A service client bound to one identity (or anonymous).
pub struct HttpServiceClient {
    base_url: String,
    http: reqwest::Client,
    binding: Option<Binding>,
}

impl HttpServiceClient {
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string());
        if let Some(binding) = &self.binding {
            req = req.bearer_auth(&binding.token);
        }
        req
    }

    /// Map the response status: 5xx is transport trouble, other non-success
    /// is a rejection. Success passes the response through for decoding.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Network(format!("{status}: {body}")));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    /// Fire a call whose success carries no payload; any ack body is ignored.
    async fn acknowledge(&self, req: reqwest::RequestBuilder) -> Result<(), ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;
        let resp = Self::check_status(resp).await?;
        let status = resp.status();

        let envelope: ApiEnvelope<T> = resp
            .json()
            .await
            .map_err(|err| ClientError::Payload(err.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: error.message,
            });
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Payload("envelope carried neither data nor error".to_string()))
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    fn bound_principal(&self) -> Option<&Principal> {
        self.binding.as_ref().map(|b| &b.principal)
    }

    async fn get_auth_context(&self) -> Result<AuthContext, ClientError> {
        self.execute(self.request(reqwest::Method::GET, "/api/auth/context"))
            .await
    }

    async fn initialize_session(
        &self,
        role_hint: Option<Role>,
    ) -> Result<AuthContext, ClientError> {
        tracing::info!(role = ?role_hint, "initializing session with backend");
        self.execute(
            self.request(reqwest::Method::POST, "/api/auth/session")
                .json(&serde_json::json!({ "selected_role": role_hint })),
        )
        .await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        // Ack bodies vary across backend versions (empty, `{"data":null}`);
        // only the status matters.
        self.acknowledge(self.request(reqwest::Method::POST, "/api/auth/logout"))
            .await
    }

    async fn verify_product(&self, code: &str) -> Result<VerificationStatus, ClientError> {
        self.execute(
            self.request(reqwest::Method::POST, "/api/verifications")
                .json(&serde_json::json!({ "unique_code": code })),
        )
        .await
    }
}
