use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{
    Client, Method, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use spade_observability as observability;

use crate::{
    auth::AuthTokenBuilder,
    config::SpadeApiConfig,
    error::SpadeApiError,
    types::{
        PieceManifest, ResponseDealRequest, ResponseEnvelope, ResponsePendingProposals,
        ResponsePiecesEligible,
    },
};

/// Calls the deal engine exposes to a storage provider.
///
/// Every call is authenticated with a freshly built credential. A 200
/// response whose envelope carries an `error_slug` is returned as
/// [`SpadeApiError::Rejected`].
#[async_trait]
pub trait SpadeApi: Send + Sync {
    async fn list_pending(
        &self,
    ) -> Result<ResponseEnvelope<ResponsePendingProposals>, SpadeApiError>;

    async fn list_eligible(
        &self,
    ) -> Result<ResponseEnvelope<ResponsePiecesEligible>, SpadeApiError>;

    /// Reserve `piece_cid` under `tenant_policy_cid`.
    async fn invoke(
        &self,
        piece_cid: &str,
        tenant_policy_cid: &str,
    ) -> Result<ResponseEnvelope<ResponseDealRequest>, SpadeApiError>;

    async fn piece_manifest(
        &self,
        proposal_id: &str,
    ) -> Result<ResponseEnvelope<PieceManifest>, SpadeApiError>;
}

/// [`SpadeApi`] over HTTPS.
pub struct SpadeHttpGateway {
    client: Client,
    config: SpadeApiConfig,
    auth: AuthTokenBuilder,
}

impl SpadeHttpGateway {
    pub fn new(config: SpadeApiConfig, auth: AuthTokenBuilder) -> Result<Self, SpadeApiError> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        if config.insecure_skip_verify {
            tracing::warn!(url = %config.url, "TLS certificate verification disabled for deal engine");
        }

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    /// Authenticated request to `path`. For POST, `payload` is also sent as
    /// the form body so the signature covers the call parameters.
    async fn send<T>(
        &self,
        endpoint: &'static str,
        method: Method,
        path: &str,
        payload: Option<&str>,
    ) -> Result<ResponseEnvelope<T>, SpadeApiError>
    where
        T: DeserializeOwned + Default,
    {
        let started = Instant::now();
        let result = self.try_send(endpoint, method, path, payload).await;
        let status = match &result {
            Ok(_) => "ok",
            Err(err) => err.kind().as_str(),
        };
        observability::record_spade_request(endpoint, status, started.elapsed());
        result
    }

    async fn try_send<T>(
        &self,
        endpoint: &'static str,
        method: Method,
        path: &str,
        payload: Option<&str>,
    ) -> Result<ResponseEnvelope<T>, SpadeApiError>
    where
        T: DeserializeOwned + Default,
    {
        let credential = self.auth.credential(payload).await?;

        let mut request = self
            .client
            .request(method.clone(), self.config.endpoint(path))
            .header(AUTHORIZATION, credential.to_string());
        if method == Method::POST
            && let Some(body) = payload
        {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(SpadeApiError::Unauthorized { body });
        }
        if status != StatusCode::OK {
            tracing::debug!(endpoint, status = status.as_u16(), body = %body, "Deal engine returned non-200 response");
            return Err(SpadeApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ResponseEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(source) => return Err(SpadeApiError::Decode { source, body }),
        };

        if let Some(slug) = envelope.rejection_slug() {
            let slug = slug.to_string();
            let error = SpadeApiError::rejected(&slug, envelope.error_code, envelope.error_lines);
            observability::record_spade_rejection(endpoint, error.rejection_label());
            return Err(error);
        }

        Ok(envelope)
    }
}

#[async_trait]
impl SpadeApi for SpadeHttpGateway {
    async fn list_pending(
        &self,
    ) -> Result<ResponseEnvelope<ResponsePendingProposals>, SpadeApiError> {
        self.send("pending_proposals", Method::GET, "/pending_proposals", None)
            .await
    }

    async fn list_eligible(
        &self,
    ) -> Result<ResponseEnvelope<ResponsePiecesEligible>, SpadeApiError> {
        self.send("eligible_pieces", Method::GET, "/eligible_pieces", None)
            .await
    }

    async fn invoke(
        &self,
        piece_cid: &str,
        tenant_policy_cid: &str,
    ) -> Result<ResponseEnvelope<ResponseDealRequest>, SpadeApiError> {
        let call =
            format!("call=reserve_piece&piece_cid={piece_cid}&tenant_policy={tenant_policy_cid}");
        self.send("invoke", Method::POST, "/invoke", Some(&call))
            .await
    }

    async fn piece_manifest(
        &self,
        proposal_id: &str,
    ) -> Result<ResponseEnvelope<PieceManifest>, SpadeApiError> {
        let path = format!("/piece_manifest?proposal={proposal_id}");
        self.send("piece_manifest", Method::GET, &path, None).await
    }
}
