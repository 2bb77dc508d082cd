use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::endpoint::Endpoint;
use super::types::{AppointmentEnvelope, AppointmentsEnvelope, ErrorBody, QueueEnvelope};
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::models::{AppointmentView, QueueDetail, TodayQueues};
use crate::token::TokenProvider;

/// Authenticated read-only client for the hospital REST backend.
///
/// Cheap to clone: the underlying `reqwest::Client` and token provider
/// are shared.
#[derive(Clone)]
pub struct QueueApiClient {
    base_url: Url,
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl QueueApiClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::Transport(format!("Invalid base URL {}: {e}", config.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// One authenticated GET. The token is read from the provider on every
    /// call; nothing is cached here.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, FetchError> {
        let token = self.tokens.bearer_token().await.map_err(|e| {
            tracing::debug!(error = %e, %endpoint, "No bearer token for request");
            FetchError::MissingToken
        })?;
        let url = self.url_for(endpoint)?;

        let response = self.http.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = FetchError::from_status(status.as_u16(), ErrorBody::message_from(&body));
            tracing::debug!(status = status.as_u16(), %endpoint, "Request rejected");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    pub async fn patient_appointments(&self) -> Result<Vec<AppointmentView>, FetchError> {
        let envelope: AppointmentsEnvelope = self.get_json(&Endpoint::PatientAppointments).await?;
        Ok(envelope.appointments)
    }

    pub async fn patient_appointment(&self, id: &str) -> Result<AppointmentView, FetchError> {
        let envelope: AppointmentEnvelope = self
            .get_json(&Endpoint::PatientAppointmentDetail(id.to_string()))
            .await?;
        Ok(envelope.appointment)
    }

    pub async fn today_queues(&self) -> Result<TodayQueues, FetchError> {
        self.get_json(&Endpoint::TodayQueues).await
    }

    pub async fn queue_detail(&self, queue_id: &str) -> Result<QueueDetail, FetchError> {
        let envelope: QueueEnvelope = self
            .get_json(&Endpoint::QueueDetail(queue_id.to_string()))
            .await?;
        Ok(envelope.queue)
    }

    fn url_for(&self, endpoint: &Endpoint) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("Base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }
}

impl std::fmt::Debug for QueueApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
