use std::collections::HashMap;

use reqwest::Url;
use serde::Deserialize;

use switchboard_core::{
    flags::{EvaluateRequest, EvaluationResult},
    Error, Result,
};

use crate::ClientConfig;

/// A client for the server-authoritative evaluation endpoint.
///
/// Unlike [`Client`](crate::Client), this performs one HTTP round-trip per call and evaluates
/// nothing locally. The server runs the same decision procedure over its own store, so both paths
/// return identical results for identical inputs; pick this one when you'd rather pay latency
/// than hold a snapshot.
pub struct EvaluationClient {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
    config: ClientConfig,
}

/// Server response for remote evaluation: per-key results wrapped in a metadata envelope.
#[derive(Debug, Deserialize)]
pub struct EvaluateResponse {
    /// Response metadata.
    pub meta: ResponseMeta,
    /// Evaluation results, one entry per requested key.
    pub data: HashMap<String, EvaluationResult>,
}

/// Metadata envelope of an [`EvaluateResponse`].
#[derive(Debug, Deserialize)]
pub struct ResponseMeta {
    /// Server clock at evaluation time, in milliseconds since the Unix epoch.
    pub server_time: i64,
}

impl EvaluationClient {
    /// Create a new `EvaluationClient` using the specified configuration.
    pub fn new(config: ClientConfig) -> EvaluationClient {
        EvaluationClient {
            client: reqwest::blocking::Client::new(),
            config,
        }
    }

    /// Evaluate the requested keys on the server.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBaseUrl`] if the configured base URL cannot be parsed.
    /// - [`Error::Unauthorized`] if the API token is rejected.
    /// - [`Error::Network`] for transport-level failures and non-success responses.
    pub fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluateResponse> {
        let url = Url::parse(&self.config.base_url)
            .and_then(|url| url.join("/v1/evaluate"))
            .map_err(Error::InvalidBaseUrl)?;

        log::debug!(target: "switchboard", keys:serde = request.keys; "requesting remote evaluation");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_token)
            .json(request)
            .send()?;

        let response = response.error_for_status().map_err(|err| {
            if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
                log::warn!(target: "switchboard", "client is not authorized. Check your API token");
                Error::Unauthorized
            } else {
                Error::from(err)
            }
        })?;

        Ok(response.json()?)
    }
}
