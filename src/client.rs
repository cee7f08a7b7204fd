// src/client.rs
// Outbound side of the lab: posts the form to the external simulation service and decodes its reply.
// The service is behind the SimulationService trait so the view can be driven by a stub in tests.

use crate::error::RunError;
use crate::model::{SimulationRequest, SimulationResponse};
use tracing::debug;

/// Path of the pendulum endpoint relative to the service base URL.
pub const PENDULUM_PATH: &str = "/sim/pendulum";

/// Anything that can turn a request into a simulation result.
#[allow(async_fn_in_trait)]
pub trait SimulationService {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse, RunError>;
}

/// Builds the full endpoint URL from a service base URL.
pub fn pendulum_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PENDULUM_PATH)
}

/// Talks to the real service over HTTP with the actix client.
#[derive(Debug, Clone)]
pub struct HttpSimulationService {
    endpoint: String,
}

impl HttpSimulationService {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: pendulum_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SimulationService for HttpSimulationService {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse, RunError> {
        // awc::Client is bound to the current worker thread, so one is built per call.
        // The default client gives up after 5 s; runs wait for the service however long it takes.
        let client = awc::Client::builder().disable_timeout().finish();

        // send_json sets Content-Type: application/json.
        let mut response = client.post(self.endpoint.as_str()).send_json(request).await?;

        let status = response.status();
        debug!(endpoint = %self.endpoint, %status, "simulation service replied");
        if !status.is_success() {
            return Err(RunError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.body().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
