//! HTTP planning client
//!
//! Implements PlanClient against `POST <base-url>/plan-day`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::{PlanRequest, PlanResponse};
use super::{PlanClient, PlanError};
use crate::config::PlannerConfig;

/// Longest error body kept for logging
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed planning client
pub struct HttpPlanClient {
    endpoint: Url,
    http: Client,
}

impl HttpPlanClient {
    /// Create a client from planner configuration
    ///
    /// No timeout is applied unless `timeout-ms` is configured.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlanError> {
        debug!(?config, "from_config: called");
        let endpoint = Url::parse(&config.endpoint()).map_err(|e| PlanError::Config(format!("{}: {}", config.endpoint(), e)))?;

        let mut builder = Client::builder().user_agent(concat!("DailyPlanner/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            debug!(?timeout, "from_config: applying request timeout");
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(PlanError::Network)?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PlanClient for HttpPlanClient {
    async fn plan_day(&self, tasks: &str) -> Result<String, PlanError> {
        debug!(endpoint = %self.endpoint, tasks_len = tasks.len(), "plan_day: called");
        let body = PlanRequest {
            tasks: tasks.to_string(),
        };

        let response = self.http.post(self.endpoint.clone()).json(&body).send().await?;
        let status = response.status();
        debug!(%status, "plan_day: response received");

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!(%status, %body, "plan_day: service returned error status");
            return Err(PlanError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text).inspect_err(|e| {
            warn!(error = %e, "plan_day: response body is not JSON");
        })?;
        let parsed: PlanResponse = serde_json::from_value(body).map_err(|e| {
            warn!(error = %e, "plan_day: response body has no plan");
            PlanError::InvalidResponse(format!("expected {{\"plan\": string}}: {}", e))
        })?;

        debug!(plan_len = parsed.plan.len(), "plan_day: plan parsed");
        Ok(parsed.plan)
    }
}
