//! Planner controller
//!
//! Owns the current [`PlannerState`] and a [`PlanClient`], and turns effects
//! produced by the reducer into network calls.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::state::{Effect, PlannerEvent, PlannerState, reduce};
use super::PlanClient;

/// Execute one effect and report its outcome as the event to feed back
///
/// Free function so background tasks can run it without borrowing a Planner.
pub async fn run_effect(client: Arc<dyn PlanClient>, effect: Effect) -> PlannerEvent {
    match effect {
        Effect::RequestPlan { request, tasks } => {
            debug!(%request, "run_effect: requesting plan");
            match client.plan_day(&tasks).await {
                Ok(plan) => {
                    info!(%request, plan_len = plan.len(), "Plan received");
                    PlannerEvent::PlanReceived { request, plan }
                }
                Err(e) => {
                    warn!(%request, status = ?e.status(), error = %e, "Plan request failed");
                    PlannerEvent::PlanFailed {
                        request,
                        reason: e.to_string(),
                    }
                }
            }
        }
    }
}

/// Stateful wrapper around the planner reducer
pub struct Planner {
    state: PlannerState,
    client: Arc<dyn PlanClient>,
}

impl Planner {
    pub fn new(client: Arc<dyn PlanClient>) -> Self {
        debug!("Planner::new: called");
        Self {
            state: PlannerState::new(),
            client,
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    /// Shared handle to the client, for spawning effects elsewhere
    pub fn client(&self) -> Arc<dyn PlanClient> {
        Arc::clone(&self.client)
    }

    /// Apply an event and return any effect the caller must run
    pub fn dispatch(&mut self, event: PlannerEvent) -> Option<Effect> {
        let transition = reduce(&self.state, event);
        self.state = transition.state;
        transition.effect
    }

    /// Replace the task text verbatim
    pub fn update_tasks(&mut self, tasks: impl Into<String>) {
        self.dispatch(PlannerEvent::TasksEdited(tasks.into()));
    }

    /// Submit and wait for the outcome (batch mode)
    pub async fn submit(&mut self, gate_open: bool) -> &PlannerState {
        debug!(gate_open, "Planner::submit: called");
        if let Some(effect) = self.dispatch(PlannerEvent::SubmitRequested { gate_open }) {
            let outcome = run_effect(self.client(), effect).await;
            self.dispatch(outcome);
        }
        &self.state
    }
}
