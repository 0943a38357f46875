//! Planner view state and its transition function
//!
//! Pure data plus `reduce`; no I/O and no rendering here. Every user action
//! and every response becomes a [`PlannerEvent`], and `reduce` returns the
//! next immutable [`PlannerState`] together with at most one [`Effect`] for
//! the caller to execute.

use std::fmt;

use tracing::debug;

/// Shown for any planning failure, whatever the cause
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch the plan. Please try again.";

/// Shown when submitting while the wallet gate is closed
pub const CONNECT_REQUIRED_MESSAGE: &str = "Please connect your wallet first.";

/// Identifies one submit; later submits get larger ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inputs to the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerEvent {
    /// Task text replaced wholesale by the editor
    TasksEdited(String),
    /// "Plan My Day" pressed
    SubmitRequested { gate_open: bool },
    /// Service answered with a plan
    PlanReceived { request: RequestId, plan: String },
    /// Request failed; `reason` is for logs only
    PlanFailed { request: RequestId, reason: String },
}

/// Work the caller must perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one planning request with exactly these tasks
    RequestPlan { request: RequestId, tasks: String },
}

/// Snapshot of everything the planner screen shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerState {
    tasks: String,
    plan: Option<String>,
    error: Option<String>,
    in_flight: Option<RequestId>,
    issued: u64,
}

impl PlannerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &str {
        &self.tasks
    }

    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a request is awaiting its response
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The request whose response will be accepted
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Number of requests issued so far
    pub fn requests_issued(&self) -> u64 {
        self.issued
    }
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: PlannerState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn quiet(state: PlannerState) -> Self {
        Self { state, effect: None }
    }
}

/// Apply `event` to `state`
///
/// Responses are accepted only for the most recent request; anything older
/// is dropped so a slow early response can never overwrite a newer one.
pub fn reduce(state: &PlannerState, event: PlannerEvent) -> Transition {
    match event {
        PlannerEvent::TasksEdited(tasks) => {
            debug!(tasks_len = tasks.len(), "reduce: TasksEdited");
            Transition::quiet(PlannerState { tasks, ..state.clone() })
        }
        PlannerEvent::SubmitRequested { gate_open: false } => {
            debug!("reduce: SubmitRequested with gate closed");
            Transition::quiet(PlannerState {
                error: Some(CONNECT_REQUIRED_MESSAGE.to_string()),
                ..state.clone()
            })
        }
        PlannerEvent::SubmitRequested { gate_open: true } => {
            let request = RequestId(state.issued + 1);
            if let Some(previous) = state.in_flight {
                debug!(%previous, %request, "reduce: superseding in-flight request");
            } else {
                debug!(%request, "reduce: SubmitRequested");
            }
            let next = PlannerState {
                in_flight: Some(request),
                issued: request.0,
                ..state.clone()
            };
            let effect = Effect::RequestPlan {
                request,
                tasks: next.tasks.clone(),
            };
            Transition {
                state: next,
                effect: Some(effect),
            }
        }
        PlannerEvent::PlanReceived { request, plan } => {
            if state.in_flight != Some(request) {
                debug!(%request, in_flight = ?state.in_flight, "reduce: dropping stale plan");
                return Transition::quiet(state.clone());
            }
            debug!(%request, plan_len = plan.len(), "reduce: PlanReceived");
            Transition::quiet(PlannerState {
                plan: Some(plan),
                error: None,
                in_flight: None,
                ..state.clone()
            })
        }
        PlannerEvent::PlanFailed { request, reason } => {
            if state.in_flight != Some(request) {
                debug!(%request, %reason, "reduce: dropping stale failure");
                return Transition::quiet(state.clone());
            }
            debug!(%request, %reason, "reduce: PlanFailed");
            Transition::quiet(PlannerState {
                error: Some(FETCH_FAILED_MESSAGE.to_string()),
                in_flight: None,
                ..state.clone()
            })
        }
    }
}
