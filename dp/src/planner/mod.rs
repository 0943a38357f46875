//! Planner module for DailyPlanner
//!
//! The task form and its plan: a pure reducer over view state, a client
//! trait for the scheduling service, and the reqwest implementation.

pub mod client;
mod error;
mod http;
mod session;
pub mod state;
mod types;

pub use client::PlanClient;
pub use error::PlanError;
pub use http::HttpPlanClient;
pub use session::{Planner, run_effect};
pub use state::{
    CONNECT_REQUIRED_MESSAGE, Effect, FETCH_FAILED_MESSAGE, PlannerEvent, PlannerState, RequestId, Transition, reduce,
};
pub use types::{PlanRequest, PlanResponse};
