//! Wire types for the planning service

use serde::{Deserialize, Serialize};

/// Body of `POST /plan-day`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub tasks: String,
}

/// Successful response from `POST /plan-day`
///
/// Unknown fields are ignored; a body without `plan` fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
}
