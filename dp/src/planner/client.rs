//! PlanClient trait definition

use async_trait::async_trait;

use super::PlanError;

/// Stateless planning client - one request, one plan
///
/// Implementations send the task text verbatim and return the plan text
/// verbatim. No retries happen at this layer.
#[async_trait]
pub trait PlanClient: Send + Sync {
    /// Request a plan for the given newline-separated task list
    async fn plan_day(&self, tasks: &str) -> Result<String, PlanError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Scripted planning client for unit tests
    ///
    /// Each call consumes the next scripted outcome; `Err(msg)` becomes an
    /// `InvalidResponse` failure.
    pub struct MockPlanClient {
        outcomes: Vec<Result<String, String>>,
        call_count: AtomicUsize,
        received: Mutex<Vec<String>>,
    }

    impl MockPlanClient {
        pub fn new(outcomes: Vec<Result<String, String>>) -> Self {
            debug!(outcome_count = %outcomes.len(), "MockPlanClient::new: called");
            Self {
                outcomes,
                call_count: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Task strings seen so far, in call order
        pub fn received(&self) -> Vec<String> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlanClient for MockPlanClient {
        async fn plan_day(&self, tasks: &str) -> Result<String, PlanError> {
            debug!(%tasks, "MockPlanClient::plan_day: called");
            self.received.lock().unwrap().push(tasks.to_string());
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.outcomes.get(idx) {
                Some(Ok(plan)) => Ok(plan.clone()),
                Some(Err(msg)) => Err(PlanError::InvalidResponse(msg.clone())),
                None => Err(PlanError::InvalidResponse("No more mock outcomes".to_string())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_outcomes_in_order() {
            let client = MockPlanClient::new(vec![Ok("plan 1".to_string()), Err("boom".to_string())]);

            assert_eq!(client.plan_day("a").await.unwrap(), "plan 1");
            assert!(client.plan_day("b").await.is_err());
            assert!(client.plan_day("c").await.is_err());

            assert_eq!(client.call_count(), 3);
            assert_eq!(client.received(), vec!["a", "b", "c"]);
        }
    }
}
