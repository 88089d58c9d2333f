//! In-process catalog backend.
//!
//! Serves canned `data` per operation name. Failures and latency can be
//! injected per operation, and every call is recorded, which is what page
//! and loader tests drive.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::query::StorefrontQuery;
use crate::timeout::pause;

#[derive(Debug, Clone)]
struct Failure {
    error: CatalogError,
    /// `None` fails every call.
    remaining: Option<usize>,
}

#[derive(Default)]
struct State {
    responses: HashMap<&'static str, Value>,
    failures: HashMap<&'static str, Failure>,
    delays: HashMap<&'static str, Duration>,
    calls: Vec<(&'static str, Map<String, Value>)>,
}

/// Catalog backed by canned responses.
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<State>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `operation` with `data`.
    pub fn with_response(self, operation: &'static str, data: Value) -> Self {
        self.lock().responses.insert(operation, data);
        self
    }

    /// Fail every call to `operation`.
    pub fn with_failure(self, operation: &'static str, error: CatalogError) -> Self {
        self.lock()
            .failures
            .insert(operation, Failure { error, remaining: None });
        self
    }

    /// Fail the next `times` calls to `operation`, then respond normally.
    pub fn with_transient_failure(self, operation: &'static str, error: CatalogError, times: usize) -> Self {
        self.lock().failures.insert(
            operation,
            Failure {
                error,
                remaining: Some(times),
            },
        );
        self
    }

    /// Delay every call to `operation`.
    pub fn with_delay(self, operation: &'static str, delay: Duration) -> Self {
        self.lock().delays.insert(operation, delay);
        self
    }

    /// Number of calls made to `operation`.
    pub fn calls(&self, operation: &str) -> usize {
        self.lock().calls.iter().filter(|(name, _)| *name == operation).count()
    }

    /// Variables of the most recent call to `operation`.
    pub fn last_variables(&self, operation: &str) -> Option<Map<String, Value>> {
        self.lock()
            .calls
            .iter()
            .rev()
            .find(|(name, _)| *name == operation)
            .map(|(_, vars)| vars.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-call; the state is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(&self, query: &StorefrontQuery) -> Result<Value, CatalogError> {
        let mut state = self.lock();
        state.calls.push((query.name, query.variables.clone()));

        if let Some(failure) = state.failures.get_mut(query.name) {
            match &mut failure.remaining {
                None => return Err(failure.error.clone()),
                Some(0) => {}
                Some(n) => {
                    *n -= 1;
                    return Err(failure.error.clone());
                }
            }
        }

        state
            .responses
            .get(query.name)
            .cloned()
            .ok_or_else(|| CatalogError::GraphQl {
                operation: query.name.to_string(),
                messages: vec![format!("no response registered for {}", query.name)],
            })
    }
}

#[async_trait]
impl CatalogClient for MemoryCatalog {
    async fn execute(&self, query: &StorefrontQuery) -> Result<Value, CatalogError> {
        let delay = self.lock().delays.get(query.name).copied();
        if let Some(delay) = delay {
            pause(delay).await;
        }
        self.respond(query)
    }
}
