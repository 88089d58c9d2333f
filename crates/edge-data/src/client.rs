//! Catalog client with dependency tagging.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use edge_core::{Locale, RequestId, StorefrontConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::dependency::DependencyTag;
use crate::error::CatalogError;
use crate::query::StorefrontQuery;
use crate::retry::RetryPolicy;
use crate::timeout::{pause, within, TimeoutConfig};

/// Transport to the catalog backend.
///
/// Returns the `data` member of the response.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn execute(&self, query: &StorefrontQuery) -> Result<Value, CatalogError>;
}

#[async_trait]
impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    async fn execute(&self, query: &StorefrontQuery) -> Result<Value, CatalogError> {
        (**self).execute(query).await
    }
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Unwrap a GraphQL response body into its `data`.
pub fn parse_response(operation: &str, body: &[u8]) -> Result<Value, CatalogError> {
    let response: GraphQlResponse =
        serde_json::from_slice(body).map_err(|e| CatalogError::decode(operation, e))?;
    if !response.errors.is_empty() {
        return Err(CatalogError::GraphQl {
            operation: operation.to_string(),
            messages: response.errors.into_iter().map(|e| e.message).collect(),
        });
    }
    Ok(response.data.unwrap_or(Value::Null))
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

/// Catalog access for one request.
///
/// Adds the buyer's locale to every operation and applies the timeout and
/// retry policy of the operation's dependency tag.
#[derive(Clone)]
pub struct Storefront {
    client: Arc<dyn CatalogClient>,
    locale: Locale,
    request_id: Option<RequestId>,
    policies: HashMap<DependencyTag, FetchPolicy>,
}

impl Storefront {
    pub fn new(client: Arc<dyn CatalogClient>, locale: Locale) -> Self {
        Self {
            client,
            locale,
            request_id: None,
            policies: HashMap::new(),
        }
    }

    /// Tag log events with the request id.
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Override the policy for one dependency.
    pub fn with_policy(mut self, tag: DependencyTag, policy: FetchPolicy) -> Self {
        self.policies.insert(tag, policy);
        self
    }

    /// Apply the configured per-tier budgets to the well-known dependencies.
    pub fn with_config(mut self, config: &StorefrontConfig) -> Self {
        let critical = FetchPolicy::new(
            TimeoutConfig::from_total(config.critical_timeout()),
            RetryPolicy::new(config.critical_retries),
        );
        let deferred = FetchPolicy::new(
            TimeoutConfig::from_total(config.deferred_timeout()),
            RetryPolicy::new(config.deferred_retries),
        );
        for tag in [
            DependencyTag::Product,
            DependencyTag::Collection,
            DependencyTag::FeaturedCollection,
        ] {
            self.policies.insert(tag, critical.clone());
        }
        self.policies.insert(DependencyTag::Recommendations, deferred);
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Policy in effect for a dependency.
    pub fn policy(&self, tag: DependencyTag) -> FetchPolicy {
        self.policies
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| FetchPolicy::from_tag(tag))
    }

    /// Run an operation and return its raw `data`.
    pub async fn execute(&self, tag: DependencyTag, query: StorefrontQuery) -> Result<Value, CatalogError> {
        let query = query.in_context(&self.locale);
        let policy = self.policy(tag);
        let operation = query.name;
        let request_id = self.request_id.as_ref().map(|id| id.0.as_str()).unwrap_or("-");

        let attempts = async {
            let mut attempt = 0;
            loop {
                let result = match within(policy.timeout.attempt, self.client.execute(&query)).await {
                    Some(result) => result,
                    None => Err(CatalogError::Timeout {
                        operation: operation.to_string(),
                        after: policy.timeout.attempt,
                    }),
                };
                match result {
                    Ok(data) => return Ok(data),
                    Err(e) if policy.retry.should_retry(&e, attempt) => {
                        let delay = policy.retry.backoff.delay_for_attempt(attempt);
                        tracing::debug!(
                            request_id,
                            operation,
                            dependency = %tag,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "retrying catalog operation"
                        );
                        pause(delay).await;
                        attempt += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let result = match within(policy.timeout.total, attempts).await {
            Some(result) => result,
            None => Err(CatalogError::Timeout {
                operation: operation.to_string(),
                after: policy.timeout.total,
            }),
        };
        if let Err(e) = &result {
            tracing::debug!(request_id, operation, dependency = %tag, error = %e, "catalog operation failed");
        }
        result
    }

    /// Run an operation and decode its `data` into `T`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        tag: DependencyTag,
        query: StorefrontQuery,
    ) -> Result<T, CatalogError> {
        let operation = query.name;
        let data = self.execute(tag, query).await?;
        serde_json::from_value(data).map_err(|e| CatalogError::decode(operation, e))
    }
}

/// GraphQL-over-HTTP transport for Spin components.
#[cfg(target_arch = "wasm32")]
pub struct SpinCatalogClient {
    endpoint: String,
    access_token: Option<String>,
}

#[cfg(target_arch = "wasm32")]
impl SpinCatalogClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait]
impl CatalogClient for SpinCatalogClient {
    async fn execute(&self, query: &StorefrontQuery) -> Result<Value, CatalogError> {
        let body = query.to_body().map_err(|e| CatalogError::decode(query.name, e))?;
        let mut builder = spin_sdk::http::Request::builder();
        builder
            .method(spin_sdk::http::Method::Post)
            .uri(self.endpoint.as_str())
            .header("content-type", "application/json");
        if let Some(token) = &self.access_token {
            builder.header("x-shopify-storefront-access-token", token.as_str());
        }
        let req = builder.body(body).build();

        let resp: spin_sdk::http::Response = spin_sdk::http::send(req)
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        let status = *resp.status();
        if status >= 400 {
            return Err(CatalogError::Http {
                status,
                operation: query.name.to_string(),
            });
        }
        parse_response(query.name, resp.body())
    }
}
