//! Query client for the analytics backend.
//!
//! Validates endpoint names, bounds every call with the endpoint timeout and
//! decodes results into domain entities. Failures surface immediately; there
//! is no retry.

use std::time::{Duration, Instant};

use dashboard_telemetry::log_query_event;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::domain::{
    ClientUsage, DashboardConfig, EditionBreakdown, Endpoint, ExpiringLicense, LoadConfig,
    ModuleUsage, QueryRequest, SummaryStats, TrendPoint,
};
use crate::error::{QueryResult, RemoteQueryError};
use crate::metrics;
use crate::ports::RpcTransport;

/// Typed client over an [`RpcTransport`].
pub struct QueryClient<T: RpcTransport> {
    transport: T,
    load: LoadConfig,
}

impl<T: RpcTransport> QueryClient<T> {
    /// Create a client using the timeouts of `config`.
    pub fn new(transport: T, config: &DashboardConfig) -> Self {
        Self {
            transport,
            load: config.load.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Timeout applied to `endpoint`.
    pub fn timeout_for(&self, endpoint: Endpoint) -> Duration {
        self.load.timeout_for(endpoint)
    }

    /// Issue a query by remote method name and return the raw result.
    ///
    /// Unknown names are rejected before the transport is touched.
    pub async fn query(
        &self,
        endpoint_name: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> QueryResult<Value> {
        let endpoint = Endpoint::from_name(endpoint_name)
            .ok_or_else(|| RemoteQueryError::UnknownEndpoint(endpoint_name.to_string()))?;

        self.call(QueryRequest::new(endpoint, args, kwargs)).await
    }

    /// Global counts. A `null`/`false` answer reads as all zeros.
    pub async fn license_statistics(&self) -> QueryResult<SummaryStats> {
        self.fetch(Endpoint::LicenseStatistics, vec![]).await
    }

    pub async fn license_by_edition(&self) -> QueryResult<EditionBreakdown> {
        self.fetch(Endpoint::LicenseByEdition, vec![]).await
    }

    /// Monthly issuance counts for the last `months` months.
    pub async fn license_trends(&self, months: u32) -> QueryResult<Vec<TrendPoint>> {
        self.fetch(Endpoint::LicenseTrends, vec![json!(months)]).await
    }

    /// Top `limit` clients by license count.
    pub async fn license_by_client(&self, limit: u32) -> QueryResult<Vec<ClientUsage>> {
        self.fetch(Endpoint::LicenseByClient, vec![json!(limit)]).await
    }

    pub async fn module_usage(&self) -> QueryResult<Vec<ModuleUsage>> {
        self.fetch(Endpoint::ModuleUsage, vec![]).await
    }

    /// Licenses expiring within `days` days.
    pub async fn expiring_licenses(&self, days: u32) -> QueryResult<Vec<ExpiringLicense>> {
        self.fetch(Endpoint::ExpiringLicenses, vec![json!(days)]).await
    }

    async fn fetch<R>(&self, endpoint: Endpoint, args: Vec<Value>) -> QueryResult<R>
    where
        R: DeserializeOwned + Default,
    {
        let value = self.call(QueryRequest::positional(endpoint, args)).await?;
        decode(endpoint, value)
    }

    async fn call(&self, request: QueryRequest) -> QueryResult<Value> {
        let endpoint = request.endpoint;
        let timeout = self.timeout_for(endpoint);

        metrics::record_query_issued(endpoint.name());
        log_query_event!(
            debug,
            endpoint,
            "Query issued",
            args = request.args.len(),
            timeout_ms = timeout.as_millis() as u64
        );

        let start = Instant::now();
        let result = match tokio::time::timeout(timeout, self.transport.call(&request)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteQueryError::Timeout {
                endpoint: endpoint.name().to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        };
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                metrics::record_query_finished(endpoint.name(), elapsed.as_secs_f64(), None);
                log_query_event!(
                    debug,
                    endpoint,
                    "Query completed",
                    elapsed_ms = elapsed.as_millis() as u64
                );
            }
            Err(e) => {
                metrics::record_query_finished(
                    endpoint.name(),
                    elapsed.as_secs_f64(),
                    Some(e.kind()),
                );
                log_query_event!(
                    debug,
                    endpoint,
                    "Query failed",
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64
                );
            }
        }

        result
    }
}

/// Decode a raw result. The backend answers `false` or `null` for "nothing".
fn decode<R>(endpoint: Endpoint, value: Value) -> QueryResult<R>
where
    R: DeserializeOwned + Default,
{
    match value {
        Value::Null | Value::Bool(false) => Ok(R::default()),
        value => serde_json::from_value(value)
            .map_err(|e| RemoteQueryError::Decode(format!("{endpoint}: {e}"))),
    }
}
