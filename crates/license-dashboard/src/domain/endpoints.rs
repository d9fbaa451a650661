//! Analytic endpoint registry.
//!
//! The backend exposes exactly six read-only query operations. Only
//! `get_license_statistics` is on the critical path; the rest feed the
//! secondary dashboard sections.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

/// Recognized analytic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Global counts: total / active / expired / expiring soon
    LicenseStatistics,
    /// License count per edition
    LicenseByEdition,
    /// Monthly issuance counts
    LicenseTrends,
    /// Clients holding the most licenses
    LicenseByClient,
    /// How many licenses include each module
    ModuleUsage,
    /// Licenses expiring within a horizon
    ExpiringLicenses,
}

impl Endpoint {
    /// All endpoints in dashboard load order.
    pub const ALL: [Endpoint; 6] = [
        Endpoint::LicenseStatistics,
        Endpoint::LicenseByEdition,
        Endpoint::LicenseTrends,
        Endpoint::LicenseByClient,
        Endpoint::ModuleUsage,
        Endpoint::ExpiringLicenses,
    ];

    /// Remote method name.
    pub const fn name(&self) -> &'static str {
        match self {
            Endpoint::LicenseStatistics => "get_license_statistics",
            Endpoint::LicenseByEdition => "get_license_by_edition",
            Endpoint::LicenseTrends => "get_license_trends",
            Endpoint::LicenseByClient => "get_license_by_client",
            Endpoint::ModuleUsage => "get_module_usage",
            Endpoint::ExpiringLicenses => "get_expiring_licenses",
        }
    }

    /// Resolve a remote method name.
    pub fn from_name(name: &str) -> Option<Endpoint> {
        Endpoint::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Registry metadata for this endpoint.
    pub fn info(&self) -> &'static EndpointInfo {
        // Every variant is registered below.
        &ENDPOINT_REGISTRY[self]
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Endpoint metadata.
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// Endpoint
    pub endpoint: Endpoint,
    /// Names of the positional parameters, in order
    pub params: &'static [&'static str],
    /// Recommended timeout
    pub timeout: Duration,
    /// Failure aborts the whole load cycle
    pub critical: bool,
    /// Brief description
    pub description: &'static str,
}

impl EndpointInfo {
    const fn new(
        endpoint: Endpoint,
        params: &'static [&'static str],
        timeout_secs: u64,
        critical: bool,
        description: &'static str,
    ) -> Self {
        Self {
            endpoint,
            params,
            timeout: Duration::from_secs(timeout_secs),
            critical,
            description,
        }
    }
}

/// Endpoint registry - all supported endpoints with metadata
pub static ENDPOINT_REGISTRY: LazyLock<HashMap<Endpoint, EndpointInfo>> = LazyLock::new(|| {
    let endpoints = [
        EndpointInfo::new(
            Endpoint::LicenseStatistics,
            &[],
            10,
            true,
            "Returns global license counts",
        ),
        EndpointInfo::new(
            Endpoint::LicenseByEdition,
            &[],
            10,
            false,
            "Returns license count per edition",
        ),
        // Trends and module usage scan the whole license table.
        EndpointInfo::new(
            Endpoint::LicenseTrends,
            &["months"],
            30,
            false,
            "Returns monthly issuance counts",
        ),
        EndpointInfo::new(
            Endpoint::LicenseByClient,
            &["limit"],
            10,
            false,
            "Returns clients ordered by license count",
        ),
        EndpointInfo::new(
            Endpoint::ModuleUsage,
            &[],
            30,
            false,
            "Returns modules ordered by license count",
        ),
        EndpointInfo::new(
            Endpoint::ExpiringLicenses,
            &["days"],
            30,
            false,
            "Returns licenses expiring within a horizon",
        ),
    ];

    endpoints.into_iter().map(|i| (i.endpoint, i)).collect()
});

/// Check if an endpoint name is recognized.
pub fn is_endpoint_supported(name: &str) -> bool {
    Endpoint::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::from_name(endpoint.name()), Some(endpoint));
        }
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(!is_endpoint_supported("get_key_statistics"));
        assert!(!is_endpoint_supported(""));
        assert!(!is_endpoint_supported("GET_LICENSE_STATISTICS"));
    }

    #[test]
    fn test_registry_complete() {
        assert_eq!(ENDPOINT_REGISTRY.len(), Endpoint::ALL.len());
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.info().endpoint, endpoint);
            assert!(endpoint.info().timeout > Duration::ZERO);
        }
    }

    #[test]
    fn test_only_statistics_is_critical() {
        let critical: Vec<_> = Endpoint::ALL
            .into_iter()
            .filter(|e| e.info().critical)
            .collect();
        assert_eq!(critical, vec![Endpoint::LicenseStatistics]);
    }

    #[test]
    fn test_parameterized_endpoints() {
        assert_eq!(Endpoint::LicenseTrends.info().params, &["months"]);
        assert_eq!(Endpoint::LicenseByClient.info().params, &["limit"]);
        assert_eq!(Endpoint::ExpiringLicenses.info().params, &["days"]);
        assert!(Endpoint::ModuleUsage.info().params.is_empty());
    }
}
