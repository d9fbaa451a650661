//! Offline transport serving canned analytics.
//!
//! Honors the `months`, `limit` and `days` parameters, positional or by
//! keyword, so the dashboard behaves as it would against a real backend.

use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::domain::{Endpoint, QueryParams, QueryRequest};
use crate::error::QueryResult;
use crate::ports::RpcTransport;

const CLIENTS: &[(&str, &str, u64)] = &[
    ("Acme Corporation", "ACME", 42),
    ("Globex", "GLX", 31),
    ("Initech", "INI", 27),
    ("Umbrella Health", "UMB", 19),
    ("Stark Industries", "STK", 15),
    ("Wayne Enterprises", "WAY", 12),
    ("Hooli", "", 9),
    ("Soylent & Co", "SOY", 7),
    ("Vandelay Imports", "VDL", 5),
    ("Tyrell", "TYR", 4),
    ("Cyberdyne", "CYB", 3),
    ("Wonka", "WNK", 1),
];

const MODULES: &[(&str, u64)] = &[
    ("sale", 148),
    ("account", 131),
    ("stock", 97),
    ("crm", 88),
    ("hr", 54),
    ("mrp", 21),
];

const EXPIRING: &[(&str, &str, i64)] = &[
    ("LIC-2024-0193", "Globex", 2),
    ("LIC-2024-0217", "Initech", 6),
    ("LIC-2025-0012", "Hooli", 13),
    ("LIC-2025-0044", "Acme Corporation", 21),
    ("LIC-2025-0101", "Tyrell", 45),
    ("LIC-2025-0137", "Wonka", 80),
];

/// Canned backend.
#[derive(Debug, Clone)]
pub struct DemoTransport {
    today: NaiveDate,
}

impl Default for DemoTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoTransport {
    pub fn new() -> Self {
        Self::with_today(Utc::now().date_naive())
    }

    /// Fix the reference date (trend months and expiry dates derive from it).
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    fn statistics(&self) -> Value {
        json!({
            "total": 186,
            "active": 151,
            "expired": 29,
            "expiring_soon": 6,
        })
    }

    fn editions(&self) -> Value {
        json!({
            "community": 64,
            "enterprise": 103,
            "partner": 19,
        })
    }

    fn trends(&self, months: u64) -> Value {
        let current = i64::from(self.today.year()) * 12 + i64::from(self.today.month0());
        let points: Vec<Value> = (0..months as i64)
            .rev()
            .filter_map(|back| {
                let index = current - back;
                let year = i32::try_from(index.div_euclid(12)).ok()?;
                let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                Some(json!({
                    "month": first.format("%Y-%m").to_string(),
                    "label": first.format("%b %Y").to_string(),
                    "count": 6 + (month as u64 * 7) % 11,
                }))
            })
            .collect();
        Value::Array(points)
    }

    fn clients(&self, limit: u64) -> Value {
        CLIENTS
            .iter()
            .take(limit as usize)
            .map(|(name, code, count)| {
                // The backend sends `false` for a missing code.
                let code = if code.is_empty() { json!(false) } else { json!(code) };
                json!({"name": name, "code": code, "count": count})
            })
            .collect()
    }

    fn modules(&self) -> Value {
        MODULES
            .iter()
            .map(|(module, count)| json!({"module": module, "count": count}))
            .collect()
    }

    fn expiring(&self, days: u64) -> Value {
        EXPIRING
            .iter()
            .filter(|(_, _, left)| *left as u64 <= days)
            .map(|(name, client, left)| {
                let expiry = self.today + ChronoDuration::days(*left);
                json!({
                    "name": name,
                    "client": client,
                    "expiry_date": expiry.format("%d/%m/%Y").to_string(),
                    "days_left": left,
                })
            })
            .collect()
    }
}

/// Integer parameter `index`, positional first, then by keyword name.
fn int_param(request: &QueryRequest, index: usize, default: u32) -> u64 {
    let by_name = || {
        let name = request.endpoint.info().params.get(index)?;
        request.kwargs.get(*name)
    };
    request
        .args
        .get(index)
        .or_else(by_name)
        .and_then(Value::as_u64)
        .unwrap_or(u64::from(default))
}

#[async_trait]
impl RpcTransport for DemoTransport {
    async fn call(&self, request: &QueryRequest) -> QueryResult<Value> {
        let defaults = QueryParams::default();
        let value = match request.endpoint {
            Endpoint::LicenseStatistics => self.statistics(),
            Endpoint::LicenseByEdition => self.editions(),
            Endpoint::LicenseTrends => self.trends(int_param(request, 0, defaults.trends_months)),
            Endpoint::LicenseByClient => {
                self.clients(int_param(request, 0, defaults.top_clients_limit))
            }
            Endpoint::ModuleUsage => self.modules(),
            Endpoint::ExpiringLicenses => {
                self.expiring(int_param(request, 0, defaults.expiring_horizon_days))
            }
        };
        Ok(value)
    }
}
