//! Analytics entities returned by the backend.
//!
//! These are transient value objects: decoded once per query and never
//! mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::endpoints::Endpoint;

/// Global license counts.
///
/// Each field is independent; a field absent from the response decodes as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryStats {
    pub total: u64,
    pub active: u64,
    pub expired: u64,
    pub expiring_soon: u64,
}

/// License count for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientUsage {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
    pub count: u64,
}

/// Number of licenses that include a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUsage {
    #[serde(deserialize_with = "lenient_string")]
    pub module: String,
    pub count: u64,
}

/// A license expiring within the requested horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringLicense {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client: String,
    /// Backend-formatted date, kept verbatim
    #[serde(deserialize_with = "lenient_string")]
    pub expiry_date: String,
    pub days_left: u32,
}

/// License count for one edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionCount {
    pub edition: String,
    pub count: u64,
}

/// Edition breakdown in backend order.
///
/// The backend answers either with a mapping `edition -> count` or with a
/// list of `{edition, count}` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEditions")]
pub struct EditionBreakdown(pub Vec<EditionCount>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEditions {
    List(Vec<EditionCount>),
    Map(Map<String, Value>),
}

impl TryFrom<RawEditions> for EditionBreakdown {
    type Error = String;

    fn try_from(raw: RawEditions) -> Result<Self, Self::Error> {
        match raw {
            RawEditions::List(items) => Ok(EditionBreakdown(items)),
            RawEditions::Map(map) => map
                .into_iter()
                .map(|(edition, count)| {
                    count
                        .as_u64()
                        .map(|count| EditionCount {
                            edition: edition.clone(),
                            count,
                        })
                        .ok_or_else(|| format!("invalid count for edition {edition}: {count}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(EditionBreakdown),
        }
    }
}

/// Issuance count for one month, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub month: String,
    /// Display label, e.g. `Jan 2026`
    #[serde(default)]
    pub label: String,
    pub count: u64,
}

/// A remote query as handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub endpoint: Endpoint,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl QueryRequest {
    pub fn new(endpoint: Endpoint, args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        Self {
            endpoint,
            args,
            kwargs,
        }
    }

    /// Request with positional arguments only.
    pub fn positional(endpoint: Endpoint, args: Vec<Value>) -> Self {
        Self::new(endpoint, args, Map::new())
    }
}

/// The backend encodes empty text fields as `false` or `null`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null | Value::Bool(false) => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string, got {other}"
        ))),
    }
}
