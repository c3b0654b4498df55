//! Globalping ping measurements: request bodies and result conversion.
//!
//! Only the data model lives here. [`crate::ingest::RecordedSource`] checks
//! captured measurements against the [`PingRequest`] that would have been
//! sent for the pair before converting them.

use crate::ingest::endpoint::{Endpoint, Provider};
use crate::store::Sample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Packets per ping measurement
pub const PING_PACKETS: u32 = 3;

/// Per-packet timeout in milliseconds
pub const PING_TIMEOUT_MS: u32 = 1000;

/// Probe location filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Location {
    fn new(country: &str, city: Option<&str>) -> Self {
        Self {
            country: country.to_string(),
            city: city.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementOptions {
    pub packets: u32,
    pub timeout: u32,
}

/// Body of `POST /measurements` for a ping from near `from` to a target
/// standing in for `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingRequest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub target: String,
    pub locations: Vec<Location>,
    pub measurement_options: MeasurementOptions,
}

impl PingRequest {
    pub fn new(from: &Endpoint, to: &Endpoint) -> Self {
        Self {
            kind: "ping",
            target: target_for(to.provider).to_string(),
            locations: vec![location_for(from.lat, from.lon)],
            measurement_options: MeasurementOptions {
                packets: PING_PACKETS,
                timeout: PING_TIMEOUT_MS,
            },
        }
    }
}

/// A measurement as returned by `GET /measurements/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub results: Vec<ProbeResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeResult {
    pub result: PingResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingResult {
    pub status: String,
    #[serde(default)]
    pub stats: Option<PingStats>,
}

/// Unreachable targets report `null` for the RTT fields
#[derive(Debug, Clone, Deserialize)]
pub struct PingStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub loss: Option<f64>,
}

impl Measurement {
    pub fn is_finished(&self) -> bool {
        self.status == "finished"
    }

    /// Convert to a sample for `from -> to`.
    ///
    /// Uses the first probe only. `None` unless that probe finished with an
    /// average RTT.
    pub fn to_sample(&self, from: &Endpoint, to: &Endpoint) -> Option<Sample> {
        let probe = self.results.first()?;
        if probe.result.status != "finished" {
            return None;
        }
        let avg = probe.result.stats.as_ref()?.avg?;
        if !avg.is_finite() || avg < 0.0 {
            return None;
        }

        Some(Sample::new(
            from.id.clone(),
            to.id.clone(),
            self.created_at.timestamp_millis(),
            avg.round() as u32,
        ))
    }
}

/// Coarse coordinate to probe location mapping; defaults to the US
pub fn location_for(lat: f64, lon: f64) -> Location {
    if lat > 50.0 && lon > -10.0 && lon < 10.0 {
        Location::new("GB", Some("London"))
    } else if lat > 40.0 && lat < 50.0 && lon > -80.0 && lon < -70.0 {
        Location::new("US", Some("New York"))
    } else if lat > 35.0 && lat < 45.0 && lon > -125.0 && lon < -115.0 {
        Location::new("US", Some("California"))
    } else if lat > 48.0 && lat < 52.0 && lon > 4.0 && lon < 6.0 {
        Location::new("NL", Some("Amsterdam"))
    } else if lat > 35.0 && lat < 37.0 && lon > 135.0 && lon < 145.0 {
        Location::new("JP", Some("Tokyo"))
    } else if lat > 1.0 && lat < 2.0 && lon > 103.0 && lon < 105.0 {
        Location::new("SG", Some("Singapore"))
    } else if lat > -35.0 && lat < -32.0 && lon > 150.0 && lon < 152.0 {
        Location::new("AU", Some("Sydney"))
    } else {
        Location::new("US", None)
    }
}

/// Public host pinged on behalf of a provider's servers
pub fn target_for(provider: Provider) -> &'static str {
    match provider {
        Provider::Aws => "amazon.com",
        Provider::Gcp => "google.com",
        Provider::Azure => "microsoft.com",
        Provider::Other => "cloudflare.com",
    }
}
