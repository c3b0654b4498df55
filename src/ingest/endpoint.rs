//! Exchange server catalog used to drive ingestion

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "GCP")]
    Gcp,
    Azure,
    Other,
}

impl Provider {
    pub const ALL: [Provider; 4] = [Provider::Aws, Provider::Gcp, Provider::Azure, Provider::Other];

    /// Data center coordinates (lat, lon) hosting exchange servers for this provider
    pub fn sites(self) -> &'static [(f64, f64)] {
        match self {
            Provider::Aws => &[
                (40.7128, -74.006),
                (47.6062, -122.3321),
                (51.5074, -0.1278),
                (55.9375, 37.6054),
                (35.6762, 139.6503),
            ],
            Provider::Gcp => &[(37.3861, -122.0839), (48.8566, 2.3522), (1.3521, 103.8198)],
            Provider::Azure => &[(42.3601, -71.0589), (52.37, 4.895), (35.0116, 135.768)],
            Provider::Other => &[(-33.8688, 151.2093)],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Aws => "AWS",
            Provider::Gcp => "GCP",
            Provider::Azure => "Azure",
            Provider::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A cloud-hosted exchange server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub provider: Provider,
}

const EXCHANGES: [&str; 5] = ["Binance", "Bybit", "OKX", "Deribit", "Kraken"];

/// The fixed catalog of exchange servers, ids `srv-0` upward.
pub fn exchange_servers() -> Vec<Endpoint> {
    let mut servers = Vec::new();
    for provider in Provider::ALL {
        for (idx, &(lat, lon)) in provider.sites().iter().enumerate() {
            let exchange = EXCHANGES[idx % EXCHANGES.len()];
            servers.push(Endpoint {
                id: format!("srv-{}", servers.len()),
                name: format!("{} ({})", exchange, provider),
                lat,
                lon,
                provider,
            });
        }
    }
    servers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_layout() {
        let servers = exchange_servers();
        assert_eq!(servers.len(), 12);

        assert_eq!(servers[0].id, "srv-0");
        assert_eq!(servers[0].name, "Binance (AWS)");
        assert_eq!(servers[4].name, "Kraken (AWS)");
        assert_eq!(servers[5].id, "srv-5");
        assert_eq!(servers[5].name, "Binance (GCP)");
        assert_eq!(servers[11].name, "Binance (Other)");
        assert_eq!(servers[11].provider, Provider::Other);
    }

    #[test]
    fn test_ids_are_unique() {
        let servers = exchange_servers();
        let mut ids: Vec<&str> = servers.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), servers.len());
    }

    #[test]
    fn test_provider_serializes_like_display() -> serde_json::Result<()> {
        for provider in Provider::ALL {
            assert_eq!(serde_json::to_value(provider)?, provider.to_string());
        }
        Ok(())
    }
}
