use crate::domain::model::Coordinate;
use crate::domain::ports::ReverseGeocoder;
use crate::utils::error::{GeoError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const UNRESOLVED_ADDRESS: &str = "Address lookup failed";
pub const USER_AGENT: &str = concat!("geofix/", env!("CARGO_PKG_VERSION"), " (location diagnostic tool)");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

/// Nominatim-compatible reverse geocoding client.
pub struct NominatimClient {
    client: Client,
    endpoint: String,
}

impl NominatimClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, coordinate: Coordinate) -> Result<String> {
        tracing::debug!("Making reverse geocoding request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
            ])
            .send()
            .await?;

        tracing::debug!("Geocoding response status: {}", response.status());
        let response = response.error_for_status()?;
        let body: ReverseResponse = response.json().await?;

        if let Some(error) = body.error {
            return Err(GeoError::geocode(error));
        }
        match body.display_name {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(GeoError::geocode("response has no display_name")),
        }
    }
}

/// Turns coordinates into an address, never failing: any lookup error is
/// logged and replaced by [`UNRESOLVED_ADDRESS`].
pub struct AddressResolver<G: ReverseGeocoder> {
    geocoder: G,
}

impl<G: ReverseGeocoder> AddressResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, coordinate: Coordinate) -> String {
        tracing::info!("Resolving address for {}, {}", coordinate.latitude, coordinate.longitude);
        match self.geocoder.reverse(coordinate).await {
            Ok(address) => {
                tracing::info!("Resolved address: {}", address);
                address
            }
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                UNRESOLVED_ADDRESS.to_string()
            }
        }
    }
}
