//! Reverse geocoding: convert coordinates to a city name.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use crate::types::{Location, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_USER_AGENT: &str = "Skycast/0.1.0 (weather lookup)";
pub const UNKNOWN_LOCATION: &str = "Unknown location";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl NominatimAddress {
    // City level first, falling back through smaller places to the state
    fn place_name(self) -> String {
        self.city
            .or(self.town)
            .or(self.village)
            .or(self.state)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    url: String,
}

impl Geocoder {
    /// Nominatim requires an identifying User-Agent on every request.
    pub fn new(url: &str, user_agent: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Reverse geocode coordinates to a city name.
    ///
    /// Returns `UNKNOWN_LOCATION` when the address has no usable place name;
    /// fails when the request fails or the response has no address at all.
    #[instrument(skip(self), level = "info")]
    pub async fn reverse_geocode(&self, location: &Location) -> Result<String, WeatherError> {
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", "10"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return Err(WeatherError::Status {
                status: response.status().as_u16(),
                endpoint: self.url.clone(),
            });
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let address = body
            .address
            .ok_or_else(|| WeatherError::Parse("response has no address".to_string()))?;

        let place = address.place_name();
        tracing::info!("Reverse geocoded to: {}", place);
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn address(city: Option<&str>, town: Option<&str>, village: Option<&str>, state: Option<&str>) -> NominatimAddress {
        NominatimAddress {
            city: city.map(String::from),
            town: town.map(String::from),
            village: village.map(String::from),
            state: state.map(String::from),
        }
    }

    #[test]
    fn test_place_name_prefers_city() {
        let addr = address(Some("Doha"), Some("Town"), None, Some("Ad Dawhah"));
        assert_eq!(addr.place_name(), "Doha");
    }

    #[test]
    fn test_place_name_fallback_chain() {
        assert_eq!(address(None, Some("Lusail"), None, None).place_name(), "Lusail");
        assert_eq!(address(None, None, Some("Zubarah"), None).place_name(), "Zubarah");
        assert_eq!(address(None, None, None, Some("Al Khor")).place_name(), "Al Khor");
        assert_eq!(address(None, None, None, None).place_name(), UNKNOWN_LOCATION);
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -p skycast-weather -- --ignored
    async fn test_reverse_geocode_doha() {
        let geocoder = Geocoder::new(DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT).unwrap();
        let name = geocoder
            .reverse_geocode(&Location::new(25.276987, 51.520008))
            .await
            .unwrap();
        assert!(name.to_lowercase().contains("doha"));
    }
}
