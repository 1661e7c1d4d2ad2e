//! The gateway seam: the two outbound calls views depend on.

use crate::geocode::Geocoder;
use crate::provider::WeatherProvider;
use crate::types::{Location, WeatherError, WeatherResponse};

/// Weather and reverse-geocoding lookups.
///
/// Both calls return provider data as-is; interpretation (not found, missing
/// fields) belongs to the caller. Implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait WeatherGateway {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherResponse, WeatherError>;

    async fn reverse_geocode(&self, location: &Location) -> Result<String, WeatherError>;
}

/// Gateway backed by the real HTTP services.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    provider: WeatherProvider,
    geocoder: Geocoder,
}

impl HttpGateway {
    pub fn new(provider: WeatherProvider, geocoder: Geocoder) -> Self {
        Self { provider, geocoder }
    }
}

impl WeatherGateway for HttpGateway {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherResponse, WeatherError> {
        self.provider.fetch_weather(city).await
    }

    async fn reverse_geocode(&self, location: &Location) -> Result<String, WeatherError> {
        self.geocoder.reverse_geocode(location).await
    }
}
