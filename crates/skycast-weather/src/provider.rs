//! World Weather Online client: current conditions plus a daily forecast.

use crate::types::{WeatherError, WeatherResponse};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_BASE_URL: &str = "https://api.worldweatheronline.com/premium/v1";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    forecast_days: u8,
}

impl WeatherProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
        })
    }

    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    /// Fetch current conditions and the daily forecast for `city`.
    ///
    /// The response is returned as the provider shaped it; a city the provider
    /// doesn't know still comes back `Ok`, with no current condition.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherResponse, WeatherError> {
        let url = format!("{}/weather.ashx", self.base_url);
        let days = self.forecast_days.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("key", self.api_key.as_str()),
                ("format", "json"),
                ("num_of_days", days.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Weather API returned status {}", status);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                endpoint: url,
            });
        }

        let body: WeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        if let Some(msg) = body.provider_error() {
            tracing::debug!("Weather API reported: {}", msg);
        }

        Ok(body)
    }
}
