//! View models for the city and landing screens.

use chrono::NaiveDate;

use crate::gateway::WeatherGateway;
use crate::types::{CurrentCondition, Location, TemperatureUnit, WeatherResponse};

/// One point of the forecast chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub avg_temp_c: f64,
}

/// Everything the city screen shows.
#[derive(Debug, Clone)]
pub struct CityReport {
    /// Display name: the provider's resolved query up to the first comma.
    pub city_name: String,
    pub current: CurrentCondition,
    pub forecast: Vec<ForecastPoint>,
    pub is_favorite: bool,
}

impl CityReport {
    /// Build a report from a provider response. Returns `None` when the
    /// response has no current condition.
    pub fn from_response(requested: &str, response: &WeatherResponse) -> Option<Self> {
        let current = response.current()?.clone();

        let city_name = response
            .resolved_query()
            .and_then(|q| q.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(requested)
            .to_string();

        let forecast = response
            .daily()
            .iter()
            .filter_map(|day| {
                Some(ForecastPoint {
                    date: day.parsed_date()?,
                    avg_temp_c: day.average_celsius()?,
                })
            })
            .collect();

        Some(Self {
            city_name,
            current,
            forecast,
            is_favorite: false,
        })
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Current temperature formatted for display, e.g. "22°C".
    pub fn temperature_display(&self, unit: TemperatureUnit) -> Option<String> {
        self.current
            .temperature(unit)
            .map(|t| format!("{}{}", t, unit.symbol()))
    }
}

/// Landing screen: the user's own location and its weather, if available.
#[derive(Debug, Clone)]
pub struct LandingReport {
    /// Resolved city name, or a coordinate label when geocoding failed.
    pub city_label: String,
    pub report: Option<CityReport>,
}

impl LandingReport {
    /// Resolve `location` to a city, then fetch its weather.
    ///
    /// Failures are logged and leave `report` empty; they never propagate.
    pub async fn build<G: WeatherGateway>(gateway: &G, location: &Location) -> Self {
        let city = match gateway.reverse_geocode(location).await {
            Ok(city) => city,
            Err(e) => {
                tracing::error!("Error fetching city name: {}", e);
                return Self {
                    city_label: location.coordinate_label(),
                    report: None,
                };
            }
        };

        let report = match gateway.fetch_weather(&city).await {
            Ok(response) => {
                let report = CityReport::from_response(&city, &response);
                if report.is_none() {
                    tracing::error!("Unexpected API response structure for {}", city);
                }
                report
            }
            Err(e) => {
                tracing::error!("Error fetching weather data: {}", e);
                None
            }
        };

        Self {
            city_label: city,
            report,
        }
    }
}

/// Date shown in the screen header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHeader {
    pub day_of_week: String,
    pub day_of_month: String,
    pub month: String,
}

impl DateHeader {
    /// Abbreviated weekday ("Sun"), as on the landing screen.
    pub fn short(date: NaiveDate) -> Self {
        Self::with_weekday_format(date, "%a")
    }

    /// Full weekday ("Sunday"), as on the city screen.
    pub fn long(date: NaiveDate) -> Self {
        Self::with_weekday_format(date, "%A")
    }

    fn with_weekday_format(date: NaiveDate, weekday: &str) -> Self {
        Self {
            day_of_week: date.format(weekday).to_string(),
            day_of_month: date.format("%-d").to_string(),
            month: date.format("%b").to_string(),
        }
    }
}

impl std::fmt::Display for DateHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.day_of_week, self.day_of_month, self.month)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::WeatherError;

    fn response(json: serde_json::Value) -> WeatherResponse {
        serde_json::from_value(json).unwrap()
    }

    fn doha() -> WeatherResponse {
        response(serde_json::json!({
            "data": {
                "request": [{ "type": "City", "query": "Doha, Qatar" }],
                "current_condition": [{ "temp_C": "22", "temp_F": "72" }],
                "weather": [
                    { "date": "2026-10-18", "avgtempC": "27" },
                    { "date": "bogus", "avgtempC": "27" },
                    { "date": "2026-10-20", "avgtempC": "n/a" },
                    { "date": "2026-10-21", "avgtempC": "29" }
                ]
            }
        }))
    }

    struct StaticGateway {
        geocode: Result<&'static str, ()>,
        weather: Option<WeatherResponse>,
    }

    impl WeatherGateway for StaticGateway {
        async fn fetch_weather(&self, _city: &str) -> Result<WeatherResponse, WeatherError> {
            self.weather
                .clone()
                .ok_or_else(|| WeatherError::Parse("offline".into()))
        }

        async fn reverse_geocode(&self, _location: &Location) -> Result<String, WeatherError> {
            self.geocode
                .map(String::from)
                .map_err(|_| WeatherError::Parse("no address".into()))
        }
    }

    #[test]
    fn test_city_name_from_resolved_query() {
        let report = CityReport::from_response("doha", &doha()).unwrap();
        assert_eq!(report.city_name, "Doha");
        assert!(!report.is_favorite);
    }

    #[test]
    fn test_city_name_falls_back_to_request() {
        let resp = response(serde_json::json!({
            "data": { "current_condition": [{ "temp_C": "10" }] }
        }));
        let report = CityReport::from_response("oslo", &resp).unwrap();
        assert_eq!(report.city_name, "oslo");
        assert!(report.forecast.is_empty());
    }

    #[test]
    fn test_forecast_skips_unparsable_days() {
        let report = CityReport::from_response("doha", &doha()).unwrap();
        assert_eq!(
            report.forecast,
            vec![
                ForecastPoint {
                    date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
                    avg_temp_c: 27.0
                },
                ForecastPoint {
                    date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
                    avg_temp_c: 29.0
                },
            ]
        );
    }

    #[test]
    fn test_no_current_condition_means_no_report() {
        let resp = response(serde_json::json!({ "data": { "current_condition": null } }));
        assert!(CityReport::from_response("nowhere", &resp).is_none());
    }

    #[test]
    fn test_temperature_display() {
        let report = CityReport::from_response("doha", &doha()).unwrap();
        assert_eq!(
            report.temperature_display(TemperatureUnit::Celsius).as_deref(),
            Some("22°C")
        );
        assert_eq!(
            report.temperature_display(TemperatureUnit::Fahrenheit).as_deref(),
            Some("72°F")
        );
    }

    #[test]
    fn test_date_header() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 4).unwrap();
        let short = DateHeader::short(date);
        assert_eq!(short.day_of_week, "Sun");
        assert_eq!(short.day_of_month, "4");
        assert_eq!(short.month, "Oct");
        assert_eq!(DateHeader::long(date).day_of_week, "Sunday");
        assert_eq!(short.to_string(), "Sun 4 Oct");
    }

    #[tokio::test]
    async fn test_landing_with_weather() {
        let gateway = StaticGateway {
            geocode: Ok("Doha"),
            weather: Some(doha()),
        };
        let landing = LandingReport::build(&gateway, &Location::new(25.28, 51.52)).await;
        assert_eq!(landing.city_label, "Doha");
        assert_eq!(landing.report.unwrap().forecast.len(), 2);
    }

    #[tokio::test]
    async fn test_landing_geocode_failure_uses_coordinates() {
        let gateway = StaticGateway {
            geocode: Err(()),
            weather: Some(doha()),
        };
        let landing = LandingReport::build(&gateway, &Location::new(25.276987, 51.520008)).await;
        assert_eq!(landing.city_label, "Lat 25.28 and Lon 51.52");
        assert!(landing.report.is_none());
    }

    #[tokio::test]
    async fn test_landing_weather_failure_keeps_city() {
        let gateway = StaticGateway {
            geocode: Ok("Doha"),
            weather: None,
        };
        let landing = LandingReport::build(&gateway, &Location::new(25.28, 51.52)).await;
        assert_eq!(landing.city_label, "Doha");
        assert!(landing.report.is_none());
    }
}
