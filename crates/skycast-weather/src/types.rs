use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(Self::Celsius),
            "f" | "fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(format!("unknown temperature unit: {}", other)),
        }
    }
}

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Label shown when the coordinates couldn't be resolved to a city.
    pub fn coordinate_label(&self) -> String {
        format!("Lat {:.2} and Lon {:.2}", self.latitude, self.longitude)
    }
}

/// Top-level World Weather Online response.
///
/// Everything is optional: the provider omits sections freely and reports
/// lookup errors inside `data.error` with a 200 status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub data: Option<WeatherPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(default)]
    pub current_condition: Option<Vec<CurrentCondition>>,
    #[serde(default)]
    pub weather: Option<Vec<DailyForecast>>,
    #[serde(default)]
    pub request: Option<Vec<RequestInfo>>,
    #[serde(default)]
    pub error: Option<Vec<ProviderMessage>>,
}

impl WeatherResponse {
    /// The current reading, if the provider returned one.
    pub fn current(&self) -> Option<&CurrentCondition> {
        self.data.as_ref()?.current_condition.as_ref()?.first()
    }

    /// Daily forecast entries; empty when absent.
    pub fn daily(&self) -> &[DailyForecast] {
        self.data
            .as_ref()
            .and_then(|d| d.weather.as_deref())
            .unwrap_or_default()
    }

    /// The location string the provider resolved the query to.
    pub fn resolved_query(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .request
            .as_ref()?
            .first()
            .map(|r| r.query.as_str())
    }

    /// First provider error message, e.g. "Unable to find any matching weather location".
    pub fn provider_error(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .error
            .as_ref()?
            .first()
            .map(|e| e.msg.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentCondition {
    #[serde(rename = "temp_C", default, deserialize_with = "lenient_string")]
    pub temp_c: Option<String>,
    #[serde(rename = "temp_F", default, deserialize_with = "lenient_string")]
    pub temp_f: Option<String>,
    #[serde(rename = "FeelsLikeC", default, deserialize_with = "lenient_string")]
    pub feels_like_c: Option<String>,
    #[serde(rename = "FeelsLikeF", default, deserialize_with = "lenient_string")]
    pub feels_like_f: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub humidity: Option<String>,
    #[serde(rename = "windspeedKmph", default, deserialize_with = "lenient_string")]
    pub windspeed_kmph: Option<String>,
    #[serde(rename = "weatherDesc", default)]
    pub weather_desc: Vec<ValueWrapper>,
    #[serde(default)]
    pub observation_time: Option<String>,
}

impl CurrentCondition {
    /// Temperature in the given unit, as reported.
    pub fn temperature(&self, unit: TemperatureUnit) -> Option<&str> {
        match unit {
            TemperatureUnit::Celsius => self.temp_c.as_deref(),
            TemperatureUnit::Fahrenheit => self.temp_f.as_deref(),
        }
    }

    pub fn feels_like(&self, unit: TemperatureUnit) -> Option<&str> {
        match unit {
            TemperatureUnit::Celsius => self.feels_like_c.as_deref(),
            TemperatureUnit::Fahrenheit => self.feels_like_f.as_deref(),
        }
    }

    /// Short text description, e.g. "Partly cloudy".
    pub fn description(&self) -> Option<&str> {
        self.weather_desc.first().map(|v| v.value.trim())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub date: String,
    #[serde(rename = "avgtempC", default, deserialize_with = "lenient_string")]
    pub avg_temp_c: Option<String>,
    #[serde(rename = "avgtempF", default, deserialize_with = "lenient_string")]
    pub avg_temp_f: Option<String>,
    #[serde(rename = "maxtempC", default, deserialize_with = "lenient_string")]
    pub max_temp_c: Option<String>,
    #[serde(rename = "mintempC", default, deserialize_with = "lenient_string")]
    pub min_temp_c: Option<String>,
}

impl DailyForecast {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn average_celsius(&self) -> Option<f64> {
        self.avg_temp_c.as_deref()?.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestInfo {
    #[serde(default)]
    pub query: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueWrapper {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderMessage {
    #[serde(default)]
    pub msg: String,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

// The provider encodes numbers as strings; accept either and keep the text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn sample() -> WeatherResponse {
        serde_json::from_value(serde_json::json!({
            "data": {
                "request": [{ "type": "City", "query": "Doha, Qatar" }],
                "current_condition": [{
                    "temp_C": "22",
                    "temp_F": "72",
                    "FeelsLikeC": "24",
                    "FeelsLikeF": "75",
                    "humidity": "60",
                    "windspeedKmph": "13",
                    "observation_time": "09:00 AM",
                    "weatherDesc": [{ "value": "Sunny " }],
                    "cloudcover": "0"
                }],
                "weather": [
                    { "date": "2026-10-18", "avgtempC": "27", "avgtempF": "81" },
                    { "date": "2026-10-19", "avgtempC": "28", "avgtempF": "82" }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_current_condition_fields() {
        let response = sample();
        let current = response.current().unwrap();
        assert_eq!(current.temperature(TemperatureUnit::Celsius), Some("22"));
        assert_eq!(current.temperature(TemperatureUnit::Fahrenheit), Some("72"));
        assert_eq!(current.feels_like(TemperatureUnit::Celsius), Some("24"));
        assert_eq!(current.description(), Some("Sunny"));
    }

    #[test]
    fn test_numeric_temperatures_accepted() {
        let response: WeatherResponse = serde_json::from_str(
            r#"{"data":{"current_condition":[{"temp_C":25}]}}"#,
        )
        .unwrap();
        assert_eq!(
            response.current().unwrap().temperature(TemperatureUnit::Celsius),
            Some("25")
        );
    }

    #[test]
    fn test_null_current_condition() {
        let response: WeatherResponse =
            serde_json::from_str(r#"{"data":{"current_condition":null}}"#).unwrap();
        assert!(response.current().is_none());
        assert!(response.daily().is_empty());
    }

    #[test]
    fn test_empty_current_condition() {
        let response: WeatherResponse =
            serde_json::from_str(r#"{"data":{"current_condition":[]}}"#).unwrap();
        assert!(response.current().is_none());
    }

    #[test]
    fn test_provider_error_message() {
        let response: WeatherResponse = serde_json::from_str(
            r#"{"data":{"error":[{"msg":"Unable to find any matching weather location to the query submitted!"}]}}"#,
        )
        .unwrap();
        assert!(response.current().is_none());
        assert!(response.provider_error().unwrap().starts_with("Unable to find"));
    }

    #[test]
    fn test_daily_forecast_parsing() {
        let response = sample();
        let daily = response.daily();
        assert_eq!(daily.len(), 2);
        assert_eq!(
            daily[0].parsed_date(),
            NaiveDate::from_ymd_opt(2026, 10, 18)
        );
        assert_eq!(daily[1].average_celsius(), Some(28.0));
        assert_eq!(response.resolved_query(), Some("Doha, Qatar"));
    }

    #[test]
    fn test_temperature_unit_parsing() {
        assert_eq!("c".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert_eq!("F".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!(
            "fahrenheit".parse::<TemperatureUnit>(),
            Ok(TemperatureUnit::Fahrenheit)
        );
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_coordinate_label() {
        let loc = Location::new(25.276987, 51.520008);
        assert_eq!(loc.coordinate_label(), "Lat 25.28 and Lon 51.52");
    }
}
