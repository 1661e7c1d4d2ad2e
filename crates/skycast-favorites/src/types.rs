use serde::{Deserialize, Deserializer, Serialize};

/// Normalized form of a city name, used as the favorites key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A city the user has favorited, with the reading captured at the time.
///
/// Field names match the persisted JSON so existing slots stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCity {
    pub name: String,

    #[serde(
        rename = "temperatureC",
        default,
        deserialize_with = "lenient_temperature",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_c: Option<i32>,

    #[serde(
        rename = "temperatureF",
        default,
        deserialize_with = "lenient_temperature",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_f: Option<i32>,

    #[serde(
        rename = "weatherDesc",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weather_desc: Option<String>,
}

impl FavoriteCity {
    /// Build an entry from a snapshot, normalizing the name.
    pub fn new(name: &str, snapshot: WeatherSnapshot) -> Self {
        Self {
            name: normalize_name(name),
            temperature_c: snapshot.temperature_c,
            temperature_f: snapshot.temperature_f,
            weather_desc: snapshot.weather_desc,
        }
    }

    /// Case-insensitive match against a city name.
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

/// Last-known reading stored alongside a favorite. Never refreshed automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub temperature_c: Option<i32>,
    pub temperature_f: Option<i32>,
    pub weather_desc: Option<String>,
}

impl WeatherSnapshot {
    pub fn new(temperature_c: i32, temperature_f: i32) -> Self {
        Self {
            temperature_c: Some(temperature_c),
            temperature_f: Some(temperature_f),
            weather_desc: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.weather_desc = Some(desc.into());
        self
    }
}

// The weather provider reports temperatures as strings ("22") and older slots
// carry them verbatim, so accept both numbers and numeric strings.
fn lenient_temperature<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .or_else(|| n.as_f64().map(|f| f.round() as i32)),
        serde_json::Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }))
}
