use skycast_favorites::{normalize_name, FavoritesStore, SlotStorage, WeatherSnapshot};
use skycast_weather::{
    search, CityReport, CurrentCondition, Geocoder, HttpGateway, LandingReport,
    Location, SearchError, TemperatureUnit, WeatherGateway, WeatherProvider,
};

use crate::{AppError, Config, ConfigError};

/// Application state: the weather gateway, the favorites store and the
/// selected temperature unit.
///
/// Views get everything through this object; nothing reads storage or the
/// network on its own.
pub struct App<G = HttpGateway> {
    gateway: G,
    favorites: FavoritesStore,
    unit: TemperatureUnit,
}

impl App<HttpGateway> {
    /// Validate `config` and build the HTTP gateway from it.
    pub fn from_config(config: Config, slots: Box<dyn SlotStorage>) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        let provider = WeatherProvider::new(&config.weather.api_base_url, &config.weather.api_key)?
            .with_forecast_days(config.weather.forecast_days);
        let geocoder = Geocoder::new(&config.geocoding.nominatim_url, &config.geocoding.user_agent)?;

        Ok(Self::with_gateway(
            config,
            HttpGateway::new(provider, geocoder),
            slots,
        ))
    }
}

impl<G: WeatherGateway> App<G> {
    pub fn with_gateway(config: Config, gateway: G, slots: Box<dyn SlotStorage>) -> Self {
        let unit = config.weather.temperature_unit;
        let favorites = FavoritesStore::open(slots);
        tracing::info!("Loaded {} favorites", favorites.len());

        Self {
            gateway,
            favorites,
            unit,
        }
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    /// Validate the input, look the city up and build its report.
    pub async fn search(&self, input: &str) -> Result<CityReport, AppError> {
        let result = search(&self.gateway, input).await?;
        let report = CityReport::from_response(&result.query, &result.response)
            .ok_or_else(|| SearchError::CityNotFound(result.query.clone()))?;

        let is_favorite = self.favorites.is_favorite(&result.query);
        Ok(report.with_favorite(is_favorite))
    }

    /// Landing view for the user's coordinates.
    pub async fn landing(&self, location: &Location) -> LandingReport {
        let mut landing = LandingReport::build(&self.gateway, location).await;
        if let Some(report) = landing.report.take() {
            let is_favorite = self.favorites.is_favorite(&landing.city_label);
            landing.report = Some(report.with_favorite(is_favorite));
        }
        landing
    }

    /// Favorite or un-favorite a city. Returns whether it is a favorite afterwards.
    ///
    /// Removing never touches the network. Adding fetches a fresh reading for
    /// the snapshot; if that fails the city is still added with an empty
    /// snapshot. Names are not held to the search character set, so geocoded
    /// cities like "Saint-Étienne" can be saved and removed.
    pub async fn toggle_favorite(&mut self, name: &str) -> Result<bool, AppError> {
        if self.favorites.is_favorite(name) {
            return Ok(self.favorites.toggle(name, WeatherSnapshot::default()));
        }

        let name = favorite_name(name)?;
        let snapshot = self.fetch_snapshot(&name).await;
        Ok(self.favorites.toggle(&name, snapshot))
    }

    /// Add a city, or refresh its snapshot if it is already a favorite.
    pub async fn add_favorite(&mut self, name: &str) -> Result<(), AppError> {
        let name = favorite_name(name)?;
        let snapshot = self.fetch_snapshot(&name).await;
        self.favorites.upsert(&name, snapshot);
        Ok(())
    }

    pub fn remove_favorite(&mut self, name: &str) {
        self.favorites.remove(name);
    }

    /// Move a favorite card. Out-of-range positions are ignored.
    pub fn move_favorite(&mut self, from: usize, to: usize) -> bool {
        self.favorites.reorder(from, to)
    }

    async fn fetch_snapshot(&self, city: &str) -> WeatherSnapshot {
        match self.gateway.fetch_weather(city).await {
            Ok(response) => match response.current() {
                Some(current) => snapshot_from(current),
                None => {
                    tracing::warn!("No current reading for {}; saving without snapshot", city);
                    WeatherSnapshot::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to fetch snapshot for {}: {}", city, e);
                WeatherSnapshot::default()
            }
        }
    }
}

/// Trimmed, lowercased favorite name. Only emptiness is rejected.
fn favorite_name(name: &str) -> Result<String, SearchError> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(SearchError::EmptyInput);
    }
    Ok(name)
}

/// Favorite snapshot from a provider reading.
pub fn snapshot_from(current: &CurrentCondition) -> WeatherSnapshot {
    let parse = |t: Option<&str>| t.and_then(|t| t.trim().parse::<i32>().ok());
    WeatherSnapshot {
        temperature_c: parse(current.temperature(TemperatureUnit::Celsius)),
        temperature_f: parse(current.temperature(TemperatureUnit::Fahrenheit)),
        weather_desc: current.description().map(String::from),
    }
}
