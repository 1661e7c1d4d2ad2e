//! Weather lookup for Skycast
//!
//! Wraps the World Weather Online forecast API and Nominatim reverse
//! geocoding, validates search input, and turns provider responses into
//! city reports and forecast charts.

pub mod chart;
pub mod gateway;
pub mod geocode;
pub mod provider;
pub mod report;
pub mod search;
pub mod types;

pub use chart::{render_chart, ChartOptions};
pub use gateway::{HttpGateway, WeatherGateway};
pub use geocode::Geocoder;
pub use provider::WeatherProvider;
pub use report::{CityReport, DateHeader, ForecastPoint, LandingReport};
pub use search::{search, validate_query, SearchError, SearchResult};
pub use types::*;
