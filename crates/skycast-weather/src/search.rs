//! City search: input validation, then a lookup classified into found,
//! not found, or upstream failure.

use crate::gateway::WeatherGateway;
use crate::types::{WeatherError, WeatherResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("You should enter a city name!")]
    EmptyInput,

    #[error("Invalid city name! Please use only letters.")]
    InvalidCharacters(String),

    #[error("The city does not exist. Please check the city name.")]
    CityNotFound(String),

    #[error("There was an error fetching the data. Please try again.")]
    Upstream(#[source] WeatherError),
}

impl SearchError {
    /// Message shown to the user. Validation errors never reached the network.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "You should enter a city name!",
            Self::InvalidCharacters(_) => "Invalid city name! Please use only letters.",
            Self::CityNotFound(_) => "The city does not exist. Please check the city name.",
            Self::Upstream(_) => "There was an error fetching the data. Please try again.",
        }
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Lowercased, trimmed query that was sent to the provider.
    pub query: String,
    pub response: WeatherResponse,
}

/// Latin letters, whitespace, and the Arabic block.
fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Validate raw search input and return the normalized query.
pub fn validate_query(input: &str) -> Result<String, SearchError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyInput);
    }
    if !trimmed.chars().all(is_allowed_char) {
        return Err(SearchError::InvalidCharacters(input.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Validate `input` and look it up.
///
/// Invalid input returns before any gateway call. A response without a
/// current condition means the provider didn't recognize the city.
pub async fn search<G: WeatherGateway>(
    gateway: &G,
    input: &str,
) -> Result<SearchResult, SearchError> {
    let query = validate_query(input)?;

    let response = gateway.fetch_weather(&query).await.map_err(|e| {
        tracing::error!("Error fetching weather data for {}: {}", query, e);
        SearchError::Upstream(e)
    })?;

    if response.current().is_none() {
        tracing::info!("No current condition for {}; treating as not found", query);
        return Err(SearchError::CityNotFound(query));
    }

    Ok(SearchResult { query, response })
}
