//! OpenWeather-style ambient fetch for the live service.
//!
//! Strictly fail-soft: any network, status, or decode problem falls back to
//! the last known reading (or the fixed fallback) with a warning. Failures
//! never reach the tick pipeline.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ambient::AmbientReading;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Why an ambient fetch failed. Only ever logged; callers receive a fallback
/// reading instead of an error.
#[derive(Debug)]
pub enum WeatherError {
    /// Transport-level failure (DNS, TLS, timeout, ...).
    Transport(reqwest::Error),
    /// Non-success HTTP status from the weather API.
    Status(u16),
    /// Response body did not match the expected shape.
    Decode(reqwest::Error),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "weather request failed: {e}"),
            Self::Status(code) => write!(f, "weather API returned status {code}"),
            Self::Decode(e) => write!(f, "weather response did not decode: {e}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    main: ApiMain,
    weather: Vec<ApiCondition>,
    dt: i64,
    sys: ApiSys,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f32,
    humidity: f32,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct ApiSys {
    sunrise: i64,
    sunset: i64,
}

impl ApiResponse {
    fn into_reading(self) -> AmbientReading {
        AmbientReading {
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            condition: self
                .weather
                .into_iter()
                .next()
                .map(|c| c.main)
                .unwrap_or_else(|| "Unknown".to_string()),
            is_day: self.dt > self.sys.sunrise && self.dt < self.sys.sunset,
        }
    }
}

/// HTTP client for current-weather observations.
pub struct WeatherClient {
    http: Client,
    city: String,
    api_key: String,
}

impl WeatherClient {
    /// Creates a client for the given city query (e.g. `"London,uk"`).
    pub fn new(city: &str, api_key: &str) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            city: city.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetches the current observation.
    ///
    /// # Errors
    ///
    /// Returns a `WeatherError` on transport failure, non-success status, or
    /// a malformed body.
    pub async fn fetch(&self) -> Result<AmbientReading, WeatherError> {
        let url = format!(
            "{BASE_URL}?q={}&units=metric&appid={}",
            self.city, self.api_key
        );
        debug!(city = %self.city, "fetching ambient conditions");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(WeatherError::Transport)?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: ApiResponse = response.json().await.map_err(WeatherError::Decode)?;
        Ok(body.into_reading())
    }

    /// Fetches the current observation, substituting `last_known` on any
    /// failure.
    pub async fn fetch_or_fallback(&self, last_known: &AmbientReading) -> AmbientReading {
        match self.fetch().await {
            Ok(reading) => reading,
            Err(e) => {
                warn!(%e, "ambient fetch failed, keeping last known reading");
                last_known.clone()
            }
        }
    }
}
