//! `/weather [location]` - live weather by geocoded area code

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::application::errors::{CommandError, ServiceError};
use crate::domain::entities::{Command, User};
use crate::domain::traits::WeatherService;

pub const UNSUPPORTED_REGION: &str = "Sorry, this region is not supported.";

/// Current conditions for one area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveWeather {
    pub report_time: String,
    pub province: String,
    pub city: String,
    pub weather: String,
    pub temperature: String,
    pub wind_direction: String,
    pub wind_power: String,
    pub humidity: String,
}

impl LiveWeather {
    /// Read `lives[0]`; `None` if it or any field is missing
    fn from_payload(payload: &Value) -> Option<Self> {
        let live = payload.get("lives")?.get(0)?;
        let field = |key: &str| live.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            report_time: field("reporttime")?,
            province: field("province")?,
            city: field("city")?,
            weather: field("weather")?,
            temperature: field("temperature")?,
            wind_direction: field("winddirection")?,
            wind_power: field("windpower")?,
            humidity: field("humidity")?,
        })
    }

    pub fn render(&self) -> String {
        format!(
            "[{}]\n{}{}\n{} {}°C\nWind {} force {}\nHumidity {}%",
            self.report_time,
            self.province,
            self.city,
            self.weather,
            self.temperature,
            self.wind_direction,
            self.wind_power,
            self.humidity
        )
    }
}

/// Outcome of a lookup. An unknown region is ordinary data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherLookup {
    Report(LiveWeather),
    UnsupportedRegion,
}

pub struct WeatherCommand {
    service: Arc<dyn WeatherService>,
    default_location: String,
}

impl WeatherCommand {
    pub fn new(service: Arc<dyn WeatherService>, default_location: impl Into<String>) -> Self {
        Self {
            service,
            default_location: default_location.into(),
        }
    }

    /// `params[1]` wins over the user's locality, which wins over the default
    fn location(&self, user: &User, params: &[String]) -> String {
        match params.get(1) {
            Some(location) => location.clone(),
            None => user
                .locality()
                .unwrap_or_else(|| self.default_location.clone()),
        }
    }

    pub async fn lookup(&self, address: &str) -> Result<WeatherLookup, ServiceError> {
        let geo = self.service.geocode(address).await?;
        let adcode = geo
            .get("geocodes")
            .and_then(|g| g.get(0))
            .and_then(|g| g.get("adcode"))
            .and_then(Value::as_str);

        let Some(adcode) = adcode else {
            tracing::debug!("No area code for {:?}", address);
            return Ok(WeatherLookup::UnsupportedRegion);
        };

        let payload = self.service.live_weather(adcode).await?;
        Ok(match LiveWeather::from_payload(&payload) {
            Some(live) => WeatherLookup::Report(live),
            None => WeatherLookup::UnsupportedRegion,
        })
    }
}

#[async_trait]
impl Command for WeatherCommand {
    fn name(&self) -> &str {
        "/weather"
    }

    fn description(&self) -> &str {
        "Current weather for your city or the given location"
    }

    async fn execute(&self, user: &User, params: &[String]) -> Result<String, CommandError> {
        let location = self.location(user, params);
        tracing::info!("Weather lookup for {}", location);

        match self.lookup(&location).await? {
            WeatherLookup::Report(live) => Ok(live.render()),
            WeatherLookup::UnsupportedRegion => Ok(UNSUPPORTED_REGION.to_string()),
        }
    }
}
