//! `get_weather`: current conditions from the Open-Meteo forecast API.

use super::base::{parse_arguments, Tool};
use crate::transport::{tool_transport, HttpTransport};
use crate::types::ToolDefinition;
use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";
pub const WEATHER_TOOL_NAME: &str = "get_weather";

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    pub latitude: f64,
    pub longitude: f64,
}

pub struct WeatherTool {
    transport: HttpTransport,
    base_url: String,
}

impl WeatherTool {
    pub fn new() -> Result<Self> {
        Self::with_base_url(OPEN_METEO_BASE_URL)
    }

    /// Point the tool at another Open-Meteo compatible host.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            transport: tool_transport(Duration::from_secs(
                crate::config::DEFAULT_TIMEOUT_SECS,
            ))?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the `current` block of the forecast for the given coordinates.
    pub async fn current(&self, latitude: f64, longitude: f64) -> Result<Value> {
        let url = format!("{}/v1/forecast", self.base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
        ];
        let mut data = self.transport.get_json(&url, &query).await?;
        debug!(latitude, longitude, "forecast received");

        match data.get_mut("current").map(Value::take) {
            Some(current) if !current.is_null() => Ok(current),
            _ => Err(Error::ToolExecution {
                tool: WEATHER_TOOL_NAME.to_string(),
                message: "forecast response has no `current` block".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::for_args::<WeatherArgs>(
            WEATHER_TOOL_NAME,
            "Get current temperature for provided coordinates in celsius.",
        )
    }

    async fn call(&self, arguments: Value) -> Result<Value> {
        let args: WeatherArgs = parse_arguments(WEATHER_TOOL_NAME, &arguments)?;
        self.current(args.latitude, args.longitude).await
    }
}
