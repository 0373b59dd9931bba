use crate::types::timestamp;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// One hourly point of the weather forecast served by `GET /weather`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherPoint {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub datetime: NaiveDateTime,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Metres per second.
    pub wind_speed: f64,
    /// Percent of sky covered.
    pub cloud_cover: f64,
}

/// Body of `GET /weather?hours=N`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherForecast {
    pub location: String,
    pub forecast_period: String,
    /// Chronological, as sent by the service.
    pub weather_data: Vec<WeatherPoint>,
}
