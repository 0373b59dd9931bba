//! The editable forecast form, the request it turns into, and the service's answer.

use crate::error::InputError;
use crate::types::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Form value used for `datetime-local` inputs.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A named field of the forecast form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastField {
    Temperature,
    Humidity,
    WindSpeed,
    CloudCover,
    Datetime,
}

impl ForecastField {
    pub const ALL: [ForecastField; 5] = [
        ForecastField::Temperature,
        ForecastField::Humidity,
        ForecastField::WindSpeed,
        ForecastField::CloudCover,
        ForecastField::Datetime,
    ];

    /// Wire and form name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            ForecastField::Temperature => "temperature",
            ForecastField::Humidity => "humidity",
            ForecastField::WindSpeed => "wind_speed",
            ForecastField::CloudCover => "cloud_cover",
            ForecastField::Datetime => "datetime",
        }
    }

    /// Accepted range for the numeric fields, `None` for the datetime.
    pub fn range(&self) -> Option<RangeInclusive<f64>> {
        match self {
            ForecastField::Temperature => Some(-10.0..=50.0),
            ForecastField::Humidity => Some(0.0..=100.0),
            ForecastField::WindSpeed => Some(0.0..=20.0),
            ForecastField::CloudCover => Some(0.0..=100.0),
            ForecastField::Datetime => None,
        }
    }
}

impl fmt::Display for ForecastField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ForecastField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForecastField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| InputError::UnknownField(s.to_string()))
    }
}

/// The user-edited forecast form.
///
/// Values are kept exactly as typed; nothing is parsed until [`ForecastInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastInput {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub cloud_cover: String,
    pub datetime: String,
}

impl ForecastInput {
    /// The form as first shown: 25 °C, 60 %, 3 m/s, 30 % cloud, starting at `now`.
    pub fn seeded(now: NaiveDateTime) -> Self {
        Self {
            temperature: "25".to_string(),
            humidity: "60".to_string(),
            wind_speed: "3".to_string(),
            cloud_cover: "30".to_string(),
            datetime: now.format(FORM_DATETIME_FORMAT).to_string(),
        }
    }

    pub fn get(&self, field: ForecastField) -> &str {
        match field {
            ForecastField::Temperature => &self.temperature,
            ForecastField::Humidity => &self.humidity,
            ForecastField::WindSpeed => &self.wind_speed,
            ForecastField::CloudCover => &self.cloud_cover,
            ForecastField::Datetime => &self.datetime,
        }
    }

    /// Stores `raw` unconditionally.
    pub fn set(&mut self, field: ForecastField, raw: impl Into<String>) {
        let slot = match field {
            ForecastField::Temperature => &mut self.temperature,
            ForecastField::Humidity => &mut self.humidity,
            ForecastField::WindSpeed => &mut self.wind_speed,
            ForecastField::CloudCover => &mut self.cloud_cover,
            ForecastField::Datetime => &mut self.datetime,
        };
        *slot = raw.into();
    }

    /// Checks every field and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] found, in form order.
    pub fn validate(&self) -> Result<PredictionRequest, InputError> {
        let temperature = self.number(ForecastField::Temperature)?;
        let humidity = self.number(ForecastField::Humidity)?;
        let wind_speed = self.number(ForecastField::WindSpeed)?;
        let cloud_cover = self.number(ForecastField::CloudCover)?;
        let start = parse_timestamp(&self.datetime)
            .ok_or_else(|| InputError::InvalidDatetime(self.datetime.clone()))?;

        Ok(PredictionRequest {
            temperature,
            humidity,
            wind_speed,
            cloud_cover,
            datetime: self.datetime.trim().to_string(),
            start,
        })
    }

    fn number(&self, field: ForecastField) -> Result<f64, InputError> {
        let raw = self.get(field);
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputError::NotANumber {
                field,
                value: raw.to_string(),
            })?;
        match field.range() {
            Some(range) if !range.contains(&value) => Err(InputError::OutOfRange {
                field,
                value,
                min: *range.start(),
                max: *range.end(),
            }),
            _ => Ok(value),
        }
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub cloud_cover: f64,
    /// Sent as typed into the form.
    pub datetime: String,
    /// Parsed form of `datetime`; the first forecast hour.
    #[serde(skip)]
    pub start: NaiveDateTime,
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResult {
    /// Predicted load in kW, one entry per hour from the request's start.
    pub predictions: Vec<f64>,
    /// Between 0 and 1.
    pub confidence: f64,
    pub forecast_period: String,
    pub location: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A forecast together with the start time of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub result: ForecastResult,
    pub start: NaiveDateTime,
}
