//! Data orchestration for a utility demand forecast dashboard.
//!
//! The crate fetches weather, holiday, history and model metadata from the forecast
//! service, runs prediction requests from a user-edited form, and turns the raw
//! payloads into chart-ready datasets and bounded table views. Rendering is left to
//! the caller.

mod api;
mod cache;
mod controller;
mod dashboard;
mod error;
mod projection;
mod types;
mod views;

pub use error::{DashboardError, InputError};

pub use api::client::{ForecastApi, HttpForecastApi, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use api::error::{ApiError, FailureKind};

pub use cache::{ResourceCache, ResourceKind, ResourcePayload};
pub use controller::{ForecastController, FORECAST_FAILURE_MESSAGE};
pub use dashboard::*;
pub use projection::*;
pub use views::*;

pub use types::forecast::{
    Forecast, ForecastField, ForecastInput, ForecastResult, PredictionRequest,
    FORM_DATETIME_FORMAT,
};
pub use types::history::{HistoricalData, HistoricalRow};
pub use types::holiday::{HolidayCalendar, HolidayEntry};
pub use types::model_info::ModelInfo;
pub use types::resource_state::ResourceState;
pub use types::timestamp::{clock_label, parse_timestamp, CLOCK_FORMAT};
pub use types::weather::{WeatherForecast, WeatherPoint};
