use crate::api::error::ApiError;
use crate::types::forecast::ForecastField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// A forecast form that cannot be turned into a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Unknown forecast field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' is not a number: '{value}'")]
    NotANumber { field: ForecastField, value: String },

    #[error("Field '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: ForecastField,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Start date and time '{0}' is not a valid timestamp")]
    InvalidDatetime(String),
}
