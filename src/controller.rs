//! The forecast form and the lifecycle of the single prediction request.

use crate::api::error::ApiError;
use crate::error::InputError;
use crate::types::forecast::{Forecast, ForecastField, ForecastInput, ForecastResult, PredictionRequest};
use crate::types::resource_state::ResourceState;
use chrono::NaiveDateTime;
use log::{error, info};

/// The only message a user ever sees for a failed prediction.
pub const FORECAST_FAILURE_MESSAGE: &str = "Failed to generate forecast. Please try again.";

/// Owns the editable [`ForecastInput`] and the state of the prediction it produced.
///
/// At most one prediction is in flight: [`ForecastController::begin_submit`] refuses to
/// start another while the state is `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastController {
    input: ForecastInput,
    state: ResourceState<Forecast>,
}

impl ForecastController {
    /// A controller with the default form, starting at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            input: ForecastInput::seeded(now),
            state: ResourceState::Idle,
        }
    }

    pub fn input(&self) -> &ForecastInput {
        &self.input
    }

    pub fn state(&self) -> &ResourceState<Forecast> {
        &self.state
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.state.value()
    }

    /// The user-facing error of the last prediction, if it failed.
    pub fn error_message(&self) -> Option<&str> {
        self.state.error()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }

    /// Stores `raw` for `field` as typed; range checks happen on submit.
    pub fn update_field(&mut self, field: ForecastField, raw: impl Into<String>) {
        self.input.set(field, raw);
    }

    /// Like [`ForecastController::update_field`], addressing the field by its form name.
    pub fn update_field_by_name(&mut self, name: &str, raw: impl Into<String>) -> Result<(), InputError> {
        let field = name.parse::<ForecastField>()?;
        self.update_field(field, raw);
        Ok(())
    }

    /// Starts a prediction from the current form.
    ///
    /// Returns `Ok(None)` without touching anything when a prediction is already in
    /// flight. Otherwise validates the form, moves to `Loading` (dropping any previous
    /// error or result) and returns the request to send.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for an invalid form; the state is left as it was.
    pub fn begin_submit(&mut self) -> Result<Option<PredictionRequest>, InputError> {
        if self.state.is_loading() {
            return Ok(None);
        }
        let request = self.input.validate()?;
        self.state.begin_load();
        info!("Requesting forecast starting at {}", request.datetime);
        Ok(Some(request))
    }

    /// Applies the outcome of the request sent for a forecast starting at `start`.
    ///
    /// Every failure collapses to [`FORECAST_FAILURE_MESSAGE`]; the cause is only logged.
    pub fn complete(&mut self, start: NaiveDateTime, outcome: Result<ForecastResult, ApiError>) -> bool {
        match outcome {
            Ok(result) => self.state.succeed(Forecast { result, start }),
            Err(e) => {
                error!("Error making prediction ({:?}): {}", e.failure_kind(), e);
                self.state.fail(FORECAST_FAILURE_MESSAGE)
            }
        }
    }

    /// Fails an in-flight prediction whose request ended without an outcome.
    pub fn abandon(&mut self) -> bool {
        self.state.fail(FORECAST_FAILURE_MESSAGE)
    }
}
