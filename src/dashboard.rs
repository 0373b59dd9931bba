//! The dashboard orchestrator: owns every resource state, runs the fetches and
//! publishes consistent snapshots to the presentation layer.

use crate::api::client::ForecastApi;
use crate::cache::{ResourceCache, ResourceKind, ResourcePayload};
use crate::controller::ForecastController;
use crate::error::InputError;
use crate::projection::{forecast_chart, project_weather, ChartDataset};
use crate::types::forecast::{ForecastField, ForecastInput, PredictionRequest};
use crate::types::holiday::HolidayEntry;
use crate::views::{
    forecast_summary, model_summary, recent_history, upcoming_holidays, weather_cards,
    weather_header, ForecastSummary, HistoryTableRow, ModelSummary, WeatherCard, WeatherHeader,
};
use bon::bon;
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_WEATHER_HOURS: u32 = 24;
pub const DEFAULT_HISTORY_LIMIT: u32 = 24;

/// Failure reason recorded for a fetch whose task ended without a result.
pub const FETCH_ABANDONED: &str = "fetch ended before completing";

/// Everything the presentation layer may read, captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub resources: ResourceCache,
    pub forecast: ForecastController,
}

/// What happened to a submit request.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The prediction was sent; the handle resolves once its result is applied.
    ///
    /// Aborting the handle fails the forecast with the generic message.
    Dispatched(JoinHandle<()>),
    /// A prediction is already running; nothing was changed or sent.
    AlreadyInFlight,
}

type SharedState = Arc<watch::Sender<DashboardSnapshot>>;

/// Settles the resource of a spawned request.
///
/// Built before the task is spawned and moved into it. If the task is aborted, panics,
/// or is dropped unpolled, the fallback transition runs on drop so the resource never
/// stays `Loading`.
struct Settlement<F>
where
    F: FnOnce(&mut DashboardSnapshot) -> bool,
{
    state: SharedState,
    fallback: Option<F>,
}

impl<F> Settlement<F>
where
    F: FnOnce(&mut DashboardSnapshot) -> bool,
{
    fn new(state: SharedState, fallback: F) -> Self {
        Self {
            state,
            fallback: Some(fallback),
        }
    }

    /// Applies `transition` in place of the fallback.
    fn settle(mut self, transition: impl FnOnce(&mut DashboardSnapshot) -> bool) {
        self.fallback = None;
        self.state.send_if_modified(transition);
    }
}

impl<F> Drop for Settlement<F>
where
    F: FnOnce(&mut DashboardSnapshot) -> bool,
{
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            warn!("Request task ended without a result");
            self.state.send_if_modified(fallback);
        }
    }
}

/// Coordinates the four startup fetches and the prediction flow.
///
/// State lives in a [`watch`] channel, so every transition replaces the snapshot as a
/// whole and wakes subscribers. Fetches run as independent tokio tasks; none waits on
/// another.
///
/// # Examples
///
/// ```no_run
/// use demand_dashboard::{Dashboard, HttpForecastApi};
/// use chrono::Local;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dashboard = Dashboard::builder()
///     .api(HttpForecastApi::from_env()?)
///     .build();
///
/// let mut updates = dashboard.subscribe();
/// dashboard.start();
/// while updates.changed().await.is_ok() {
///     let view = dashboard.render(Local::now().date_naive());
///     println!("{} upcoming holidays", view.upcoming_holidays.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard<A: ForecastApi> {
    api: Arc<A>,
    state: SharedState,
    weather_hours: u32,
    history_limit: u32,
}

#[bon]
impl<A: ForecastApi> Dashboard<A> {
    /// Creates an idle dashboard. Nothing is fetched until [`Dashboard::start`].
    ///
    /// # Arguments
    ///
    /// * `.api(A)`: **Required.** The service to talk to.
    /// * `.weather_hours(u32)`: Optional. Hours of weather forecast to request. Defaults to `24`.
    /// * `.history_limit(u32)`: Optional. Historical rows to request. Defaults to `24`.
    /// * `.now(NaiveDateTime)`: Optional. Seeds the form's start time. Defaults to the local
    ///   wall clock, so the form shows the time the user reads off their own clock rather than
    ///   UTC. Pass `Utc::now().naive_utc()` to seed in UTC instead.
    #[builder]
    pub fn new(
        api: A,
        weather_hours: Option<u32>,
        history_limit: Option<u32>,
        now: Option<NaiveDateTime>,
    ) -> Self {
        let now = now.unwrap_or_else(|| Local::now().naive_local());
        let (state, _) = watch::channel(DashboardSnapshot {
            resources: ResourceCache::default(),
            forecast: ForecastController::new(now),
        });

        Self {
            api: Arc::new(api),
            state: Arc::new(state),
            weather_hours: weather_hours.unwrap_or(DEFAULT_WEATHER_HOURS),
            history_limit: history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// A receiver that is woken on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.borrow().clone()
    }

    /// Builds every projection and view from one snapshot.
    pub fn render(&self, today: NaiveDate) -> DashboardView {
        DashboardView::from_snapshot(&self.snapshot(), today)
    }

    /// Fires the weather, holiday, history and model-info fetches concurrently.
    ///
    /// Returns a handle per fetch that was started; awaiting them is optional.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        ResourceKind::ALL
            .into_iter()
            .filter_map(|kind| self.refetch(kind))
            .collect()
    }

    /// Fetches one startup resource again. Returns `None` if it is already loading.
    ///
    /// Failures are recorded and logged, never surfaced to the user. Aborting the handle
    /// records [`FETCH_ABANDONED`].
    pub fn refetch(&self, kind: ResourceKind) -> Option<JoinHandle<()>> {
        if !self.state.send_if_modified(|s| s.resources.begin_load(kind)) {
            debug!("Skipping {} fetch: already loading", kind);
            return None;
        }

        let api = Arc::clone(&self.api);
        let settlement = Settlement::new(Arc::clone(&self.state), move |s: &mut DashboardSnapshot| {
            s.resources.fail(kind, FETCH_ABANDONED)
        });
        let weather_hours = self.weather_hours;
        let history_limit = self.history_limit;

        Some(tokio::spawn(async move {
            let outcome = match kind {
                ResourceKind::Weather => api.weather(weather_hours).await.map(ResourcePayload::Weather),
                ResourceKind::Holidays => api.holidays().await.map(ResourcePayload::Holidays),
                ResourceKind::History => api
                    .historical_data(history_limit)
                    .await
                    .map(ResourcePayload::History),
                ResourceKind::ModelInfo => api.model_info().await.map(ResourcePayload::ModelInfo),
            };

            match outcome {
                Ok(payload) => {
                    info!("Fetched {}", kind);
                    settlement.settle(|s| s.resources.succeed(payload));
                }
                Err(e) => {
                    error!("Error fetching {} ({:?}): {}", kind, e.failure_kind(), e);
                    let reason = e.to_string();
                    settlement.settle(|s| s.resources.fail(kind, reason));
                }
            }
        }))
    }

    /// Stores a raw form value.
    pub fn update_field(&self, field: ForecastField, raw: impl Into<String>) {
        let raw = raw.into();
        self.state.send_modify(|s| s.forecast.update_field(field, raw));
    }

    /// Stores a raw form value addressed by the field's form name.
    pub fn update_field_by_name(&self, name: &str, raw: impl Into<String>) -> Result<(), InputError> {
        let field = name.parse::<ForecastField>()?;
        self.update_field(field, raw);
        Ok(())
    }

    /// Sends the current form as a prediction request.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the form does not validate; nothing is sent.
    pub fn submit(&self) -> Result<SubmitOutcome, InputError> {
        let mut decision: Result<Option<PredictionRequest>, InputError> = Ok(None);
        self.state.send_if_modified(|s| {
            decision = s.forecast.begin_submit();
            matches!(decision, Ok(Some(_)))
        });

        let Some(request) = decision? else {
            debug!("Ignoring submit: a forecast is already being generated");
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        let api = Arc::clone(&self.api);
        let settlement = Settlement::new(Arc::clone(&self.state), |s: &mut DashboardSnapshot| {
            s.forecast.abandon()
        });
        Ok(SubmitOutcome::Dispatched(tokio::spawn(async move {
            let outcome = api.predict(&request).await;
            settlement.settle(|s| s.forecast.complete(request.start, outcome));
        })))
    }
}

/// Presentation-ready content of every dashboard section.
///
/// `None` charts mean "nothing to draw yet"; failed startup resources look exactly like
/// ones that are still loading.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub input: ForecastInput,
    pub submit_enabled: bool,
    pub forecast_error: Option<String>,
    pub forecast_chart: Option<ChartDataset>,
    pub forecast_summary: Option<ForecastSummary>,
    pub weather_header: Option<WeatherHeader>,
    pub weather_chart: Option<ChartDataset>,
    pub weather_cards: Vec<WeatherCard>,
    pub upcoming_holidays: Vec<HolidayEntry>,
    pub recent_history: Vec<HistoryTableRow>,
    pub model: Option<ModelSummary>,
}

impl DashboardView {
    pub fn from_snapshot(snapshot: &DashboardSnapshot, today: NaiveDate) -> Self {
        let resources = &snapshot.resources;
        let forecast = snapshot.forecast.forecast();
        let weather = resources.weather.value();

        Self {
            input: snapshot.forecast.input().clone(),
            submit_enabled: snapshot.forecast.can_submit(),
            forecast_error: snapshot.forecast.error_message().map(str::to_string),
            forecast_chart: forecast.and_then(forecast_chart),
            forecast_summary: forecast.map(|f| forecast_summary(&f.result)),
            weather_header: weather.map(weather_header),
            weather_chart: weather.and_then(|w| project_weather(&w.weather_data)),
            weather_cards: weather
                .map(|w| weather_cards(&w.weather_data))
                .unwrap_or_default(),
            upcoming_holidays: resources
                .holidays
                .value()
                .map(|c| upcoming_holidays(&c.holidays, today))
                .unwrap_or_default(),
            recent_history: resources
                .history
                .value()
                .map(|h| recent_history(&h.data))
                .unwrap_or_default(),
            model: resources.model_info.value().map(model_summary),
        }
    }
}
