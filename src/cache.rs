//! Latest known state of each independently fetched dashboard resource.

use crate::types::history::HistoricalData;
use crate::types::holiday::HolidayCalendar;
use crate::types::model_info::ModelInfo;
use crate::types::resource_state::ResourceState;
use crate::types::weather::WeatherForecast;
use log::warn;
use std::fmt;

/// The four resources fetched when the dashboard starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Weather,
    Holidays,
    History,
    ModelInfo,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Weather,
        ResourceKind::Holidays,
        ResourceKind::History,
        ResourceKind::ModelInfo,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Weather => "weather",
            ResourceKind::Holidays => "holidays",
            ResourceKind::History => "historical data",
            ResourceKind::ModelInfo => "model info",
        };
        write!(f, "{}", name)
    }
}

/// A successfully fetched value, tagged with the resource it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourcePayload {
    Weather(WeatherForecast),
    Holidays(HolidayCalendar),
    History(HistoricalData),
    ModelInfo(ModelInfo),
}

impl ResourcePayload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourcePayload::Weather(_) => ResourceKind::Weather,
            ResourcePayload::Holidays(_) => ResourceKind::Holidays,
            ResourcePayload::History(_) => ResourceKind::History,
            ResourcePayload::ModelInfo(_) => ResourceKind::ModelInfo,
        }
    }
}

/// One [`ResourceState`] per [`ResourceKind`].
///
/// Transition methods return whether the state actually changed, so the owner can
/// skip notifying readers on a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCache {
    pub weather: ResourceState<WeatherForecast>,
    pub holidays: ResourceState<HolidayCalendar>,
    pub history: ResourceState<HistoricalData>,
    pub model_info: ResourceState<ModelInfo>,
}

impl ResourceCache {
    pub fn is_loading(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Weather => self.weather.is_loading(),
            ResourceKind::Holidays => self.holidays.is_loading(),
            ResourceKind::History => self.history.is_loading(),
            ResourceKind::ModelInfo => self.model_info.is_loading(),
        }
    }

    /// Marks `kind` as loading. A no-op if it already is.
    pub fn begin_load(&mut self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Weather => self.weather.begin_load(),
            ResourceKind::Holidays => self.holidays.begin_load(),
            ResourceKind::History => self.history.begin_load(),
            ResourceKind::ModelInfo => self.model_info.begin_load(),
        }
    }

    /// Stores a fetched value for the resource named by the payload.
    pub fn succeed(&mut self, payload: ResourcePayload) -> bool {
        let kind = payload.kind();
        let changed = match payload {
            ResourcePayload::Weather(value) => self.weather.succeed(value),
            ResourcePayload::Holidays(value) => self.holidays.succeed(value),
            ResourcePayload::History(value) => self.history.succeed(value),
            ResourcePayload::ModelInfo(value) => self.model_info.succeed(value),
        };
        if !changed {
            warn!("Ignoring {} result: resource was not loading", kind);
        }
        changed
    }

    /// Records a failed fetch for `kind`.
    pub fn fail(&mut self, kind: ResourceKind, reason: impl Into<String>) -> bool {
        let changed = match kind {
            ResourceKind::Weather => self.weather.fail(reason),
            ResourceKind::Holidays => self.holidays.fail(reason),
            ResourceKind::History => self.history.fail(reason),
            ResourceKind::ModelInfo => self.model_info.fail(reason),
        };
        if !changed {
            warn!("Ignoring {} failure: resource was not loading", kind);
        }
        changed
    }
}
