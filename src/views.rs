//! Bounded, display-ready views derived from the cached resources.

use crate::types::forecast::ForecastResult;
use crate::types::history::HistoricalRow;
use crate::types::holiday::HolidayEntry;
use crate::types::model_info::ModelInfo;
use crate::types::timestamp::clock_label;
use crate::types::weather::{WeatherForecast, WeatherPoint};
use chrono::NaiveDate;
use std::fmt;

/// Shown wherever a reading is unavailable.
pub const PLACEHOLDER: &str = "N/A";
pub const UPCOMING_HOLIDAY_LIMIT: usize = 5;
pub const RECENT_HISTORY_LIMIT: usize = 10;
pub const WEATHER_CARD_LIMIT: usize = 6;

pub const HISTORY_COLUMNS: [&str; 7] = [
    "Date/Time",
    "Temperature (°C)",
    "Humidity (%)",
    "Wind Speed (m/s)",
    "F1 Power (kW)",
    "F2 Power (kW)",
    "F3 Power (kW)",
];

const HISTORY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A table cell that either holds formatted text or marks a missing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Value(String),
    Unavailable,
}

impl Cell {
    fn reading(value: Option<f64>, decimals: usize) -> Self {
        match value {
            Some(v) => Cell::Value(format!("{:.*}", decimals, v)),
            None => Cell::Unavailable,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(text) => write!(f, "{}", text),
            Cell::Unavailable => write!(f, "{}", PLACEHOLDER),
        }
    }
}

/// Holidays on or after `today`, in source order, at most [`UPCOMING_HOLIDAY_LIMIT`].
pub fn upcoming_holidays(holidays: &[HolidayEntry], today: NaiveDate) -> Vec<HolidayEntry> {
    holidays
        .iter()
        .filter(|holiday| holiday.date >= today)
        .take(UPCOMING_HOLIDAY_LIMIT)
        .cloned()
        .collect()
}

/// One rendered row of the recent-history table, columns as in [`HISTORY_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTableRow {
    pub datetime: Cell,
    pub temperature: Cell,
    pub humidity: Cell,
    pub wind_speed: Cell,
    pub feeder1_power: Cell,
    pub feeder2_power: Cell,
    pub feeder3_power: Cell,
}

impl HistoryTableRow {
    pub fn cells(&self) -> [&Cell; 7] {
        [
            &self.datetime,
            &self.temperature,
            &self.humidity,
            &self.wind_speed,
            &self.feeder1_power,
            &self.feeder2_power,
            &self.feeder3_power,
        ]
    }
}

impl From<&HistoricalRow> for HistoryTableRow {
    fn from(row: &HistoricalRow) -> Self {
        Self {
            datetime: row
                .datetime
                .map(|dt| Cell::Value(dt.format(HISTORY_DATETIME_FORMAT).to_string()))
                .unwrap_or(Cell::Unavailable),
            temperature: Cell::reading(row.temperature, 1),
            humidity: Cell::reading(row.humidity, 1),
            wind_speed: Cell::reading(row.wind_speed, 1),
            feeder1_power: Cell::reading(row.feeder1_power, 0),
            feeder2_power: Cell::reading(row.feeder2_power, 0),
            feeder3_power: Cell::reading(row.feeder3_power, 0),
        }
    }
}

/// The first [`RECENT_HISTORY_LIMIT`] rows as received (the service sends newest first).
pub fn recent_history(rows: &[HistoricalRow]) -> Vec<HistoryTableRow> {
    rows.iter()
        .take(RECENT_HISTORY_LIMIT)
        .map(HistoryTableRow::from)
        .collect()
}

/// Compact summary of one weather hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCard {
    pub time: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub cloud_cover: String,
}

impl From<&WeatherPoint> for WeatherCard {
    fn from(point: &WeatherPoint) -> Self {
        Self {
            time: clock_label(&point.datetime),
            temperature: format!("{:.1}°C", point.temperature),
            humidity: format!("{:.0}%", point.humidity),
            wind_speed: format!("{:.1} m/s", point.wind_speed),
            cloud_cover: format!("{:.0}%", point.cloud_cover),
        }
    }
}

pub fn weather_cards(points: &[WeatherPoint]) -> Vec<WeatherCard> {
    points
        .iter()
        .take(WEATHER_CARD_LIMIT)
        .map(WeatherCard::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherHeader {
    pub location: String,
    pub forecast_period: String,
}

pub fn weather_header(forecast: &WeatherForecast) -> WeatherHeader {
    WeatherHeader {
        location: forecast.location.clone(),
        forecast_period: forecast.forecast_period.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSummary {
    /// Percentage with one decimal, e.g. `"85.0%"`.
    pub confidence: String,
    pub forecast_period: String,
    pub location: String,
}

pub fn forecast_summary(result: &ForecastResult) -> ForecastSummary {
    ForecastSummary {
        confidence: format!("{:.1}%", result.confidence * 100.0),
        forecast_period: result.forecast_period.clone(),
        location: result.location.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    /// Short badge for the page header.
    pub badge: &'static str,
    pub status: &'static str,
    pub assignment: String,
    pub location: String,
    /// Only present for a loaded model.
    pub features: Option<String>,
}

pub fn model_summary(info: &ModelInfo) -> ModelSummary {
    let (badge, status) = if info.model_loaded {
        ("Model Loaded", "Production Model")
    } else {
        ("Mock Mode", "Mock Mode")
    };
    ModelSummary {
        badge,
        status,
        assignment: info.assignment.clone(),
        location: info.location.clone(),
        features: info
            .model_loaded
            .then(|| {
                let count = info
                    .features_count()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string());
                format!("{} engineered features", count)
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn holiday(month: u32, d: u32, name: &str) -> HolidayEntry {
        HolidayEntry {
            date: day(month, d),
            name: name.to_string(),
            category: None,
            is_holiday: Some(true),
        }
    }

    fn calendar() -> Vec<HolidayEntry> {
        vec![
            holiday(1, 26, "Republic Day"),
            holiday(8, 15, "Independence Day"),
            holiday(10, 2, "Gandhi Jayanti"),
            holiday(10, 12, "Dussehra"),
            holiday(11, 1, "Diwali"),
            holiday(11, 15, "Jharkhand Foundation Day"),
            holiday(12, 25, "Christmas"),
            holiday(9, 24, "Karam Puja"),
        ]
    }

    #[test]
    fn upcoming_holidays_include_today_and_cap_at_five() {
        let today = day(10, 2);
        let upcoming = upcoming_holidays(&calendar(), today);
        let names: Vec<&str> = upcoming.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Gandhi Jayanti",
                "Dussehra",
                "Diwali",
                "Jharkhand Foundation Day",
                "Christmas"
            ]
        );
        assert!(upcoming.iter().all(|h| h.date >= today && calendar().contains(h)));
    }

    #[test]
    fn upcoming_holidays_after_year_end_is_empty() {
        assert!(upcoming_holidays(&calendar(), day(12, 26)).is_empty());
        assert!(upcoming_holidays(&[], day(1, 1)).is_empty());
    }

    #[test]
    fn missing_feeder_renders_placeholder() {
        let row = HistoricalRow {
            datetime: NaiveDateTime::parse_from_str("2024-03-01 10:20:00", "%Y-%m-%d %H:%M:%S").ok(),
            temperature: Some(24.36),
            humidity: Some(58.04),
            wind_speed: Some(0.0),
            feeder1_power: Some(25011.6),
            feeder2_power: None,
            feeder3_power: Some(21990.2),
        };
        let rendered = recent_history(&[row]);
        let cells: Vec<String> = rendered[0].cells().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            cells,
            vec!["2024-03-01 10:20:00", "24.4", "58.0", "0.0", "25012", "N/A", "21990"]
        );
        assert_eq!(rendered[0].feeder2_power, Cell::Unavailable);
    }

    #[test]
    fn recent_history_keeps_first_ten_in_order() {
        let rows: Vec<HistoricalRow> = (0..24)
            .map(|i| HistoricalRow {
                temperature: Some(f64::from(i)),
                ..Default::default()
            })
            .collect();
        let rendered = recent_history(&rows);
        assert_eq!(rendered.len(), RECENT_HISTORY_LIMIT);
        assert_eq!(rendered[0].temperature, Cell::Value("0.0".to_string()));
        assert_eq!(rendered[9].temperature, Cell::Value("9.0".to_string()));
        assert_eq!(rendered[0].datetime, Cell::Unavailable);
    }

    #[test]
    fn summaries_format_like_the_dashboard() -> Result<(), Box<dyn std::error::Error>> {
        let result = ForecastResult {
            predictions: vec![1.0],
            confidence: 0.85,
            forecast_period: "24 hours".to_string(),
            location: "Dhanbad, Jharkhand, India".to_string(),
            timestamp: None,
        };
        assert_eq!(forecast_summary(&result).confidence, "85.0%");

        let loaded: ModelInfo = serde_json::from_str(
            r#"{"model_loaded": true, "assignment": "APU", "location": "Dhanbad", "features_count": 8}"#,
        )?;
        let summary = model_summary(&loaded);
        assert_eq!(summary.status, "Production Model");
        assert_eq!(summary.features.as_deref(), Some("8 engineered features"));

        let mock: ModelInfo = serde_json::from_str(
            r#"{"model_loaded": false, "assignment": "APU", "location": "Dhanbad"}"#,
        )?;
        let summary = model_summary(&mock);
        assert_eq!(summary.badge, "Mock Mode");
        assert_eq!(summary.features, None);
        Ok(())
    }

    #[test]
    fn weather_cards_take_first_six() {
        let points: Vec<WeatherPoint> = (0..24)
            .map(|h| WeatherPoint {
                datetime: day(5, 1).and_hms_opt(h, 0, 0).unwrap(),
                temperature: 27.25,
                humidity: 61.6,
                wind_speed: 3.04,
                cloud_cover: 19.4,
            })
            .collect();
        let cards = weather_cards(&points);
        assert_eq!(cards.len(), WEATHER_CARD_LIMIT);
        assert_eq!(cards[5].time, "05:00");
        assert_eq!(cards[0].humidity, "62%");
        assert_eq!(cards[0].wind_speed, "3.0 m/s");
        assert_eq!(cards[0].cloud_cover, "19%");
    }
}
