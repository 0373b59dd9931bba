use chrono::NaiveDate;
use serde::Deserialize;

/// A single entry of the local holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayEntry {
    /// Calendar day, `YYYY-MM-DD` on the wire.
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_holiday: Option<bool>,
}

/// Body of `GET /holidays`. Entry order is whatever the service sends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayCalendar {
    pub holidays: Vec<HolidayEntry>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub total_holidays: Option<usize>,
}
