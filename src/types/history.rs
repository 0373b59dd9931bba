use crate::types::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// One recorded interval from the utility's consumption history.
///
/// Rows come straight from a CSV export, so any instrument may be missing. Absent,
/// `null` and non-finite readings all deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoricalRow {
    #[serde(rename = "Datetime", alias = "datetime", default, deserialize_with = "timestamp::deserialize_lenient")]
    pub datetime: Option<NaiveDateTime>,
    #[serde(rename = "Temperature", alias = "temperature", default, deserialize_with = "finite")]
    pub temperature: Option<f64>,
    #[serde(rename = "Humidity", alias = "humidity", default, deserialize_with = "finite")]
    pub humidity: Option<f64>,
    #[serde(rename = "WindSpeed", alias = "wind_speed", default, deserialize_with = "finite")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "F1_132KV_PowerConsumption", alias = "feeder1_power", default, deserialize_with = "finite")]
    pub feeder1_power: Option<f64>,
    #[serde(rename = "F2_132KV_PowerConsumption", alias = "feeder2_power", default, deserialize_with = "finite")]
    pub feeder2_power: Option<f64>,
    #[serde(rename = "F3_132KV_PowerConsumption", alias = "feeder3_power", default, deserialize_with = "finite")]
    pub feeder3_power: Option<f64>,
}

/// Body of `GET /historical-data?limit=N`. Most recent rows first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoricalData {
    pub data: Vec<HistoricalRow>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

fn finite<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    // pandas exports gaps as NaN strings or nulls depending on the writer
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}
