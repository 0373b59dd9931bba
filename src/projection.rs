//! Turns raw payloads into chart-ready datasets.
//!
//! Every function here is pure. An empty source yields `None`, meaning "nothing to
//! draw yet", which a renderer must keep apart from an empty chart.

use crate::types::forecast::Forecast;
use crate::types::timestamp::clock_label;
use crate::types::weather::WeatherPoint;
use chrono::{NaiveDateTime, TimeDelta};

pub const FORECAST_TITLE: &str = "24-Hour Power Consumption Forecast";
pub const FORECAST_SERIES_LABEL: &str = "Predicted Power Consumption (kW)";
pub const WEATHER_TITLE: &str = "24-Hour Weather Forecast";

/// Opacity applied to a series colour for its fill.
pub const FILL_ALPHA: f64 = 0.2;

/// Independent value scales a series can be drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisId {
    Primary,
    Secondary,
    Tertiary,
}

impl AxisId {
    /// Scale key understood by the charting surface.
    pub fn key(&self) -> &'static str {
        match self {
            AxisId::Primary => "y",
            AxisId::Secondary => "y1",
            AxisId::Tertiary => "y2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub id: AxisId,
    pub side: AxisSide,
    pub visible: bool,
    pub begin_at_zero: bool,
    pub title: Option<String>,
    /// Whether grid lines of this axis are drawn across the chart area.
    pub draw_grid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba(self.0, self.1, self.2, alpha)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f64);

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub axis: AxisId,
    /// Line and point colour.
    pub color: Rgb,
    /// Fill the area between the line and the axis origin.
    pub fill: bool,
}

impl Series {
    /// Background colour: the line colour at [`FILL_ALPHA`]. Painted under the line
    /// only when `fill` is set.
    pub fn fill_color(&self) -> Rgba {
        self.color.with_alpha(FILL_ALPHA)
    }
}

/// Labels, series and scales for one chart. Every series has one value per label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub title: String,
    pub x_title: Option<String>,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub axes: Vec<Axis>,
}

impl ChartDataset {
    pub fn axis(&self, id: AxisId) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.id == id)
    }
}

/// Projects predictions onto hourly `HH:MM` labels counted from `start`.
///
/// Index `i` is labelled `start + i hours`, wrapping past midnight.
pub fn project_forecast(predictions: &[f64], start: NaiveDateTime) -> Option<ChartDataset> {
    if predictions.is_empty() {
        return None;
    }

    let labels = (0..predictions.len())
        .map(|i| {
            start
                .checked_add_signed(TimeDelta::hours(i as i64))
                .map(|dt| clock_label(&dt))
                .unwrap_or_else(|| "--:--".to_string())
        })
        .collect();

    Some(ChartDataset {
        title: FORECAST_TITLE.to_string(),
        x_title: Some("Time".to_string()),
        labels,
        series: vec![Series {
            label: FORECAST_SERIES_LABEL.to_string(),
            values: predictions.to_vec(),
            axis: AxisId::Primary,
            color: Rgb(75, 192, 192),
            fill: true,
        }],
        axes: vec![Axis {
            id: AxisId::Primary,
            side: AxisSide::Left,
            visible: true,
            begin_at_zero: true,
            title: Some("Power Consumption (kW)".to_string()),
            draw_grid: true,
        }],
    })
}

/// [`project_forecast`] for a stored [`Forecast`].
pub fn forecast_chart(forecast: &Forecast) -> Option<ChartDataset> {
    project_forecast(&forecast.result.predictions, forecast.start)
}

/// Projects weather points onto their own timestamps.
///
/// Temperature goes on the primary (left) scale, humidity and cloud cover share the
/// secondary (right) scale, and wind speed gets a hidden tertiary scale.
pub fn project_weather(points: &[WeatherPoint]) -> Option<ChartDataset> {
    if points.is_empty() {
        return None;
    }

    let labels = points.iter().map(|p| clock_label(&p.datetime)).collect();
    let series = |label: &str, axis: AxisId, color: Rgb, value: fn(&WeatherPoint) -> f64| Series {
        label: label.to_string(),
        values: points.iter().map(value).collect(),
        axis,
        color,
        fill: false,
    };

    Some(ChartDataset {
        title: WEATHER_TITLE.to_string(),
        x_title: None,
        labels,
        series: vec![
            series("Temperature (°C)", AxisId::Primary, Rgb(255, 99, 132), |p| p.temperature),
            series("Humidity (%)", AxisId::Secondary, Rgb(54, 162, 235), |p| p.humidity),
            series("Wind Speed (m/s)", AxisId::Tertiary, Rgb(255, 206, 86), |p| p.wind_speed),
            series("Cloud Cover (%)", AxisId::Secondary, Rgb(153, 102, 255), |p| p.cloud_cover),
        ],
        axes: vec![
            Axis {
                id: AxisId::Primary,
                side: AxisSide::Left,
                visible: true,
                begin_at_zero: false,
                title: Some("Temperature (°C)".to_string()),
                draw_grid: true,
            },
            Axis {
                id: AxisId::Secondary,
                side: AxisSide::Right,
                visible: true,
                begin_at_zero: false,
                title: Some("Humidity / Cloud Cover (%)".to_string()),
                draw_grid: false,
            },
            Axis {
                id: AxisId::Tertiary,
                side: AxisSide::Right,
                visible: false,
                begin_at_zero: false,
                title: None,
                draw_grid: false,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn point(hour: u32, temperature: f64) -> WeatherPoint {
        WeatherPoint {
            datetime: at(hour, 0),
            temperature,
            humidity: 60.0,
            wind_speed: 3.0,
            cloud_cover: 30.0,
        }
    }

    #[test]
    fn forecast_labels_count_hours_from_start() {
        let chart = project_forecast(&[10.0, 12.0, 11.0], at(0, 0)).unwrap();
        assert_eq!(chart.labels, vec!["00:00", "01:00", "02:00"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, FORECAST_SERIES_LABEL);
        assert_eq!(chart.series[0].values, vec![10.0, 12.0, 11.0]);
        assert!(chart.series[0].fill);
        assert_eq!(chart.series[0].fill_color(), Rgba(75, 192, 192, FILL_ALPHA));

        let axis = chart.axis(AxisId::Primary).unwrap();
        assert!(axis.begin_at_zero);
        assert_eq!(axis.side, AxisSide::Left);
    }

    #[test]
    fn forecast_labels_wrap_past_midnight() {
        let predictions: Vec<f64> = (0..30).map(f64::from).collect();
        let start = at(22, 30);
        let chart = project_forecast(&predictions, start).unwrap();

        assert_eq!(chart.labels.len(), predictions.len());
        for (i, label) in chart.labels.iter().enumerate() {
            let expected = start + TimeDelta::hours(i as i64);
            assert_eq!(label, &expected.format("%H:%M").to_string());
        }
        assert_eq!(chart.labels[1], "23:30");
        assert_eq!(chart.labels[2], "00:30");
        assert_eq!(chart.labels[26], "00:30");
    }

    #[test]
    fn forecast_projection_is_pure() {
        let predictions = [25_000.0, 24_100.5, 23_980.2];
        assert_eq!(
            project_forecast(&predictions, at(6, 0)),
            project_forecast(&predictions, at(6, 0))
        );
    }

    #[test]
    fn empty_sources_yield_no_dataset() {
        assert_eq!(project_forecast(&[], at(0, 0)), None);
        assert_eq!(project_weather(&[]), None);
    }

    #[test]
    fn weather_series_keep_fixed_axes() {
        let chart = project_weather(&[point(14, 31.0), point(15, -2.0)]).unwrap();
        assert_eq!(chart.labels, vec!["14:00", "15:00"]);

        let axes: Vec<(&str, AxisId)> = chart
            .series
            .iter()
            .map(|s| (s.label.as_str(), s.axis))
            .collect();
        assert_eq!(
            axes,
            vec![
                ("Temperature (°C)", AxisId::Primary),
                ("Humidity (%)", AxisId::Secondary),
                ("Wind Speed (m/s)", AxisId::Tertiary),
                ("Cloud Cover (%)", AxisId::Secondary),
            ]
        );
        assert_eq!(chart.series[0].values, vec![31.0, -2.0]);
        assert!(!chart.axis(AxisId::Tertiary).unwrap().visible);
        assert!(chart.series.iter().all(|s| s.values.len() == chart.labels.len()));
        assert!(chart.series.iter().all(|s| !s.fill));
        assert_eq!(chart.series[1].fill_color(), Rgba(54, 162, 235, 0.2));
    }
}
