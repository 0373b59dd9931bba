//! Access to the forecast service: the [`ForecastApi`] seam and its reqwest-backed
//! implementation.

use crate::api::error::ApiError;
use crate::types::forecast::{ForecastResult, PredictionRequest};
use crate::types::history::HistoricalData;
use crate::types::holiday::HolidayCalendar;
use crate::types::model_info::ModelInfo;
use crate::types::weather::WeatherForecast;
use bon::bon;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Environment variable holding the service base URL.
pub const BASE_URL_ENV: &str = "FORECAST_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The remote endpoints the dashboard consumes.
///
/// Every call is a single attempt; callers decide what a failure means.
pub trait ForecastApi: Send + Sync + 'static {
    /// `GET /weather?hours={hours}`
    fn weather(&self, hours: u32) -> impl Future<Output = Result<WeatherForecast, ApiError>> + Send;

    /// `GET /holidays`
    fn holidays(&self) -> impl Future<Output = Result<HolidayCalendar, ApiError>> + Send;

    /// `GET /historical-data?limit={limit}`
    fn historical_data(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<HistoricalData, ApiError>> + Send;

    /// `GET /model-info`
    fn model_info(&self) -> impl Future<Output = Result<ModelInfo, ApiError>> + Send;

    /// `POST /predict`
    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<ForecastResult, ApiError>> + Send;
}

/// [`ForecastApi`] over HTTP.
///
/// # Examples
///
/// ```
/// use demand_dashboard::HttpForecastApi;
/// use std::time::Duration;
///
/// let api = HttpForecastApi::builder()
///     .base_url("http://localhost:8000/")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(api.base_url(), "http://localhost:8000");
/// ```
#[derive(Debug, Clone)]
pub struct HttpForecastApi {
    client: Client,
    base_url: String,
}

#[bon]
impl HttpForecastApi {
    /// Creates a client for the service at `base_url`.
    ///
    /// No timeout is applied unless one is given; a request runs until the service
    /// answers or the connection fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute URL and
    /// [`ApiError::ClientBuild`] if the TLS backend cannot be initialised.
    #[builder]
    pub fn new(
        #[builder(into)] base_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::ClientBuild)?;

        Ok(Self { client, base_url })
    }

    /// Creates a client from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::builder().base_url(base_url).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::NetworkRequest(url.clone(), e))?;

        Self::decode(url, response).await
    }

    /// Checks the status and parses the body of `response`.
    async fn decode<T: DeserializeOwned>(url: String, response: Response) -> Result<T, ApiError> {
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ApiError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ApiError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::NetworkRequest(url.clone(), e))?;

        serde_json::from_slice(&body).map_err(|source| ApiError::MalformedResponse { url, source })
    }
}

impl ForecastApi for HttpForecastApi {
    async fn weather(&self, hours: u32) -> Result<WeatherForecast, ApiError> {
        self.get_json("/weather", &[("hours", hours.to_string())]).await
    }

    async fn holidays(&self) -> Result<HolidayCalendar, ApiError> {
        self.get_json("/holidays", &[]).await
    }

    async fn historical_data(&self, limit: u32) -> Result<HistoricalData, ApiError> {
        self.get_json("/historical-data", &[("limit", limit.to_string())])
            .await
    }

    async fn model_info(&self) -> Result<ModelInfo, ApiError> {
        self.get_json("/model-info", &[]).await
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<ForecastResult, ApiError> {
        let url = self.url("/predict");
        debug!("POST {} {:?}", url, request);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::NetworkRequest(url.clone(), e))?;

        Self::decode(url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::FailureKind;
    use crate::types::forecast::ForecastInput;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::error::Error;

    async fn serve(router: Router) -> Result<HttpForecastApi, Box<dyn Error>> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, router).await });
        Ok(HttpForecastApi::builder()
            .base_url(format!("http://{addr}/"))
            .build()?)
    }

    fn service() -> Router {
        Router::new()
            .route(
                "/weather",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    Json(json!({
                        "location": "Dhanbad, Jharkhand, India",
                        "forecast_period": format!("{} hours", q["hours"]),
                        "weather_data": [{
                            "datetime": "2024-05-01T14:00:00",
                            "temperature": 31.5, "humidity": 48.0,
                            "wind_speed": 2.5, "cloud_cover": 10.0
                        }]
                    }))
                }),
            )
            .route(
                "/historical-data",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let limit: usize = q["limit"].parse().unwrap_or(0);
                    let rows: Vec<Value> = (0..limit)
                        .map(|i| json!({"Datetime": format!("2024-05-01T{:02}:00:00", i % 24), "Temperature": 25.0}))
                        .collect();
                    Json(json!({"data": rows, "total_records": 50000}))
                }),
            )
            .route("/holidays", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .route("/model-info", get(|| async { Json(json!({"model_loaded": "yes"})) }))
            .route(
                "/predict",
                post(|Json(body): Json<Value>| async move {
                    let temperature = body["temperature"].as_f64().unwrap_or_default();
                    Json(json!({
                        "predictions": [temperature, temperature + 1.0],
                        "confidence": 0.6,
                        "timestamp": "2024-05-01T14:00:00",
                        "forecast_period": "24 hours (96 blocks of 10 minutes)",
                        "location": body["datetime"],
                    }))
                }),
            )
    }

    #[test]
    fn rejects_relative_base_url() {
        let result = HttpForecastApi::builder().base_url("localhost").build();
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn fetches_weather_with_hours_query() -> Result<(), Box<dyn Error>> {
        let api = serve(service()).await?;
        let forecast = api.weather(24).await?;
        assert_eq!(forecast.forecast_period, "24 hours");
        assert_eq!(forecast.weather_data.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn fetches_history_with_limit_query() -> Result<(), Box<dyn Error>> {
        let api = serve(service()).await?;
        let history = api.historical_data(24).await?;
        assert_eq!(history.data.len(), 24);
        assert_eq!(history.total_records, Some(50000));
        Ok(())
    }

    #[tokio::test]
    async fn posts_prediction_request() -> Result<(), Box<dyn Error>> {
        let api = serve(service()).await?;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let request = ForecastInput::seeded(start).validate()?;

        let result = api.predict(&request).await?;
        assert_eq!(result.predictions, vec![25.0, 26.0]);
        assert_eq!(result.location, "2024-01-01T00:00");
        Ok(())
    }

    #[tokio::test]
    async fn classifies_failures() -> Result<(), Box<dyn Error>> {
        let api = serve(service()).await?;

        let server = api.holidays().await.unwrap_err();
        assert_eq!(server.failure_kind(), FailureKind::Server);

        let malformed = api.model_info().await.unwrap_err();
        assert_eq!(malformed.failure_kind(), FailureKind::Malformed);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        let unreachable = HttpForecastApi::builder()
            .base_url(format!("http://{addr}"))
            .build()?;
        let network = unreachable.holidays().await.unwrap_err();
        assert_eq!(network.failure_kind(), FailureKind::Network);
        Ok(())
    }
}
