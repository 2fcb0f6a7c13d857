use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use crate::error::WeatherError;
use crate::payload::ForecastDocument;

/// HTTP client for the JMA per-office forecast feed.
#[derive(Debug, Clone)]
pub struct JmaClient {
    client: Client,
    base_url: String,
}

impl JmaClient {
    /// Build a client with the given feed base URL and per-request
    /// timeout. A timed-out fetch surfaces as that area's failure
    /// during sync, never as a pass-wide abort.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast document set for one office: index 0 is the
    /// short-range report, index 1 the weekly report when present.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_office(
        &self,
        office_code: &str,
    ) -> Result<Vec<ForecastDocument>, WeatherError> {
        let url = format!("{}/{}.json", self.base_url, office_code);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<ForecastDocument>>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_office_parses_document_set() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"timeSeries": [{
                    "timeDefines": ["2024-01-01T11:00:00+09:00"],
                    "areas": [{
                        "area": {"name": "東京地方", "code": "130010"},
                        "weatherCodes": ["100"],
                        "weathers": ["晴れ"]
                    }]
                }]}
            ])))
            .mount(&mock_server)
            .await;

        let client = JmaClient::new(&mock_server.uri(), Duration::from_secs(5)).unwrap();
        let docs = client.fetch_office("130000").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].time_series[0].areas[0].area.code, "130010");
    }

    #[tokio::test]
    async fn test_fetch_office_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/130000.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = JmaClient::new(&mock_server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_office("130000").await.unwrap_err();
        assert!(matches!(err, WeatherError::Http { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_office_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = JmaClient::new(&mock_server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_office("130000").await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }
}
