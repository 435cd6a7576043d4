//! Client for the endoflife.date cycle API.

use async_trait::async_trait;
use tracing::{debug, warn};

use eolwatch_core::config::EndOfLifeConfig;
use eolwatch_core::error::AppError;
use eolwatch_core::result::AppResult;
use eolwatch_entity::Schema;
use eolwatch_entity::eol::EolFact;
use eolwatch_entity::subscription::CycleVersion;

use crate::error::IntegrationError;
use crate::http::{build_client, default_user_agent, parse_base_url};

/// Source of lifecycle facts for a release cycle.
#[async_trait]
pub trait EolGateway: Send + Sync {
    /// Current lifecycle facts for `technology` at `version`.
    async fn fetch_cycle_details(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> Result<EolFact, IntegrationError>;
}

/// `GET {base}/{technology}/{version}.json` against an endoflife.date style API.
#[derive(Debug, Clone)]
pub struct EndOfLifeClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl EndOfLifeClient {
    /// Build a client from configuration.
    pub fn new(config: &EndOfLifeConfig) -> AppResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "endoflife.base_url '{}' cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            client: build_client(&default_user_agent(), config.timeout_seconds)?,
            base_url,
        })
    }

    /// URL of one cycle document. Segments are percent-encoded.
    fn cycle_url(&self, technology: &str, version: &CycleVersion) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(technology)
                .push(&format!("{version}.json"));
        }
        url
    }
}

#[async_trait]
impl EolGateway for EndOfLifeClient {
    async fn fetch_cycle_details(
        &self,
        technology: &str,
        version: &CycleVersion,
    ) -> Result<EolFact, IntegrationError> {
        let url = self.cycle_url(technology, version);
        debug!(%url, "Fetching cycle details");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IntegrationError::transport("endoflife", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(technology, version = %version, status = status.as_u16(), "EOL lookup failed");
            return Err(IntegrationError::Gateway {
                technology: technology.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| IntegrationError::transport("endoflife", e))?;

        EolFact::parse_slice(&body).map_err(|source| IntegrationError::DataFormat {
            technology: technology.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eolwatch_entity::eol::EolStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> EndOfLifeClient {
        EndOfLifeClient::new(&EndOfLifeConfig {
            base_url: format!("{}/api/", server.uri()),
            timeout_seconds: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetches_scheduled_eol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/nodejs/20.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "releaseDate": "2023-04-18",
                "eol": "2026-04-30",
                "latest": "20.18.0",
                "latestReleaseDate": "2024-10-03",
                "lts": "2023-10-24",
                "support": "2024-10-22",
                "extendedSupport": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fact = client_for(&server)
            .fetch_cycle_details("nodejs", &CycleVersion::from(20))
            .await
            .unwrap();
        assert_eq!(
            fact.status(),
            EolStatus::Scheduled(NaiveDate::from_ymd_opt(2026, 4, 30).unwrap())
        );
        assert_eq!(fact.latest.as_deref(), Some("20.18.0"));
    }

    #[test]
    fn test_cycle_url_encodes_segments() {
        let client = EndOfLifeClient::new(&EndOfLifeConfig {
            base_url: "https://endoflife.date/api".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();
        let url = client.cycle_url("my tech", &CycleVersion::parse("3.12").unwrap());
        assert_eq!(url.as_str(), "https://endoflife.date/api/my%20tech/3.12.json");
    }

    #[tokio::test]
    async fn test_not_found_is_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_cycle_details("nodejs", &CycleVersion::from(99))
            .await
            .unwrap_err();
        match err {
            IntegrationError::Gateway { technology, status } => {
                assert_eq!(technology, "nodejs");
                assert_eq!(status, 404);
            }
            other => panic!("expected gateway error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_data_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/python/3.12.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cycle": "3.12" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_cycle_details("python", &CycleVersion::parse("3.12").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::DataFormat { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_secs(5))
                    .set_body_json(serde_json::json!({ "eol": false })),
            )
            .mount(&server)
            .await;

        let client = EndOfLifeClient::new(&EndOfLifeConfig {
            base_url: server.uri(),
            timeout_seconds: 1,
        })
        .unwrap();
        let err = client
            .fetch_cycle_details("go", &CycleVersion::from(1))
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Transport { .. }));
    }
}
