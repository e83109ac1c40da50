use crate::domain::model::Coordinates;
use crate::domain::ports::CoordinateResolver;
use crate::utils::error::{EstimateError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GeoApiEnvelope {
    response: GeoApiResponse,
}

#[derive(Debug, Deserialize)]
struct GeoApiResponse {
    #[serde(default)]
    location: Vec<GeoApiLocation>,
    error: Option<String>,
}

/// x = 經度, y = 緯度 (字串)
#[derive(Debug, Deserialize)]
struct GeoApiLocation {
    x: String,
    y: String,
}

/// 透過 HTTP 查詢郵遞區號對應的座標 (HeartRails Geo API 格式)
pub struct HttpPostalCodeResolver {
    client: Client,
    endpoint: String,
}

impl HttpPostalCodeResolver {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn unavailable(message: impl ToString) -> EstimateError {
        EstimateError::LookupUnavailable {
            what: "postal code".to_string(),
            message: message.to_string(),
        }
    }
}

/// `330-0854` -> `3300854`；必須是 7 位數字
pub fn normalize_postal_code(raw: &str) -> Result<String> {
    let code: String = raw.trim().chars().filter(|c| *c != '-').collect();
    if code.len() != 7 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(EstimateError::invalid_input(
            "postal_code",
            raw,
            "postal code must be 7 digits",
        ));
    }
    Ok(code)
}

#[async_trait]
impl CoordinateResolver for HttpPostalCodeResolver {
    async fn resolve(&self, postal_code: &str) -> Result<Coordinates> {
        let code = normalize_postal_code(postal_code)?;

        tracing::debug!("Resolving postal code {} via {}", code, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("postal", code.as_str())])
            .send()
            .await
            .map_err(Self::unavailable)?;

        tracing::debug!("Postal API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(Self::unavailable(format!(
                "postal API returned {}",
                response.status()
            )));
        }

        let envelope: GeoApiEnvelope = response.json().await.map_err(Self::unavailable)?;

        if let Some(error) = envelope.response.error {
            tracing::warn!("Postal code {} not found: {}", code, error);
            return Err(EstimateError::not_found("postal code", &code));
        }

        let location = envelope
            .response
            .location
            .first()
            .ok_or_else(|| EstimateError::not_found("postal code", &code))?;

        let latitude: f64 = location
            .y
            .trim()
            .parse()
            .map_err(|_| Self::unavailable(format!("unparsable latitude '{}'", location.y)))?;
        let longitude: f64 = location
            .x
            .trim()
            .parse()
            .map_err(|_| Self::unavailable(format!("unparsable longitude '{}'", location.x)))?;

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}
