use crate::core::polyline::Precision;
use crate::domain::model::{DirectionsRequest, DirectionsResponse, ResponseStatus, Route};
use crate::domain::ports::{ConfigProvider, DirectionsRepository};
use crate::utils::error::{AppError, DirectionsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// 依照 Mapbox Directions API 的回應格式
#[derive(Debug, Deserialize)]
struct DirectionsEnvelope {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    duration: f64,
    distance: f64,
    #[serde(default)]
    weight_name: String,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    geometry: Option<String>,
    #[serde(rename = "voiceLocale", default)]
    voice_locale: Option<String>,
}

impl TryFrom<RouteDto> for Route {
    type Error = DirectionsError;

    fn try_from(dto: RouteDto) -> std::result::Result<Self, Self::Error> {
        for (name, value) in [("duration", dto.duration), ("distance", dto.distance)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DirectionsError::malformed(format!(
                    "route {} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(Route {
            duration: dto.duration,
            distance: dto.distance,
            weight_name: dto.weight_name,
            weight: dto.weight,
            geometry: dto.geometry,
            voice_locale: dto.voice_locale,
        })
    }
}

/// Maps an HTTP status and body to a typed response.
pub fn parse_response(
    status: u16,
    body: &str,
) -> std::result::Result<DirectionsResponse, DirectionsError> {
    match status {
        200..=299 => {}
        400..=499 => {
            tracing::warn!("Directions API returned HTTP {}: {}", status, api_message(body));
            return Err(DirectionsError::ClientError(status));
        }
        500..=599 => {
            tracing::warn!("Directions API returned HTTP {}: {}", status, api_message(body));
            return Err(DirectionsError::ServerError(status));
        }
        other => {
            return Err(DirectionsError::malformed(format!(
                "unexpected HTTP status {}",
                other
            )))
        }
    }

    let envelope: DirectionsEnvelope = serde_json::from_str(body).map_err(|e| {
        tracing::error!("❌ Could not parse directions response: {}", e);
        DirectionsError::malformed(e.to_string())
    })?;

    let routes = envelope
        .routes
        .into_iter()
        .map(Route::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(DirectionsResponse {
        status: ResponseStatus::from_code(&envelope.code),
        message: envelope.message,
        routes,
    })
}

fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

fn geometries_param(precision: Precision) -> Option<&'static str> {
    match precision.digits() {
        5 => Some("polyline"),
        6 => Some("polyline6"),
        _ => None,
    }
}

/// Directions over HTTP against the Mapbox API (or anything serving the same
/// URL scheme and JSON).
pub struct MapboxDirections {
    client: Client,
    base_url: String,
    access_token: String,
    precision: Precision,
}

impl MapboxDirections {
    pub fn new(
        base_url: &str,
        access_token: &str,
        timeout: Duration,
        precision: Precision,
    ) -> Result<Self> {
        if geometries_param(precision).is_none() {
            return Err(AppError::InvalidConfigValueError {
                field: "geometries".to_string(),
                value: precision.digits().to_string(),
                reason: "Only polyline (5) and polyline6 (6) are served".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigValidationError {
                field: "http_client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            precision,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let token = config
            .access_token()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::MissingConfigError {
                field: "access_token".to_string(),
            })?;
        Self::new(config.base_url(), token, config.timeout(), config.precision())
    }

    pub fn build_url(
        &self,
        request: &DirectionsRequest,
    ) -> std::result::Result<Url, DirectionsError> {
        let raw = format!(
            "{}/{}/{}",
            self.base_url,
            request.profile(),
            request.coordinates_path()
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| DirectionsError::invalid_request(format!("bad URL '{}': {}", raw, e)))?;

        url.query_pairs_mut()
            .append_pair("geometries", geometries_param(self.precision).unwrap_or("polyline"))
            .append_pair("overview", "full")
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }
}

/// URL safe to log: the token is masked.
fn redacted(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[async_trait]
impl DirectionsRepository for MapboxDirections {
    async fn fetch(
        &self,
        request: &DirectionsRequest,
    ) -> std::result::Result<DirectionsResponse, DirectionsError> {
        let url = self.build_url(request)?;
        tracing::debug!("Making directions request to: {}", redacted(&url));

        let response = self.client.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.without_url().to_string()
            };
            tracing::warn!("Directions request failed: {}", message);
            DirectionsError::transport(message)
        })?;

        let status = response.status().as_u16();
        tracing::debug!("Directions response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| DirectionsError::transport(e.without_url().to_string()))?;

        parse_response(status, &body)
    }

    fn precision(&self) -> Precision {
        self.precision
    }
}
