//! HTTP access to the ShipX API and the source traits the rest of the crate
//! is written against.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Status, TrackingNumber},
    protocol::{StatusesResponse, TrackingResponse},
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_API_URL: &str = "https://api-shipx-pl.easypack24.net/v1/";

#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_statuses(&self) -> Result<Vec<Status>, FetchError>;
}

#[async_trait]
pub trait TrackingSource: Send + Sync {
    async fn fetch_tracking(&self, number: &TrackingNumber)
        -> Result<TrackingResponse, FetchError>;
}

#[derive(Clone)]
pub struct ShipxTransport {
    http: Client,
    base_url: Url,
}

impl ShipxTransport {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut parsed = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("url cannot be used as a base".to_string()));
        }
        // Stored in directory form so logs show the same base the endpoints use.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        debug!(%url, "GET");
        self.http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
    }

    async fn decode_json<T: DeserializeOwned>(
        url: &Url,
        response: Response,
    ) -> Result<T, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl StatusSource for ShipxTransport {
    async fn fetch_statuses(&self) -> Result<Vec<Status>, FetchError> {
        // The service expects the trailing slash on this collection.
        let url = self.endpoint(&["statuses", ""]);
        let response = self.get(&url).await?;
        let body: StatusesResponse = Self::decode_json(&url, response).await?;
        Ok(body.items.into_iter().map(Status::from).collect())
    }
}

#[async_trait]
impl TrackingSource for ShipxTransport {
    async fn fetch_tracking(
        &self,
        number: &TrackingNumber,
    ) -> Result<TrackingResponse, FetchError> {
        let url = self.endpoint(&["tracking", number.as_str()]);
        let response = self.get(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                tracking_number: number.clone(),
            });
        }
        Self::decode_json(&url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let transport = ShipxTransport::new("http://localhost:8080/v1").expect("transport");
        assert_eq!(transport.base_url().as_str(), "http://localhost:8080/v1/");
    }

    #[test]
    fn endpoints_are_joined_under_base_path() {
        let transport = ShipxTransport::new(DEFAULT_API_URL).expect("transport");
        assert_eq!(
            transport.endpoint(&["statuses", ""]).as_str(),
            "https://api-shipx-pl.easypack24.net/v1/statuses/"
        );
        assert_eq!(
            transport.endpoint(&["tracking", "600012345678"]).as_str(),
            "https://api-shipx-pl.easypack24.net/v1/tracking/600012345678"
        );
    }

    #[test]
    fn tracking_number_is_escaped_as_one_segment() {
        let transport = ShipxTransport::new("http://localhost/v1/").expect("transport");
        assert_eq!(
            transport.endpoint(&["tracking", "a/b?c"]).as_str(),
            "http://localhost/v1/tracking/a%2Fb%3Fc"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            ShipxTransport::new("not a url"),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ShipxTransport::new("mailto:someone@example.com"),
            Err(FetchError::InvalidBaseUrl { .. })
        ));
    }
}
