//! HTTP Transport
//!
//! The client only needs `GET` with the raw status and body, so transports
//! stay small: `reqwest` natively, `gloo-net` in the browser, canned
//! responses in tests.

use async_trait::async_trait;

use super::error::ApiError;

/// Raw response handed back to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Asynchronous `GET`
#[async_trait(?Send)]
pub trait Transport {
    /// Fetch `url`. Only failures to obtain a response are errors.
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use reqwest::Client;
    use std::time::Duration;

    /// `reqwest`-backed transport for native builds
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration) -> Result<Self, ApiError> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;
            Ok(Self { client })
        }
    }

    #[async_trait(?Send)]
    impl Transport for ReqwestTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
            let response = self.client.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Network(format!("Request to {} timed out", url))
                } else if e.is_connect() {
                    ApiError::Network(format!("Could not connect to {}", url))
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::Network(format!("Failed to read body: {}", e)))?;

            Ok(HttpResponse { status, body })
        }
    }
}
