//! `gloo-net` Transport

use async_trait::async_trait;
use gloo_net::http::Request;

use econ_dashboard::{ApiError, HttpResponse, Transport};

/// Fetch-backed transport; relative URLs resolve against the page origin
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
