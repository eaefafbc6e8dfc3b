//! Economy API Client

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, ApiResult};
use super::models::{Player, PlayerSummary, Stats, Transaction};
use super::transport::Transport;

/// Client for the economy REST API
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// `base_url` is prefixed to every `/api/...` path. Empty means the
    /// transport resolves paths against the current origin.
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_value(&self, path: &str) -> ApiResult<Value> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                url,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn get_json<D: DeserializeOwned>(&self, path: &str) -> ApiResult<D> {
        let value = self.get_value(path).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn get_list<D: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<D>> {
        let value = self.get_value(path).await?;
        if !value.is_array() {
            return Err(ApiError::InvalidData(format!(
                "expected a list from {}",
                path
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// `GET /api/stats`
    pub async fn stats(&self) -> ApiResult<Stats> {
        self.get_json("/api/stats").await
    }

    /// `GET /api/players`, or one page of it
    pub async fn players(&self, page: Option<u32>) -> ApiResult<Vec<PlayerSummary>> {
        match page {
            Some(p) => self.get_list(&format!("/api/players?page={}", p)).await,
            None => self.get_list("/api/players").await,
        }
    }

    /// `GET /api/player/:id` by UUID or name. Unknown players are `Ok(None)`.
    pub async fn player(&self, id: &str) -> ApiResult<Option<Player>> {
        let path = format!("/api/player/{}", urlencoding::encode(id));
        match self.get_json::<Option<Player>>(&path).await {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    /// `GET /api/transactions/player/:id`
    pub async fn transactions(&self, id: &str) -> ApiResult<Vec<Transaction>> {
        let path = format!("/api/transactions/player/{}", urlencoding::encode(id));
        self.get_list(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::TransactionType;
    use crate::testing::MockTransport;

    const NOTCH: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";

    fn client(transport: MockTransport) -> ApiClient<MockTransport> {
        ApiClient::new("http://127.0.0.1:8080/", transport)
    }

    #[tokio::test]
    async fn test_stats() {
        let transport = MockTransport::new()
            .respond("http://127.0.0.1:8080/api/stats", 200, r#"{"balance":1500.25,"online":3}"#);
        let stats = client(transport).stats().await.unwrap();
        assert_eq!(stats, Stats { balance: 1500.25, online: 3 });
    }

    #[tokio::test]
    async fn test_players_page_query() {
        let body = format!(r#"[{{"playerUUID":"{}","playerName":"Notch"}}]"#, NOTCH);
        let transport = MockTransport::new().respond("http://127.0.0.1:8080/api/players?page=2", 200, &body);
        let players = client(transport).players(Some(2)).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name.as_deref(), Some("Notch"));
    }

    #[tokio::test]
    async fn test_players_non_list_is_invalid_data() {
        let transport = MockTransport::new().respond("http://127.0.0.1:8080/api/players", 200, r#"{"players":[]}"#);
        let err = client(transport).players(None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_player_not_found_is_none() {
        let transport = MockTransport::new().respond(
            "http://127.0.0.1:8080/api/player/unknown",
            404,
            r#"{"error":"Player not found"}"#,
        );
        assert_eq!(client(transport).player("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_player_null_body_is_none() {
        let transport = MockTransport::new().respond("http://127.0.0.1:8080/api/player/ghost", 200, "null");
        assert_eq!(client(transport).player("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_player_id_is_encoded() {
        let transport = MockTransport::new().respond("http://127.0.0.1:8080/api/player/Not%20ch", 404, "");
        let client = client(transport);
        client.player("Not ch").await.unwrap();
        assert_eq!(client.transport.requests(), vec!["http://127.0.0.1:8080/api/player/Not%20ch".to_string()]);
    }

    #[tokio::test]
    async fn test_server_error_is_status() {
        let transport = MockTransport::new().respond("http://127.0.0.1:8080/api/transactions/player/x", 400, "");
        let err = client(transport).transactions("x").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                url: "http://127.0.0.1:8080/api/transactions/player/x".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_is_network_error() {
        let err = client(MockTransport::new()).stats().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_transactions() {
        let transport = MockTransport::new().respond(
            &format!("http://127.0.0.1:8080/api/transactions/player/{}", NOTCH),
            200,
            r#"[{"timestamp":"2024-03-01T10:15:00Z","type":"WITHDRAW","currency":"coins","amount":4.5,"processed":true,"reason":"shop"}]"#,
        );
        let txs = client(transport).transactions(NOTCH).await.unwrap();
        assert_eq!(txs[0].kind, TransactionType::Withdraw);
        assert_eq!(txs[0].signed_amount(), Some(-4.5));
        assert_eq!(txs[0].reason.as_deref(), Some("shop"));
    }
}
