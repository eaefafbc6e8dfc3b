//! Economy API Client
//!
//! Typed access to the economy plugin's REST API.
//!
//! # Endpoints
//!
//! - `GET /api/stats` - Server-wide balance and online count
//! - `GET /api/players` - Every known player
//! - `GET /api/players?page=N` - One page of players
//! - `GET /api/player/:id` - Player account by UUID or name
//! - `GET /api/transactions/player/:id` - Transaction history by UUID
//!
//! # Example
//!
//! ```rust,ignore
//! use econ_dashboard::api::{ApiClient, ReqwestTransport};
//! use std::time::Duration;
//!
//! let transport = ReqwestTransport::new(Duration::from_secs(30))?;
//! let client = ApiClient::new("http://127.0.0.1:8080", transport);
//! let stats = client.stats().await?;
//! println!("{} online", stats.online);
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use models::{Player, PlayerSummary, Stats, Transaction, TransactionType};
pub use transport::{HttpResponse, Transport};

#[cfg(not(target_arch = "wasm32"))]
pub use transport::ReqwestTransport;
