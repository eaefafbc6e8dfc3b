//! # Economy Dashboard
//!
//! Client-side dashboard core for a game-server economy API. It resolves
//! browser paths to views, renders their markup into a single mount point,
//! wires live data after mount, and paginates player and transaction lists.
//!
//! ## Modules
//!
//! - [`router`]: Path patterns, route table, and the render/after-render lifecycle
//! - [`host`]: The environment the router drives (mount point, history, listeners)
//! - [`paging`]: Paginated list controller with client- and server-paged strategies
//! - [`api`]: Typed client for the economy REST API over a pluggable transport
//! - [`views`]: Dashboard, players, and player-detail views
//! - [`flow`]: Hourly money-flow aggregation for the player chart
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use econ_dashboard::*;
//! use std::rc::Rc;
//!
//! let config = Config::default();
//! let client = Rc::new(ApiClient::new(&config.api.base_url, MyTransport::new()));
//! let table = views::dashboard_routes(&config, client)?;
//! let router = Router::new(table, Rc::new(MyHost::new()));
//! router.start();
//! ```

pub mod api;
pub mod config;
pub mod flow;
pub mod host;
pub mod logging;
pub mod paging;
pub mod router;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{
    ApiClient, ApiError, ApiResult, HttpResponse, Player, PlayerSummary, Stats, Transaction,
    TransactionType, Transport,
};

#[cfg(not(target_arch = "wasm32"))]
pub use api::ReqwestTransport;

pub use config::{Config, ConfigError, LoggingConfig, PaginationConfig, PlayerViewConfig};

pub use flow::{money_flow_per_hour, DateRange, FlowPoint, FlowSeries};

pub use host::{EventHandler, EventKind, Host, LocalTask, NoticeLevel, UiEvent};

pub use paging::{Named, PageStrategy, PageTurn, PagedList};

pub use router::{
    PathPattern, RenderOutcome, Resolved, RouteError, RouteParams, RouteTable, Router, View,
    ViewContext,
};
