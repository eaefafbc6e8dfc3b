//! Dashboard Views
//!
//! The three client-side routes and the table that binds them:
//!
//! - `/` - [`DashboardView`]
//! - `/players` - [`PlayersView`]
//! - `/player/:uuid` - [`PlayerView`]
//!
//! Any other path renders the dashboard.

pub mod dashboard;
pub mod markup;
pub mod player;
pub mod players;

pub use dashboard::DashboardView;
pub use player::PlayerView;
pub use players::PlayersView;

use std::rc::Rc;

use crate::api::{ApiClient, Transport};
use crate::config::Config;
use crate::host::Host;
use crate::router::{RouteError, RouteTable, View};

/// Route patterns and the view names they map to, in match order
pub const ROUTES: [(&str, &str); 3] = [
    ("/", "dashboard"),
    ("/players", "players"),
    ("/player/:uuid", "player"),
];

/// View name used for unmatched paths
pub const FALLBACK: &str = "dashboard";

/// Route table of view names, for tooling that resolves paths without a host
pub fn route_names() -> Result<RouteTable<&'static str>, RouteError> {
    ROUTES
        .iter()
        .try_fold(RouteTable::new(FALLBACK), |table, (pattern, name)| {
            table.route(pattern, *name)
        })
}

/// Build the dashboard's route table over a shared API client
pub fn dashboard_routes<H, T>(
    config: &Config,
    client: Rc<ApiClient<T>>,
) -> Result<RouteTable<Rc<dyn View<H>>>, RouteError>
where
    H: Host + 'static,
    T: Transport + 'static,
{
    let dashboard: Rc<dyn View<H>> = Rc::new(DashboardView::new(Rc::clone(&client)));
    let players: Rc<dyn View<H>> = Rc::new(PlayersView::new(
        Rc::clone(&client),
        config.pagination.players,
        config.pagination.page_size,
    ));
    let player: Rc<dyn View<H>> = Rc::new(PlayerView::new(
        client,
        config.pagination.page_size,
        config.player.day_ranges.clone(),
    ));

    let mut table = RouteTable::new(Rc::clone(&dashboard));
    for (pattern, name) in ROUTES {
        let view = match name {
            "players" => Rc::clone(&players),
            "player" => Rc::clone(&player),
            _ => Rc::clone(&dashboard),
        };
        table = table.route(pattern, view)?;
    }
    Ok(table)
}
