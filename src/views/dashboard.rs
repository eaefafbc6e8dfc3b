//! Dashboard View
//!
//! Server-wide totals from `/api/stats`.

use async_trait::async_trait;
use std::rc::Rc;

use super::markup::{self, format_money};
use crate::api::{ApiClient, Transport};
use crate::host::Host;
use crate::router::{RouteParams, View, ViewContext};

pub struct DashboardView<T> {
    client: Rc<ApiClient<T>>,
}

impl<T> DashboardView<T> {
    pub fn new(client: Rc<ApiClient<T>>) -> Self {
        Self { client }
    }
}

fn stat_card(id: &str, title: &str) -> String {
    format!(
        r#"<div class="bg-gray-800 p-6 rounded-xl shadow-lg shadow-blue-500/30">
  <h3 class="text-sm text-gray-400 uppercase">{title}</h3>
  <p id="{id}" class="text-3xl font-bold text-blue-300 mt-2">...</p>
</div>"#
    )
}

#[async_trait(?Send)]
impl<H: Host + 'static, T: Transport + 'static> View<H> for DashboardView<T> {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn render(&self, _params: &RouteParams) -> String {
        format!(
            r#"{navbar}
<div class="container mx-auto p-6">
  <h2 class="text-2xl font-bold text-white mb-6">Dashboard</h2>
  <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
{balance}
{online}
  </div>
</div>"#,
            navbar = markup::navbar(),
            balance = stat_card("balance", "Total balance"),
            online = stat_card("online", "Players online"),
        )
    }

    async fn after_render(&self, _params: &RouteParams, ctx: ViewContext<H>) {
        match self.client.stats().await {
            Ok(stats) => {
                ctx.fill("balance", &format_money(stats.balance));
                ctx.fill("online", &stats.online.to_string());
            }
            Err(e) => {
                tracing::warn!("Failed to load stats: {}", e);
                ctx.fill("balance", "Error");
                ctx.fill("online", "Error");
            }
        }
    }
}
