//! Player Detail View
//!
//! Balances, hourly money flow, and a paginated transaction table for one
//! player. The route parameter may be a UUID or a name; transactions are
//! always fetched by the UUID the backend resolved.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::markup;
use crate::api::{ApiClient, ApiError, Player, Transaction, Transport};
use crate::flow::{money_flow_per_hour, DateRange};
use crate::host::{EventKind, Host};
use crate::paging::{PageStrategy, PageTurn, PagedList};
use crate::router::{RouteParams, View, ViewContext};

const CONTENT: &str = "playerContent";
const CURRENCY_SELECT: &str = "currencySelect";
const RANGE_SELECT: &str = "rangeSelect";
const CHART: &str = "moneyChart";
const TABLE: &str = "transactionsTable";
const PAGE_PREV: &str = "pagePrev";
const PAGE_NEXT: &str = "pageNext";
const PAGE_LABEL: &str = "pageLabel";

pub struct PlayerView<T> {
    client: Rc<ApiClient<T>>,
    page_size: usize,
    day_ranges: Vec<u32>,
}

impl<T> PlayerView<T> {
    pub fn new(client: Rc<ApiClient<T>>, page_size: usize, day_ranges: Vec<u32>) -> Self {
        Self {
            client,
            page_size,
            day_ranges,
        }
    }
}

/// Balance currencies in order, then any currency only seen in transactions
pub fn currencies(player: &Player, transactions: &[Transaction]) -> Vec<String> {
    let mut out: Vec<String> = player.balances.keys().cloned().collect();
    for tx in transactions {
        if !out.iter().any(|c| c == &tx.currency) {
            out.push(tx.currency.clone());
        }
    }
    out
}

fn detail_markup(player: &Player, currencies: &[String], selected: Option<&str>, day_ranges: &[u32]) -> String {
    let name = player.display_name();

    let currency_options = markup::options(
        currencies.iter().map(|c| (c.as_str(), c.as_str())),
        selected,
    );

    let range_select = if day_ranges.is_empty() {
        String::new()
    } else {
        let mut ranges = vec![DateRange::All];
        ranges.extend(day_ranges.iter().map(|d| DateRange::LastDays(*d)));
        let entries: Vec<(String, String)> = ranges.iter().map(|r| (r.key(), r.label())).collect();
        format!(
            r#"<select id="{RANGE_SELECT}" class="bg-gray-700 text-white px-4 py-2 rounded">{}</select>"#,
            markup::options(
                entries.iter().map(|(k, l)| (k.as_str(), l.as_str())),
                Some("all")
            )
        )
    };

    format!(
        r#"<div class="flex flex-col gap-8">
  <div class="bg-gray-800 p-6 rounded-xl shadow-lg shadow-blue-500/30">
    <img src="{avatar}" class="mx-auto mb-4 rounded-lg"/>
    <h2 class="text-2xl font-bold text-center text-blue-300 mb-6">{name}</h2>
    <table class="w-full">
      <thead><tr class="border-b border-gray-600 text-blue-300"><th class="px-4 py-2 text-left">Currency</th><th class="px-4 py-2 text-right">Amount</th></tr></thead>
      <tbody>{balances}</tbody>
    </table>
  </div>
  <div class="bg-gray-800 p-6 rounded-xl shadow-lg">
    <div class="flex flex-col md:flex-row md:items-center md:justify-between mb-4 gap-4">
      <h3 class="text-xl font-semibold text-blue-300">Money flow per hour</h3>
      <div class="flex gap-2">
        <select id="{CURRENCY_SELECT}" class="bg-gray-700 text-white px-4 py-2 rounded">{currency_options}</select>
        {range_select}
      </div>
    </div>
    <canvas id="{CHART}" width="800" height="240" class="w-full"></canvas>
  </div>
  <div class="bg-gray-800 p-6 rounded-xl shadow-lg">
    <h3 class="text-xl font-semibold text-blue-300 mb-4">Transactions</h3>
    <div class="overflow-x-auto">
      <table class="w-full text-sm text-gray-300">
        <thead class="border-b border-gray-600 text-blue-300"><tr><th class="px-3 py-2 text-left">Date (UTC)</th><th class="px-3 py-2 text-center">Type</th><th class="px-3 py-2 text-left">Currency</th><th class="px-3 py-2 text-right">Amount</th></tr></thead>
        <tbody id="{TABLE}"></tbody>
      </table>
    </div>
    <div class="flex justify-center items-center gap-4 mt-4">
      <button id="{PAGE_PREV}" class="px-3 py-1 bg-gray-700 rounded disabled:opacity-50">&larr;</button>
      <span id="{PAGE_LABEL}">1 / 1</span>
      <button id="{PAGE_NEXT}" class="px-3 py-1 bg-gray-700 rounded disabled:opacity-50">&rarr;</button>
    </div>
  </div>
</div>"#,
        avatar = markup::attr(&markup::avatar_url(&name, 200)),
        name = markup::text(&name),
        balances = markup::balance_rows(player),
    )
}

/// State for one mounted player page
struct PlayerMount<H: Host + 'static> {
    ctx: ViewContext<H>,
    transactions: RefCell<PagedList<Transaction>>,
    currency: RefCell<Option<String>>,
    range: Cell<DateRange>,
    now: DateTime<Utc>,
}

impl<H: Host + 'static> PlayerMount<H> {
    /// Re-filter on currency and range, back to page 1
    fn refilter(&self) {
        let currency = self.currency.borrow().clone();
        let range = self.range.get();
        let now = self.now;
        self.transactions.borrow_mut().filter_with(move |tx: &Transaction| {
            currency.as_deref() == Some(tx.currency.as_str()) && range.contains(tx.timestamp, now)
        });
    }

    fn show_table(&self) {
        let list = self.transactions.borrow();
        let rows: String = list
            .current_slice()
            .into_iter()
            .map(markup::transaction_row)
            .collect();
        self.ctx.fill(TABLE, &rows);
        self.ctx.fill(
            PAGE_LABEL,
            &format!("{} / {}", list.current_page(), list.page_count()),
        );
        self.ctx.set_disabled(PAGE_PREV, !list.has_prev());
        self.ctx.set_disabled(PAGE_NEXT, !list.has_next());
    }

    fn show_chart(&self) {
        let Some(currency) = self.currency.borrow().clone() else {
            return;
        };
        let list = self.transactions.borrow();
        let series = money_flow_per_hour(list.filtered_items(), &currency);
        self.ctx.plot(CHART, &series);
    }

    fn refresh(&self) {
        self.refilter();
        self.show_table();
        self.show_chart();
    }

    fn turn(&self, turn: PageTurn) {
        if turn != PageTurn::Unchanged {
            self.show_table();
        }
    }
}

impl<T: Transport + 'static> PlayerView<T> {
    async fn load(&self, id: &str) -> Result<Option<(Player, Vec<Transaction>)>, ApiError> {
        let Some(player) = self.client.player(id).await? else {
            return Ok(None);
        };
        let transactions = self.client.transactions(&player.uuid.to_string()).await?;
        Ok(Some((player, transactions)))
    }
}

#[async_trait(?Send)]
impl<H: Host + 'static, T: Transport + 'static> View<H> for PlayerView<T> {
    fn name(&self) -> &'static str {
        "player"
    }

    async fn render(&self, _params: &RouteParams) -> String {
        format!(
            r#"{navbar}
<div class="mx-auto p-6 max-w-6xl">
  <div id="{CONTENT}" class="text-white">
    <span class="animate-pulse text-blue-400 font-semibold">Loading player...</span>
  </div>
</div>"#,
            navbar = markup::navbar(),
        )
    }

    async fn after_render(&self, params: &RouteParams, ctx: ViewContext<H>) {
        let raw = params.get("uuid").unwrap_or_default();
        let id = urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.to_string());

        let (player, transactions) = match self.load(&id).await {
            Ok(Some(loaded)) => loaded,
            Ok(None) => {
                tracing::info!(id = %id, "Player not found");
                ctx.fill(CONTENT, &markup::error_message("Player not found"));
                return;
            }
            Err(e) => {
                tracing::error!(id = %id, "Failed to load player: {}", e);
                ctx.fill(CONTENT, &markup::error_message("Error loading player data"));
                return;
            }
        };

        let currencies = currencies(&player, &transactions);
        let selected = player
            .balances
            .keys()
            .next()
            .or_else(|| currencies.first())
            .cloned();

        ctx.fill(
            CONTENT,
            &detail_markup(&player, &currencies, selected.as_deref(), &self.day_ranges),
        );

        let mut list = PagedList::new(PageStrategy::ClientPaged, self.page_size);
        list.set_full_list(transactions);

        let mount = Rc::new(PlayerMount {
            ctx: ctx.clone(),
            transactions: RefCell::new(list),
            currency: RefCell::new(selected.clone()),
            range: Cell::new(DateRange::All),
            now: Utc::now(),
        });

        if let Some(currency) = &selected {
            ctx.set_value(CURRENCY_SELECT, currency);
        }

        let on_currency = Rc::clone(&mount);
        ctx.listen(CURRENCY_SELECT, EventKind::Change, move |event| {
            *on_currency.currency.borrow_mut() = Some(event.value().to_string());
            on_currency.refresh();
        });

        if !self.day_ranges.is_empty() {
            let on_range = Rc::clone(&mount);
            ctx.listen(RANGE_SELECT, EventKind::Change, move |event| {
                on_range.range.set(DateRange::from_key(event.value()));
                on_range.refresh();
            });
        }

        let on_prev = Rc::clone(&mount);
        ctx.listen(PAGE_PREV, EventKind::Click, move |_| {
            let turn = on_prev.transactions.borrow_mut().prev_page();
            on_prev.turn(turn);
        });
        let on_next = Rc::clone(&mount);
        ctx.listen(PAGE_NEXT, EventKind::Click, move |_| {
            let turn = on_next.transactions.borrow_mut().next_page();
            on_next.turn(turn);
        });

        mount.refresh();
    }
}
