//! Players View
//!
//! Player grid with prev/next buttons above and below, a name filter, and
//! lookup-by-name on Enter. Paging follows the configured [`PageStrategy`].

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::markup;
use crate::api::{ApiClient, ApiError, PlayerSummary, Transport};
use crate::host::{EventKind, Host, NoticeLevel, UiEvent};
use crate::paging::{PageStrategy, PageTurn, PagedList};
use crate::router::{RouteParams, View, ViewContext};

const PREV_BUTTONS: [&str; 2] = ["prevTop", "prevBottom"];
const NEXT_BUTTONS: [&str; 2] = ["nextTop", "nextBottom"];

pub struct PlayersView<T> {
    client: Rc<ApiClient<T>>,
    strategy: PageStrategy,
    page_size: usize,
}

impl<T> PlayersView<T> {
    pub fn new(client: Rc<ApiClient<T>>, strategy: PageStrategy, page_size: usize) -> Self {
        Self {
            client,
            strategy,
            page_size,
        }
    }
}

fn page_buttons(prev: &str, next: &str) -> String {
    format!(
        r#"<div class="flex justify-center mt-4 mb-4 gap-2">
    <button id="{prev}" class="px-4 py-2 bg-blue-600 text-white rounded-lg hover:bg-blue-700">Previous</button>
    <button id="{next}" class="px-4 py-2 bg-blue-600 text-white rounded-lg hover:bg-blue-700">Next</button>
  </div>"#
    )
}

/// State for one mounted players page
struct PlayersMount<H: Host + 'static, T> {
    ctx: ViewContext<H>,
    client: Rc<ApiClient<T>>,
    list: RefCell<PagedList<PlayerSummary>>,
    /// Number of the latest fetch; responses to older ones are dropped
    fetch_seq: Cell<u64>,
    /// Page whose items are loaded
    loaded_page: Cell<usize>,
}

impl<H: Host + 'static, T: Transport + 'static> PlayersMount<H, T> {
    fn next_seq(&self) -> u64 {
        let seq = self.fetch_seq.get() + 1;
        self.fetch_seq.set(seq);
        seq
    }

    async fn fetch(&self, page: usize, seq: u64) {
        self.ctx.fill("players", &markup::message("Loading..."));

        let strategy = self.list.borrow().strategy();
        let result = match strategy {
            PageStrategy::ServerPaged => {
                let page = u32::try_from(page).unwrap_or(u32::MAX);
                self.client.players(Some(page)).await
            }
            PageStrategy::ClientPaged => self.client.players(None).await,
        };

        if self.fetch_seq.get() != seq {
            tracing::debug!(page, "Dropping superseded players response");
            return;
        }

        match result {
            Ok(players) => {
                {
                    let mut list = self.list.borrow_mut();
                    match strategy {
                        PageStrategy::ServerPaged => list.load_page(players),
                        PageStrategy::ClientPaged => list.set_full_list(players),
                    }
                }
                self.loaded_page.set(page);
                self.show();
            }
            Err(e) => {
                let message = match e {
                    ApiError::InvalidData(e) => {
                        tracing::warn!("Players response was not a list: {}", e);
                        "Invalid data"
                    }
                    e => {
                        tracing::error!("Failed to load players: {}", e);
                        "Error loading players"
                    }
                };
                self.ctx.fill("players", &markup::message(message));
                self.roll_back();
            }
        }
    }

    /// Return to the page that is actually loaded after a failed turn
    fn roll_back(&self) {
        {
            let mut list = self.list.borrow_mut();
            if list.strategy() == PageStrategy::ServerPaged {
                list.go_to(self.loaded_page.get());
            }
        }
        self.show_buttons();
    }

    fn show(&self) {
        {
            let list = self.list.borrow();
            let page = list.current_slice();
            if page.is_empty() {
                self.ctx.fill("players", &markup::message("No players found"));
            } else {
                self.ctx.fill("players", &markup::player_cards(page));
            }
        }
        self.show_buttons();
    }

    fn show_buttons(&self) {
        let list = self.list.borrow();
        for id in PREV_BUTTONS {
            self.ctx.set_visible(id, list.has_prev());
        }
        for id in NEXT_BUTTONS {
            self.ctx.set_visible(id, list.has_next());
        }
    }

    fn apply(self: &Rc<Self>, turn: PageTurn) {
        match turn {
            PageTurn::Unchanged => {}
            PageTurn::Local => self.show(),
            PageTurn::Fetch(page) => {
                let seq = self.next_seq();
                let mount = Rc::clone(self);
                self.ctx.spawn(async move { mount.fetch(page, seq).await });
            }
        }
    }

    async fn lookup(&self, name: &str) {
        match self.client.player(name).await {
            Ok(Some(player)) => self.ctx.navigate(&format!("/player/{}", player.uuid)),
            Ok(None) => self.ctx.notify("Player not found", NoticeLevel::Error),
            Err(e) => {
                tracing::error!(name, "Player lookup failed: {}", e);
                self.ctx.notify("Error fetching player", NoticeLevel::Error);
            }
        }
    }
}

#[async_trait(?Send)]
impl<H: Host + 'static, T: Transport + 'static> View<H> for PlayersView<T> {
    fn name(&self) -> &'static str {
        "players"
    }

    async fn render(&self, _params: &RouteParams) -> String {
        format!(
            r#"{navbar}
<div class="players_container container mx-auto">
  {top}
  <div class="player_search mb-4 flex items-center gap-2 rounded-lg bg-gray-800 p-3">
    <input id="searchInput" type="text" placeholder="Search player and press Enter..." class="w-full bg-gray-900 text-white rounded-lg px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500"/>
  </div>
  <div id="players" class="grid gap-4">{loading}</div>
  {bottom}
</div>"#,
            navbar = markup::navbar(),
            top = page_buttons(PREV_BUTTONS[0], NEXT_BUTTONS[0]),
            bottom = page_buttons(PREV_BUTTONS[1], NEXT_BUTTONS[1]),
            loading = markup::message("Loading..."),
        )
    }

    async fn after_render(&self, _params: &RouteParams, ctx: ViewContext<H>) {
        let mount = Rc::new(PlayersMount {
            ctx: ctx.clone(),
            client: Rc::clone(&self.client),
            list: RefCell::new(PagedList::new(self.strategy, self.page_size)),
            fetch_seq: Cell::new(0),
            loaded_page: Cell::new(1),
        });

        for id in PREV_BUTTONS {
            let mount = Rc::clone(&mount);
            ctx.listen(id, EventKind::Click, move |_| {
                let turn = mount.list.borrow_mut().prev_page();
                mount.apply(turn);
            });
        }
        for id in NEXT_BUTTONS {
            let mount = Rc::clone(&mount);
            ctx.listen(id, EventKind::Click, move |_| {
                let turn = mount.list.borrow_mut().next_page();
                mount.apply(turn);
            });
        }

        let filter_mount = Rc::clone(&mount);
        ctx.listen("searchInput", EventKind::Input, move |event| {
            let turn = filter_mount.list.borrow_mut().filter(event.value().trim());
            filter_mount.apply(turn);
        });

        let lookup_mount = Rc::clone(&mount);
        ctx.listen("searchInput", EventKind::Enter, move |event: UiEvent| {
            let name = event.value().trim().to_string();
            if name.is_empty() {
                return;
            }
            let mount = Rc::clone(&lookup_mount);
            lookup_mount
                .ctx
                .spawn(async move { mount.lookup(&name).await });
        });

        let seq = mount.next_seq();
        mount.fetch(1, seq).await;
    }
}
