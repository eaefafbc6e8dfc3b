//! Client-Side Router
//!
//! Resolves the location to a view, commits the view's markup to the host's
//! single mount point, then runs the view's post-mount hook.
//!
//! # Lifecycle
//!
//! 1. `render(path)` bumps the navigation generation and resolves the path.
//! 2. The view's `render` future runs to completion.
//! 3. If a newer navigation started meanwhile, the markup is discarded.
//! 4. Otherwise listeners from the previous page are cleared, the markup is
//!    committed, and `after_render` runs with a context for this generation.

pub mod error;
pub mod pattern;
pub mod table;
pub mod view;

pub use error::RouteError;
pub use pattern::{PathPattern, RouteParams};
pub use table::{Resolved, RouteTable};
pub use view::{View, ViewContext};

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::host::Host;

/// Outcome of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Markup committed and `after_render` ran.
    Committed,
    /// A newer navigation started before `render` finished.
    Superseded,
}

/// Router over a table of shared views
pub struct Router<H: Host + 'static> {
    table: RouteTable<Rc<dyn View<H>>>,
    host: Rc<H>,
    generation: Rc<Cell<u64>>,
    this: Weak<Router<H>>,
}

impl<H: Host + 'static> Router<H> {
    pub fn new(table: RouteTable<Rc<dyn View<H>>>, host: Rc<H>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            table,
            host,
            generation: Rc::new(Cell::new(0)),
            this: this.clone(),
        })
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Current navigation generation
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Render the host's current location (initial load)
    pub fn start(&self) {
        let path = self.host.current_path();
        self.spawn_render(path);
    }

    /// Push `path` onto history and render it
    pub fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigating");
        self.host.push_history(path);
        self.spawn_render(path.to_string());
    }

    /// Re-render after a history traversal (back/forward)
    pub fn reload(&self) {
        self.start();
    }

    fn spawn_render(&self, path: String) {
        if let Some(router) = self.this.upgrade() {
            self.host.spawn(Box::pin(async move {
                router.render(&path).await;
            }));
        }
    }

    /// Resolve and render `path` into the mount point
    pub async fn render(&self, path: &str) -> RenderOutcome {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let resolved = self.table.resolve(path);
        let view = Rc::clone(resolved.entry);
        let params = resolved.params;

        let markup = view.render(&params).await;

        if self.generation.get() != generation {
            tracing::debug!(
                path,
                view = view.name(),
                generation,
                "Discarding superseded render"
            );
            return RenderOutcome::Superseded;
        }

        self.host.clear_listeners();
        self.host.replace_mount(&markup);
        tracing::info!(path, view = view.name(), "View mounted");

        let ctx = ViewContext::new(
            Rc::clone(&self.host),
            generation,
            Rc::clone(&self.generation),
            self.this.clone(),
        );
        view.after_render(&params, ctx).await;

        RenderOutcome::Committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EventKind, UiEvent};
    use crate::testing::{Gate, RecordingHost};
    use async_trait::async_trait;
    use std::cell::RefCell;

    struct Static {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    #[async_trait(?Send)]
    impl View<RecordingHost> for Static {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn render(&self, params: &RouteParams) -> String {
            self.log.borrow_mut().push(format!("render {}", self.name));
            let id = params.get("uuid").unwrap_or("-");
            format!("<div id=\"page\">{} {}</div>", self.name, id)
        }

        async fn after_render(&self, _params: &RouteParams, ctx: ViewContext<RecordingHost>) {
            let mounted = ctx.host.mount();
            self.log
                .borrow_mut()
                .push(format!("after {} saw {}", self.name, mounted));
        }
    }

    /// Waits on a gate before returning its markup
    struct Slow {
        gate: Gate,
    }

    #[async_trait(?Send)]
    impl View<RecordingHost> for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn render(&self, _params: &RouteParams) -> String {
            self.gate.wait().await;
            "<div>slow</div>".to_string()
        }

        async fn after_render(&self, _params: &RouteParams, ctx: ViewContext<RecordingHost>) {
            ctx.fill("page", "slow hook ran");
        }
    }

    fn router_with(
        views: Vec<(&str, Rc<dyn View<RecordingHost>>)>,
        fallback: Rc<dyn View<RecordingHost>>,
    ) -> Rc<Router<RecordingHost>> {
        let mut table = RouteTable::new(fallback);
        for (pattern, view) in views {
            table = table.route(pattern, view).unwrap();
        }
        Router::new(table, Rc::new(RecordingHost::new("/")))
    }

    #[tokio::test]
    async fn test_after_render_sees_committed_markup() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let player: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "player", log: log.clone() });
        let home: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "home", log: log.clone() });
        let router = router_with(vec![("/player/:uuid", player)], home);

        let outcome = router.render("/player/abc-123").await;
        assert_eq!(outcome, RenderOutcome::Committed);
        assert_eq!(
            *log.borrow(),
            vec![
                "render player".to_string(),
                "after player saw <div id=\"page\">player abc-123</div>".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_unmatched_path_renders_fallback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let home: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "home", log: log.clone() });
        let router = router_with(vec![], home);

        router.render("/nowhere/at/all").await;
        assert_eq!(router.host().mount(), "<div id=\"page\">home -</div>");
    }

    #[tokio::test]
    async fn test_superseded_render_never_commits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let gate = Gate::new();
        let slow: Rc<dyn View<RecordingHost>> = Rc::new(Slow { gate: gate.clone() });
        let home: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "home", log: log.clone() });
        let router = router_with(vec![("/slow", slow)], home);

        let (first, second) = tokio::join!(router.render("/slow"), async {
            let outcome = router.render("/").await;
            gate.open();
            outcome
        });

        assert_eq!(first, RenderOutcome::Superseded);
        assert_eq!(second, RenderOutcome::Committed);
        assert_eq!(router.host().mount(), "<div id=\"page\">home -</div>");
        assert_eq!(router.host().region("page"), None);
    }

    #[tokio::test]
    async fn test_navigate_pushes_history_and_renders() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let players: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "players", log: log.clone() });
        let home: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "home", log: log.clone() });
        let router = router_with(vec![("/players", players)], home);

        router.navigate("/players");
        router.host().run_pending().await;

        assert_eq!(router.host().history(), vec!["/players".to_string()]);
        assert_eq!(router.host().mount(), "<div id=\"page\">players -</div>");
    }

    #[tokio::test]
    async fn test_commit_clears_previous_listeners() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let home: Rc<dyn View<RecordingHost>> = Rc::new(Static { name: "home", log: log.clone() });
        let router = router_with(vec![], home);
        router.render("/").await;

        let ctx = ViewContext::new(
            Rc::clone(router.host()),
            router.generation(),
            Rc::clone(&router.generation),
            Weak::new(),
        );
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        ctx.listen("btn", EventKind::Click, move |_| counter.set(counter.get() + 1));

        router.host().trigger("btn", UiEvent::Click);
        assert_eq!(clicks.get(), 1);
        assert_eq!(router.host().listener_count(), 1);

        router.render("/").await;
        assert_eq!(router.host().listener_count(), 0);
        router.host().trigger("btn", UiEvent::Click);
        assert_eq!(clicks.get(), 1);
        assert!(!ctx.is_current());
    }
}
