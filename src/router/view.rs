//! View Lifecycle
//!
//! A view renders markup for a set of route parameters. Once that markup is
//! committed to the mount point, the router calls `after_render` with a
//! [`ViewContext`] for fetching data and wiring listeners.
//!
//! A context belongs to one navigation. When a newer navigation starts, every
//! call made through an older context is dropped, so a slow fetch can never
//! write into the page that replaced it.

use async_trait::async_trait;
use std::cell::Cell;
use std::future::Future;
use std::rc::{Rc, Weak};

use super::pattern::RouteParams;
use super::Router;
use crate::flow::FlowSeries;
use crate::host::{EventHandler, EventKind, Host, NoticeLevel, UiEvent};

/// A routable page
#[async_trait(?Send)]
pub trait View<H: Host + 'static> {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Markup for the mount point
    async fn render(&self, params: &RouteParams) -> String;

    /// Runs after the markup from [`View::render`] is in the mount point
    async fn after_render(&self, _params: &RouteParams, _ctx: ViewContext<H>) {}
}

/// Handle to the host scoped to one navigation
pub struct ViewContext<H: Host + 'static> {
    pub(super) host: Rc<H>,
    generation: u64,
    current: Rc<Cell<u64>>,
    router: Weak<Router<H>>,
}

impl<H: Host + 'static> Clone for ViewContext<H> {
    fn clone(&self) -> Self {
        Self {
            host: Rc::clone(&self.host),
            generation: self.generation,
            current: Rc::clone(&self.current),
            router: Weak::clone(&self.router),
        }
    }
}

impl<H: Host + 'static> ViewContext<H> {
    pub(crate) fn new(
        host: Rc<H>,
        generation: u64,
        current: Rc<Cell<u64>>,
        router: Weak<Router<H>>,
    ) -> Self {
        Self {
            host,
            generation,
            current,
            router,
        }
    }

    /// Navigation generation this context was issued for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a later navigation has started
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }

    /// Replace a region's contents. Returns false when stale or missing.
    pub fn fill(&self, id: &str, markup: &str) -> bool {
        self.is_current() && self.host.fill(id, markup)
    }

    pub fn set_visible(&self, id: &str, visible: bool) {
        if self.is_current() {
            self.host.set_visible(id, visible);
        }
    }

    pub fn set_disabled(&self, id: &str, disabled: bool) {
        if self.is_current() {
            self.host.set_disabled(id, disabled);
        }
    }

    pub fn set_value(&self, id: &str, value: &str) {
        if self.is_current() {
            self.host.set_value(id, value);
        }
    }

    /// Register a listener that stops firing once this context is stale
    pub fn listen(&self, id: &str, kind: EventKind, handler: impl Fn(UiEvent) + 'static) {
        if !self.is_current() {
            return;
        }
        let generation = self.generation;
        let current = Rc::clone(&self.current);
        let guarded: EventHandler = Rc::new(move |event| {
            if current.get() == generation {
                handler(event);
            }
        });
        self.host.listen(id, kind, guarded);
    }

    pub fn plot(&self, id: &str, series: &FlowSeries) {
        if self.is_current() {
            self.host.plot(id, series);
        }
    }

    pub fn notify(&self, message: &str, level: NoticeLevel) {
        if self.is_current() {
            self.host.notify(message, level);
        }
    }

    /// Run a task on the host executor if this context is still current
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if self.is_current() {
            self.host.spawn(Box::pin(task));
        }
    }

    /// Client-side navigation, ignored when stale
    pub fn navigate(&self, path: &str) {
        if !self.is_current() {
            return;
        }
        if let Some(router) = self.router.upgrade() {
            router.navigate(path);
        }
    }
}
