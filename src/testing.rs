//! Test doubles shared by the unit tests: a host that records what views do
//! and a transport with canned responses.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::Notify;

use crate::api::{ApiError, HttpResponse, Transport};
use crate::flow::FlowSeries;
use crate::host::{EventHandler, EventKind, Host, LocalTask, NoticeLevel, UiEvent};

/// In-memory [`Host`]. Only ids present in the mounted or filled markup can
/// be filled; spawned tasks queue until [`RecordingHost::run_pending`].
pub struct RecordingHost {
    path: RefCell<String>,
    history: RefCell<Vec<String>>,
    mount: RefCell<String>,
    regions: RefCell<HashMap<String, String>>,
    visible: RefCell<HashMap<String, bool>>,
    disabled: RefCell<HashMap<String, bool>>,
    values: RefCell<HashMap<String, String>>,
    listeners: RefCell<HashMap<(String, EventKind), Vec<EventHandler>>>,
    plots: RefCell<Vec<(String, FlowSeries)>>,
    notices: RefCell<Vec<(String, NoticeLevel)>>,
    tasks: RefCell<VecDeque<LocalTask>>,
}

impl RecordingHost {
    pub fn new(path: &str) -> Self {
        Self {
            path: RefCell::new(path.to_string()),
            history: RefCell::default(),
            mount: RefCell::default(),
            regions: RefCell::default(),
            visible: RefCell::default(),
            disabled: RefCell::default(),
            values: RefCell::default(),
            listeners: RefCell::default(),
            plots: RefCell::default(),
            notices: RefCell::default(),
            tasks: RefCell::default(),
        }
    }

    pub fn mount(&self) -> String {
        self.mount.borrow().clone()
    }

    pub fn region(&self, id: &str) -> Option<String> {
        self.regions.borrow().get(id).cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.visible.borrow().get(id).copied()
    }

    pub fn is_disabled(&self, id: &str) -> Option<bool> {
        self.disabled.borrow().get(id).copied()
    }

    pub fn value(&self, id: &str) -> Option<String> {
        self.values.borrow().get(id).cloned()
    }

    pub fn plots(&self) -> Vec<(String, FlowSeries)> {
        self.plots.borrow().clone()
    }

    pub fn notices(&self) -> Vec<(String, NoticeLevel)> {
        self.notices.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    /// Deliver an event to every listener on `id` for its kind
    pub fn trigger(&self, id: &str, event: UiEvent) {
        let handlers = self
            .listeners
            .borrow()
            .get(&(id.to_string(), event.kind()))
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(event.clone());
        }
    }

    /// Hand the queued tasks to the caller, e.g. to interleave them
    pub fn take_pending(&self) -> Vec<LocalTask> {
        self.tasks.borrow_mut().drain(..).collect()
    }

    fn has_element(&self, id: &str) -> bool {
        let needle = format!("id=\"{}\"", id);
        self.mount.borrow().contains(&needle)
            || self.regions.borrow().values().any(|m| m.contains(&needle))
    }

    /// Run queued tasks, including any they spawn, until none remain
    pub async fn run_pending(&self) {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl Host for RecordingHost {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn push_history(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
        self.history.borrow_mut().push(path.to_string());
    }

    fn replace_mount(&self, markup: &str) {
        *self.mount.borrow_mut() = markup.to_string();
        self.regions.borrow_mut().clear();
        self.visible.borrow_mut().clear();
        self.disabled.borrow_mut().clear();
        self.values.borrow_mut().clear();
    }

    fn fill(&self, id: &str, markup: &str) -> bool {
        if !self.has_element(id) {
            return false;
        }
        self.regions
            .borrow_mut()
            .insert(id.to_string(), markup.to_string());
        true
    }

    fn set_visible(&self, id: &str, visible: bool) {
        self.visible.borrow_mut().insert(id.to_string(), visible);
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        self.disabled.borrow_mut().insert(id.to_string(), disabled);
    }

    fn set_value(&self, id: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(id.to_string(), value.to_string());
    }

    fn listen(&self, id: &str, kind: EventKind, handler: EventHandler) {
        self.listeners
            .borrow_mut()
            .entry((id.to_string(), kind))
            .or_default()
            .push(handler);
    }

    fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    fn plot(&self, id: &str, series: &FlowSeries) {
        self.plots
            .borrow_mut()
            .push((id.to_string(), series.clone()));
    }

    fn notify(&self, message: &str, level: NoticeLevel) {
        self.notices
            .borrow_mut()
            .push((message.to_string(), level));
    }

    fn spawn(&self, task: LocalTask) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Canned responses by URL. Unknown URLs fail as network errors. Clones
/// share the request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: HashMap<String, HttpResponse>,
    held: HashMap<String, Gate>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Keep requests for `url` waiting until `gate` opens
    pub fn hold(mut self, url: &str, gate: Gate) -> Self {
        self.held.insert(url.to_string(), gate);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(url.to_string());
        if let Some(gate) = self.held.get(url) {
            gate.wait().await;
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::Network(format!("connection refused: {}", url)))
    }
}

/// One-shot latch for holding a future at a chosen point
#[derive(Clone, Default)]
pub struct Gate {
    open: Rc<Cell<bool>>,
    notify: Rc<Notify>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.open.set(true);
        self.notify.notify_waiters();
    }

    pub async fn wait(&self) {
        while !self.open.get() {
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_needs_element() {
        let host = RecordingHost::new("/");
        host.replace_mount(r#"<div id="outer"></div>"#);

        assert!(!host.fill("inner", "x"));
        assert!(host.fill("outer", r#"<span id="inner"></span>"#));
        assert!(host.fill("inner", "x"));
        assert_eq!(host.region("inner").as_deref(), Some("x"));

        host.replace_mount("<div></div>");
        assert!(!host.fill("inner", "y"));
    }
}
