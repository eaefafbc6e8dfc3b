//! Rendering Host
//!
//! Everything the router and views need from their environment. The browser
//! build implements this over the DOM; tests implement it over plain maps.
//!
//! Regions are addressed by element id. Markup handed to the host is already
//! escaped by the view that produced it.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::flow::FlowSeries;

/// A single-threaded task handed to [`Host::spawn`]
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Listener callback registered through [`Host::listen`]
pub type EventHandler = Rc<dyn Fn(UiEvent)>;

/// Events a view can subscribe to on a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    /// Value committed (select change).
    Change,
    /// Value edited (every keystroke).
    Input,
    /// Enter pressed inside a text input.
    Enter,
}

/// An event delivered to a listener, carrying the element value where one
/// exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click,
    Change(String),
    Input(String),
    Enter(String),
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click => EventKind::Click,
            UiEvent::Change(_) => EventKind::Change,
            UiEvent::Input(_) => EventKind::Input,
            UiEvent::Enter(_) => EventKind::Enter,
        }
    }

    /// Element value, empty for clicks
    pub fn value(&self) -> &str {
        match self {
            UiEvent::Click => "",
            UiEvent::Change(v) | UiEvent::Input(v) | UiEvent::Enter(v) => v,
        }
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// The environment a [`crate::Router`] drives
pub trait Host {
    /// Location path, including any query string
    fn current_path(&self) -> String;

    /// Push a history entry without reloading
    fn push_history(&self, path: &str);

    /// Replace the single mount point's contents
    fn replace_mount(&self, markup: &str);

    /// Replace a region's contents. Returns false if the region is missing.
    fn fill(&self, id: &str, markup: &str) -> bool;

    fn set_visible(&self, id: &str, visible: bool);

    fn set_disabled(&self, id: &str, disabled: bool);

    /// Set the value of an input or select
    fn set_value(&self, id: &str, value: &str);

    fn listen(&self, id: &str, kind: EventKind, handler: EventHandler);

    /// Drop every listener registered since the last commit
    fn clear_listeners(&self);

    /// Draw a money-flow series on a chart region
    fn plot(&self, id: &str, series: &FlowSeries);

    fn notify(&self, message: &str, level: NoticeLevel);

    /// Run a task on the local executor
    fn spawn(&self, task: LocalTask);
}
