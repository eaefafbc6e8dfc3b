//! DOM Host
//!
//! Drives the page through `web-sys`: one mount element, regions looked up
//! by id, listeners kept alive until the next commit.

use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent,
};

use econ_dashboard::{
    EventHandler, EventKind, FlowSeries, Host, LocalTask, NoticeLevel, UiEvent,
};

use crate::chart;

const NOTICE_MILLIS: u32 = 4000;

struct Registered {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub struct DomHost {
    document: Document,
    mount_id: &'static str,
    notices_id: &'static str,
    listeners: RefCell<Vec<Registered>>,
}

impl DomHost {
    pub fn new(document: Document, mount_id: &'static str, notices_id: &'static str) -> Self {
        Self {
            document,
            mount_id,
            notices_id,
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            tracing::debug!(id, "Region not in document");
        }
        element
    }
}

fn element_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Click => "click",
        EventKind::Change => "change",
        EventKind::Input => "input",
        EventKind::Enter => "keydown",
    }
}

fn log_js_error(action: &str, err: JsValue) {
    tracing::warn!("{} failed: {:?}", action, err);
}

impl Host for DomHost {
    fn current_path(&self) -> String {
        let Some(window) = web_sys::window() else {
            return "/".to_string();
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_else(|_| "/".to_string());
        let search = location.search().unwrap_or_default();
        format!("{}{}", path, search)
    }

    fn push_history(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => {
                if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                    log_js_error("pushState", e);
                }
            }
            Err(e) => log_js_error("history", e),
        }
    }

    fn replace_mount(&self, markup: &str) {
        match self.element(self.mount_id) {
            Some(mount) => mount.set_inner_html(markup),
            None => tracing::error!(id = self.mount_id, "Mount point missing"),
        }
    }

    fn fill(&self, id: &str, markup: &str) -> bool {
        match self.element(id) {
            Some(element) => {
                element.set_inner_html(markup);
                true
            }
            None => false,
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        let Some(element) = self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let display = if visible { "inline-block" } else { "none" };
        if let Err(e) = element.style().set_property("display", display) {
            log_js_error("set display", e);
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        let Some(element) = self.element(id) else {
            return;
        };
        let result = if disabled {
            element.set_attribute("disabled", "")
        } else {
            element.remove_attribute("disabled")
        };
        if let Err(e) = result {
            log_js_error("toggle disabled", e);
        }
    }

    fn set_value(&self, id: &str, value: &str) {
        let Some(element) = self.element(id) else {
            return;
        };
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn listen(&self, id: &str, kind: EventKind, handler: EventHandler) {
        let Some(element) = self.element(id) else {
            return;
        };

        let source = element.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let ui_event = match kind {
                EventKind::Click => UiEvent::Click,
                EventKind::Change => UiEvent::Change(element_value(&source)),
                EventKind::Input => UiEvent::Input(element_value(&source)),
                EventKind::Enter => {
                    let is_enter = event
                        .dyn_ref::<KeyboardEvent>()
                        .is_some_and(|k| k.key() == "Enter");
                    if !is_enter {
                        return;
                    }
                    UiEvent::Enter(element_value(&source))
                }
            };
            handler(ui_event);
        });

        let target: EventTarget = element.into();
        let event = event_name(kind);
        if let Err(e) = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
            log_js_error("addEventListener", e);
            return;
        }
        self.listeners.borrow_mut().push(Registered {
            target,
            event,
            callback,
        });
    }

    fn clear_listeners(&self) {
        for registered in self.listeners.borrow_mut().drain(..) {
            let _ = registered.target.remove_event_listener_with_callback(
                registered.event,
                registered.callback.as_ref().unchecked_ref(),
            );
        }
    }

    fn plot(&self, id: &str, series: &FlowSeries) {
        match self.element(id).and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok()) {
            Some(canvas) => chart::draw_flow(&canvas, series),
            None => tracing::debug!(id, "No canvas to plot on"),
        }
    }

    fn notify(&self, message: &str, level: NoticeLevel) {
        let Some(container) = self.element(self.notices_id) else {
            return;
        };
        let Ok(notice) = self.document.create_element("div") else {
            return;
        };

        let (icon, bg_class) = match level {
            NoticeLevel::Info => ("ℹ", "bg-blue-600"),
            NoticeLevel::Error => ("✕", "bg-red-600"),
        };
        notice.set_class_name(&format!(
            "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg",
            bg_class
        ));
        notice.set_inner_html(&format!(
            "<span class=\"text-lg\">{}</span><span class=\"text-sm font-medium\">{}</span>",
            icon,
            econ_dashboard::views::markup::text(message)
        ));

        if let Err(e) = container.append_child(&notice) {
            log_js_error("append notice", e);
            return;
        }
        gloo_timers::callback::Timeout::new(NOTICE_MILLIS, move || notice.remove()).forget();
    }

    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
