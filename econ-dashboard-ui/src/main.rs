//! Economy Dashboard
//!
//! Browser frontend for the economy API, compiled to WebAssembly.
//!
//! # Features
//!
//! - Server-wide stats
//! - Paginated, searchable player list
//! - Player balances, hourly money flow chart, and transaction history
//!
//! # Architecture
//!
//! Routing, views, and pagination live in the `econ-dashboard` core crate.
//! This crate supplies the DOM host, the fetch transport, the canvas chart,
//! and console logging, then hands navigation events to the router.

use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, MouseEvent};

use econ_dashboard::{views, ApiClient, Config, Router};

mod chart;
mod host;
mod logging;
mod transport;

use host::DomHost;
use transport::GlooTransport;

/// Embedded configuration
const CONFIG: &str = include_str!("../dashboard.toml");

/// Local storage key overriding `api.base_url`
const API_URL_KEY: &str = "econ_dashboard_api_url";

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let mut config = match Config::from_toml_str(CONFIG) {
        Ok(config) => config,
        Err(e) => {
            web_sys::console::error_1(&format!("Bad embedded config: {}", e).into());
            Config::default()
        }
    };
    logging::init(&config.logging);

    if let Some(url) = stored_api_url() {
        tracing::info!(url = %url, "Using API URL from local storage");
        config.api.base_url = url;
    }

    if let Err(e) = start(&config) {
        tracing::error!("Dashboard failed to start: {:?}", e);
    }
}

/// API base URL saved in local storage, if any
fn stored_api_url() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let url = storage.get_item(API_URL_KEY).ok()??;
    let url = url.trim().trim_end_matches('/').to_string();
    (!url.is_empty()).then_some(url)
}

fn start(config: &Config) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let client = Rc::new(ApiClient::new(&config.api.base_url, GlooTransport));
    let table = views::dashboard_routes(config, client)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let router = Router::new(table, Rc::new(DomHost::new(document.clone(), "app", "notices")));

    // Client-side navigation for a[data-link]
    let links = Rc::clone(&router);
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            if mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key() || mouse.button() != 0 {
                return;
            }
        }
        let Some(anchor) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("a[data-link]").ok().flatten())
        else {
            return;
        };
        if let Some(href) = anchor.get_attribute("href") {
            event.prevent_default();
            links.navigate(&href);
        }
    });
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    // Back/forward
    let history = Rc::clone(&router);
    let on_popstate = Closure::<dyn FnMut(Event)>::new(move |_: Event| history.reload());
    window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())?;
    on_popstate.forget();

    router.start();
    Ok(())
}
