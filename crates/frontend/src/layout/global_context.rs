use contracts::system::auth::CONSOLE_PATH;
use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

/// Page shown when the address bar names none
pub const DEFAULT_PAGE: &str = "d400_directory_summary";

/// Console pages: (key, menu label, icon)
pub const PAGES: [(&str, &str, &str); 4] = [
    ("d400_directory_summary", "Dashboard", "bar-chart"),
    ("a004_contact", "Contacts", "contact"),
    ("categories", "Categories", "database"),
    ("sys_users", "Users", "users"),
];

pub fn page_label(key: &str) -> &'static str {
    PAGES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, label, _)| *label)
        .unwrap_or("Dashboard")
}

/// Rewrite the address bar without reloading. No-op when it already shows
/// `url` (path plus query).
pub fn replace_url(url: &str) {
    let Some(w) = window() else {
        return;
    };
    let location = w.location();
    let current = format!(
        "{}{}",
        location.pathname().unwrap_or_default(),
        location.search().unwrap_or_default()
    );
    if current == url {
        return;
    }
    if let Ok(history) = w.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url));
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active: RwSignal<String>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(DEFAULT_PAGE.to_string()),
            left_open: RwSignal::new(true),
        }
    }

    /// Read `?active=` once, then keep the address bar on the console path
    /// with the active page
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(key) = params.get("active") {
            if PAGES.iter().any(|(k, _, _)| k == key) {
                self.open(key);
            }
        }

        let this = *self;
        Effect::new(move |_| {
            let key = this.active.get();
            let query_string =
                serde_qs::to_string(&HashMap::from([("active".to_string(), key)])).unwrap_or_default();
            replace_url(&format!("{}?{}", CONSOLE_PATH, query_string));
        });
    }

    pub fn open(&self, key: &str) {
        log::debug!("open page '{}'", key);
        self.active.set(key.to_string());
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
