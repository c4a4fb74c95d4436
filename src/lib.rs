// ============================================================================
// IDB STREAMS DEMO - IndexedDB como streams (Rust puro + WASM)
// ============================================================================
// - services::indexeddb: adaptador eventos nativos -> IdbStream + diagnóstico
// - stores: un servicio por base de datos (Alerts, Customers, SampleDb)
// - state / viewmodels / views: UI MVVM sobre el DOM
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

mod app;
mod dom;
mod state;
mod viewmodels;
mod views;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.enable_logging {
        wasm_logger::init(Config::new(CONFIG.log_level()));
    }
    log::info!("🚀 IndexedDB streams demo ({})", CONFIG.environment);

    // Sin #app (p.ej. bajo wasm-bindgen-test) no se monta la UI
    let Some(root) = dom::get_element_by_id("app") else {
        log::warn!("⚠️ [MAIN] No hay elemento #app, UI sin montar");
        return Ok(());
    };

    let app = App::new(root);
    app.render()?;
    log::info!(
        "✅ [MAIN] UI montada ({} evento(s) en el registro)",
        app.state().events.with(|events| events.len())
    );

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|cell| match cell.borrow().as_ref() {
        Some(app) => {
            if let Err(e) = app.render() {
                log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
            }
        }
        None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
    });
}
