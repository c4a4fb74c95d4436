// ============================================================================
// APP VIEW - Composición de la pantalla
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::state::AppState;
use crate::views::{
    render_alerts_panel, render_customers_panel, render_database_panel, render_event_log,
    render_header,
};

pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("app-container").build();

    append_child(&container, &render_header(state)?)?;

    let main = ElementBuilder::new("main")?.class("app-main").build();
    if state.alerts_open() {
        append_child(&main, &render_alerts_panel(state)?)?;
    }
    if state.customers_open() {
        append_child(&main, &render_customers_panel(state)?)?;
    }
    append_child(&main, &render_database_panel(state)?)?;
    append_child(&container, &main)?;

    append_child(&container, &render_event_log(state)?)?;
    Ok(container)
}
