// ============================================================================
// HEADER VIEW - Título + toggles de paneles
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::{AlertsViewModel, CustomersViewModel};

pub fn render_header(state: &AppState) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("header")?.class("app-header").build();

    let title = ElementBuilder::new("h1")?.text("IndexedDB streams").build();
    append_child(&header, &title)?;

    let nav = ElementBuilder::new("nav")?.class("panel-toggles").build();

    let alerts_btn = toggle_button("🔔 Alerts", state.alerts_open())?;
    {
        let vm = AlertsViewModel::new(state);
        on_click(&alerts_btn, move |_| vm.toggle())?;
    }
    append_child(&nav, &alerts_btn)?;

    let customers_btn = toggle_button("👥 Customers", state.customers_open())?;
    {
        let vm = CustomersViewModel::new(state);
        on_click(&customers_btn, move |_| vm.toggle())?;
    }
    append_child(&nav, &customers_btn)?;

    append_child(&header, &nav)?;
    Ok(header)
}

fn toggle_button(label: &str, active: bool) -> Result<Element, JsValue> {
    let class = if active { "btn-toggle active" } else { "btn-toggle" };
    ElementBuilder::new("button")?
        .class(class)
        .attr("aria-pressed", if active { "true" } else { "false" })
        .map(|builder| builder.text(label).build())
}
