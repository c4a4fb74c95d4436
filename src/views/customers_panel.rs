// ============================================================================
// CUSTOMERS PANEL - Datos de ejemplo, recarga, búsqueda por nombre
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, on_enter, on_input, ElementBuilder};
use crate::models::Customer;
use crate::state::AppState;
use crate::viewmodels::CustomersViewModel;

pub fn render_customers_panel(state: &AppState) -> Result<Element, JsValue> {
    let busy = *state.busy.borrow();
    let panel = ElementBuilder::new("section")?
        .class("panel customers-panel")
        .id("customers-panel")?
        .build();

    let count = *state.customer_count.borrow();
    let title = ElementBuilder::new("h2")?
        .text(&format!("Customers ({})", count))
        .build();
    append_child(&panel, &title)?;

    let vm = Rc::new(CustomersViewModel::new(state));

    let toolbar = ElementBuilder::new("div")?.class("form-row").build();
    let seed_btn = ElementBuilder::new("button")?
        .class("btn-primary")
        .flag("disabled", busy)?
        .text("🌱 Datos de ejemplo")
        .build();
    {
        let vm = vm.clone();
        on_click(&seed_btn, move |_| vm.seed())?;
    }
    append_child(&toolbar, &seed_btn)?;

    let reload_btn = ElementBuilder::new("button")?.text("🔄 Recargar").build();
    {
        let vm = vm.clone();
        on_click(&reload_btn, move |_| vm.reload())?;
    }
    append_child(&toolbar, &reload_btn)?;
    append_child(&panel, &toolbar)?;

    let search_row = ElementBuilder::new("div")?.class("form-row").build();
    let search = ElementBuilder::new("input")?
        .attr("type", "search")?
        .attr("placeholder", "Nombre exacto")?
        .value(&state.customer_search.borrow())
        .build();
    {
        let vm = vm.clone();
        on_input(&search, move |text| vm.set_search(&text))?;
    }
    {
        let vm = vm.clone();
        on_enter(&search, move || vm.search())?;
    }
    append_child(&search_row, &search)?;
    let search_btn = ElementBuilder::new("button")?.text("🔍 Buscar").build();
    {
        let vm = vm.clone();
        on_click(&search_btn, move |_| vm.search())?;
    }
    append_child(&search_row, &search_btn)?;
    append_child(&panel, &search_row)?;

    append_child(&panel, &render_customer_table(&state.customer_list.borrow())?)?;
    Ok(panel)
}

fn render_customer_table(customers: &[Customer]) -> Result<Element, JsValue> {
    if customers.is_empty() {
        return Ok(ElementBuilder::new("p")?.class("empty").text("Sin clientes").build());
    }
    let table = ElementBuilder::new("table")?.class("customer-table").build();
    let head = ElementBuilder::new("tr")?.build();
    for label in ["#", "Nombre", "Dirección", "Teléfono"] {
        append_child(&head, &ElementBuilder::new("th")?.text(label).build())?;
    }
    append_child(&table, &head)?;

    for customer in customers {
        let row = ElementBuilder::new("tr")?.build();
        let id = customer.id.map(|id| id.to_string()).unwrap_or_default();
        for cell in [id.as_str(), customer.name.as_str(), customer.address.as_str(), customer.phone.as_str()] {
            append_child(&row, &ElementBuilder::new("td")?.text(cell).build())?;
        }
        append_child(&table, &row)?;
    }
    Ok(table)
}
