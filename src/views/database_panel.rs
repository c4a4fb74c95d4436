// ============================================================================
// DATABASE PANEL - SampleDb + borrar base por nombre + línea de estado
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{add_class, append_child, on_click, on_enter, on_input, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::DatabaseViewModel;

pub fn render_database_panel(state: &AppState) -> Result<Element, JsValue> {
    let busy = *state.busy.borrow();
    let vm = Rc::new(DatabaseViewModel::new(state));
    let panel = ElementBuilder::new("section")?.class("panel database-panel").build();

    let title = ElementBuilder::new("h2")?.text("Bases de datos").build();
    append_child(&panel, &title)?;

    // SampleDb
    let sample_row = ElementBuilder::new("div")?.class("form-row").build();
    let label = ElementBuilder::new("span")?
        .text(&CONFIG.sample_db.name)
        .build();
    append_child(&sample_row, &label)?;

    let create_btn = ElementBuilder::new("button")?
        .flag("disabled", busy)?
        .text("Crear")
        .build();
    {
        let vm = vm.clone();
        on_click(&create_btn, move |_| vm.create_sample())?;
    }
    append_child(&sample_row, &create_btn)?;

    let drop_btn = ElementBuilder::new("button")?
        .class("btn-danger")
        .flag("disabled", busy)?
        .text("Borrar")
        .build();
    {
        let vm = vm.clone();
        on_click(&drop_btn, move |_| vm.drop_sample())?;
    }
    append_child(&sample_row, &drop_btn)?;
    append_child(&panel, &sample_row)?;

    // Borrar por nombre
    let drop_row = ElementBuilder::new("div")?.class("form-row").build();
    let name_input = ElementBuilder::new("input")?
        .attr("type", "text")?
        .attr("placeholder", "Nombre de la base")?
        .value(&state.drop_name.borrow())
        .build();
    {
        let vm = vm.clone();
        on_input(&name_input, move |text| vm.set_drop_name(&text))?;
    }
    {
        let vm = vm.clone();
        on_enter(&name_input, move || vm.drop_by_name())?;
    }
    append_child(&drop_row, &name_input)?;

    let drop_by_name_btn = ElementBuilder::new("button")?
        .class("btn-danger")
        .flag("disabled", busy)?
        .text("Drop database")
        .build();
    {
        let vm = vm.clone();
        on_click(&drop_by_name_btn, move |_| vm.drop_by_name())?;
    }
    append_child(&drop_row, &drop_by_name_btn)?;
    append_child(&panel, &drop_row)?;

    if let Some(status) = state.status.borrow().as_ref() {
        let line = ElementBuilder::new("p")?.class("status-line").text(&status.text).build();
        if status.is_error {
            add_class(&line, "status-line--error")?;
        }
        append_child(&panel, &line)?;
    }

    Ok(panel)
}
