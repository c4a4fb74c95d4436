// ============================================================================
// EVENT LOG VIEW - Eventos nativos observados por el adaptador
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{add_class, append_child, on_click, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::DatabaseViewModel;

pub fn render_event_log(state: &AppState) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("section")?
        .class("event-log")
        .id("event-log")?
        .build();

    let header = ElementBuilder::new("div")?.class("event-log-header").build();
    let count = state.events.with(|events| events.len());
    let title = ElementBuilder::new("h3")?
        .text(&format!("Eventos ({})", count))
        .build();
    append_child(&header, &title)?;

    let clear_btn = ElementBuilder::new("button")?.class("btn-small").text("Limpiar").build();
    {
        let vm = DatabaseViewModel::new(state);
        on_click(&clear_btn, move |_| vm.clear_events())?;
    }
    append_child(&header, &clear_btn)?;
    append_child(&section, &header)?;

    let list = ElementBuilder::new("ol")?.class("event-list").build();
    state.events.with(|events| -> Result<(), JsValue> {
        for event in events {
            let item = ElementBuilder::new("li")?.text(&event.to_string()).build();
            if event.kind.is_failure() {
                add_class(&item, "event--failure")?;
            }
            append_child(&list, &item)?;
        }
        Ok(())
    })?;
    append_child(&section, &list)?;

    Ok(section)
}
