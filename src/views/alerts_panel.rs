// ============================================================================
// ALERTS PANEL - Input + lista de mensajes
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, on_enter, on_input, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::AlertsViewModel;

pub fn render_alerts_panel(state: &AppState) -> Result<Element, JsValue> {
    let panel = ElementBuilder::new("section")?
        .class("panel alerts-panel")
        .id("alerts-panel")?
        .build();
    let title = ElementBuilder::new("h2")?.text("Alerts").build();
    append_child(&panel, &title)?;

    let vm = Rc::new(AlertsViewModel::new(state));

    let form = ElementBuilder::new("div")?.class("form-row").build();
    let input = ElementBuilder::new("input")?
        .attr("type", "text")?
        .attr("placeholder", "Nuevo mensaje")?
        .value(&state.message_input.borrow())
        .build();
    {
        let vm = vm.clone();
        on_input(&input, move |text| vm.set_input(&text))?;
    }
    {
        let vm = vm.clone();
        on_enter(&input, move || vm.add_message())?;
    }
    append_child(&form, &input)?;

    let add_btn = ElementBuilder::new("button")?.class("btn-primary").text("Add").build();
    {
        let vm = vm.clone();
        on_click(&add_btn, move |_| vm.add_message())?;
    }
    append_child(&form, &add_btn)?;
    append_child(&panel, &form)?;

    let messages = state.messages.borrow();
    if messages.is_empty() {
        let empty = ElementBuilder::new("p")?.class("empty").text("Sin mensajes").build();
        append_child(&panel, &empty)?;
    } else {
        let list = ElementBuilder::new("ul")?.class("message-list").build();
        for message in messages.iter() {
            let item = ElementBuilder::new("li")?.text(&message.msg).build();
            append_child(&list, &item)?;
        }
        append_child(&panel, &list)?;
    }

    Ok(panel)
}
