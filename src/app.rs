// ============================================================================
// APP - Aplicación principal
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use futures::StreamExt;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, set_inner_html};
use crate::state::AppState;
use crate::views::render_app;

pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    pub fn new(root: Element) -> Self {
        let state = AppState::new();

        // Canal de diagnóstico -> registro de eventos
        {
            let mut events = state.idb.events();
            let log_state = state.clone();
            spawn_local(async move {
                while let Some(event) = events.next().await {
                    log_state.push_event(event);
                }
                log::debug!("🛰️ [APP] Canal de eventos cerrado");
            });
        }

        // Varios cambios en el mismo tick = un solo render
        let scheduled = Rc::new(Cell::new(false));
        let schedule_render = move || {
            if scheduled.replace(true) {
                return;
            }
            let scheduled = scheduled.clone();
            Timeout::new(0, move || {
                scheduled.set(false);
                crate::rerender_app();
            })
            .forget();
        };
        state.subscribe_to_changes(schedule_render.clone());
        state.events.subscribe(schedule_render);

        Self { state, root }
    }

    pub fn render(&self) -> Result<(), JsValue> {
        set_inner_html(&self.root, "");
        let view = render_app(&self.state)?;
        append_child(&self.root, &view)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
