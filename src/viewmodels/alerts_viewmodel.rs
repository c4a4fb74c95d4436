// ============================================================================
// ALERTS VIEWMODEL - Panel de mensajes
// ============================================================================
// Lanza las operaciones del store con spawn_local y vuelca el resultado en
// AppState; las vistas solo leen el estado.
// ============================================================================

use wasm_bindgen_futures::spawn_local;

use crate::models::AlertMessage;
use crate::state::{AppState, StatusLine};

pub struct AlertsViewModel {
    state: AppState,
}

impl AlertsViewModel {
    pub fn new(state: &AppState) -> Self {
        Self { state: state.clone() }
    }

    /// Mostrar/ocultar el panel; al abrirlo se cargan los mensajes
    pub fn toggle(&self) {
        let open = !self.state.alerts_open();
        log::info!("🔔 [ALERTS-VM] Panel {}", if open { "abierto" } else { "cerrado" });
        self.state.set_alerts_open(open);
        if open {
            self.reload();
        }
    }

    /// Sin notificar: el input conserva el foco mientras se escribe
    pub fn set_input(&self, text: &str) {
        *self.state.message_input.borrow_mut() = text.to_string();
    }

    pub fn add_message(&self) {
        let Some(service) = self.state.alerts_service() else {
            return;
        };
        let text = self.state.message_input.borrow().clone();
        let message = AlertMessage::new(&text, js_sys::Date::now() as i64);
        if message.is_empty() {
            return;
        }
        self.state.message_input.borrow_mut().clear();

        let state = self.state.clone();
        spawn_local(async move {
            match service.add_message(&message).await {
                Ok(_) => Self::new(&state).reload(),
                Err(e) => {
                    log::error!("❌ [ALERTS-VM] No se pudo guardar el mensaje: {}", e);
                    state.set_status(Some(StatusLine::error(e.to_string())));
                }
            }
        });
    }

    pub fn reload(&self) {
        let Some(service) = self.state.alerts_service() else {
            return;
        };
        let state = self.state.clone();
        spawn_local(async move {
            match service.list_messages().await {
                Ok(messages) => {
                    log::debug!("📋 [ALERTS-VM] {} mensajes", messages.len());
                    *state.messages.borrow_mut() = messages;
                    state.notify_subscribers();
                }
                Err(e) => {
                    log::error!("❌ [ALERTS-VM] Error listando mensajes: {}", e);
                    state.set_status(Some(StatusLine::error(e.to_string())));
                }
            }
        });
    }
}
