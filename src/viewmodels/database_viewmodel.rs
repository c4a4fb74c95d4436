// ============================================================================
// DATABASE VIEWMODEL - Crear/borrar SampleDb y borrar bases por nombre
// ============================================================================

use wasm_bindgen_futures::spawn_local;

use crate::state::{AppState, StatusLine};

pub struct DatabaseViewModel {
    state: AppState,
}

impl DatabaseViewModel {
    pub fn new(state: &AppState) -> Self {
        Self { state: state.clone() }
    }

    pub fn create_sample(&self) {
        let state = self.state.clone();
        state.set_busy(true);
        spawn_local(async move {
            let result = state.sample.create().await;
            state.set_busy(false);
            match result {
                Ok(stores) => state.set_status(Some(StatusLine::info(format!(
                    "Base de ejemplo creada: {}",
                    stores.join(", ")
                )))),
                Err(e) => state.set_status(Some(StatusLine::error(e.to_string()))),
            }
        });
    }

    pub fn drop_sample(&self) {
        let state = self.state.clone();
        state.set_busy(true);
        spawn_local(async move {
            let result = state.sample.destroy().await;
            state.set_busy(false);
            match result {
                Ok(_) => state.set_status(Some(StatusLine::info("Base de ejemplo borrada"))),
                Err(e) => state.set_status(Some(StatusLine::error(e.to_string()))),
            }
        });
    }

    pub fn set_drop_name(&self, name: &str) {
        *self.state.drop_name.borrow_mut() = name.to_string();
    }

    /// Borrar cualquier base por nombre; si hay conexiones abiertas queda bloqueado
    pub fn drop_by_name(&self) {
        let name = self.state.drop_name.borrow().trim().to_string();
        if name.is_empty() {
            self.state
                .set_status(Some(StatusLine::error("Indica el nombre de la base de datos")));
            return;
        }
        let state = self.state.clone();
        state.set_busy(true);
        spawn_local(async move {
            let result = state.idb.drop_database(&name).first().await;
            state.set_busy(false);
            match result {
                Ok(_) => {
                    state.drop_name.borrow_mut().clear();
                    state.set_status(Some(StatusLine::info(format!("'{}' borrada", name))));
                }
                Err(e) => {
                    log::warn!("⚠️ [DB-VM] No se pudo borrar '{}': {}", name, e);
                    state.set_status(Some(StatusLine::error(e.to_string())));
                }
            }
        });
    }

    pub fn clear_events(&self) {
        self.state.clear_events();
    }
}
