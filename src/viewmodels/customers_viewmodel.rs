// ============================================================================
// CUSTOMERS VIEWMODEL - Panel de clientes
// ============================================================================

use chrono::Utc;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::state::{AppState, StatusLine};

pub struct CustomersViewModel {
    state: AppState,
}

impl CustomersViewModel {
    pub fn new(state: &AppState) -> Self {
        Self { state: state.clone() }
    }

    pub fn toggle(&self) {
        let open = !self.state.customers_open();
        log::info!("👥 [CUSTOMERS-VM] Panel {}", if open { "abierto" } else { "cerrado" });
        self.state.set_customers_open(open);
        if open {
            self.reload();
        }
    }

    pub fn set_search(&self, text: &str) {
        *self.state.customer_search.borrow_mut() = text.to_string();
    }

    /// Insertar un lote de clientes de ejemplo (con pedidos y envíos)
    pub fn seed(&self) {
        let Some(service) = self.state.customers_service() else {
            return;
        };
        let state = self.state.clone();
        state.set_busy(true);
        spawn_local(async move {
            let result = service
                .seed_sample_data(CONFIG.sample_batch_size as usize, Utc::now())
                .await;
            state.set_busy(false);
            match result {
                Ok(summary) => {
                    state.set_status(Some(StatusLine::info(format!(
                        "{} clientes, {} pedidos, {} envíos añadidos",
                        summary.customers, summary.orders, summary.shipments
                    ))));
                    Self::new(&state).reload();
                }
                Err(e) => {
                    log::error!("❌ [CUSTOMERS-VM] Error generando datos: {}", e);
                    state.set_status(Some(StatusLine::error(e.to_string())));
                }
            }
        });
    }

    /// Lista completa + contador
    pub fn reload(&self) {
        let Some(service) = self.state.customers_service() else {
            return;
        };
        let state = self.state.clone();
        spawn_local(async move {
            let listed = service.list_customers().await;
            let counted = service.count_customers().await;
            match (listed, counted) {
                (Ok(customers), Ok(count)) => {
                    *state.customer_list.borrow_mut() = customers;
                    *state.customer_count.borrow_mut() = count;
                    state.notify_subscribers();
                }
                (Err(e), _) | (_, Err(e)) => {
                    log::error!("❌ [CUSTOMERS-VM] Error cargando clientes: {}", e);
                    state.set_status(Some(StatusLine::error(e.to_string())));
                }
            }
        });
    }

    /// Búsqueda exacta por nombre; texto vacío = lista completa
    pub fn search(&self) {
        let name = self.state.customer_search.borrow().trim().to_string();
        if name.is_empty() {
            self.reload();
            return;
        }
        let Some(service) = self.state.customers_service() else {
            return;
        };
        let state = self.state.clone();
        spawn_local(async move {
            match service.find_customers_by_name(&name).await {
                Ok(mut customers) => {
                    crate::utils::sort_by_key_value(&mut customers, |c| serde_json::json!(c.id));
                    log::info!("🔍 [CUSTOMERS-VM] '{}': {} resultado(s)", name, customers.len());
                    *state.customer_list.borrow_mut() = customers;
                    state.notify_subscribers();
                }
                Err(e) => {
                    log::error!("❌ [CUSTOMERS-VM] Error buscando '{}': {}", name, e);
                    state.set_status(Some(StatusLine::error(e.to_string())));
                }
            }
        });
    }
}
