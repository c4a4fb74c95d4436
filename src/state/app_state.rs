// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::models::{AlertMessage, Customer};
use crate::services::indexeddb::{DbEvent, IndexedDbService};
use crate::state::ReactiveState;
use crate::stores::{AlertsStoreService, CustomerStoreService, SampleStoreService, StoreService};

/// Línea de estado bajo los formularios
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub idb: IndexedDbService,

    // Servicios por panel: existen solo mientras el panel está abierto
    pub alerts: Rc<RefCell<Option<Rc<AlertsStoreService>>>>,
    pub customers: Rc<RefCell<Option<Rc<CustomerStoreService>>>>,
    pub sample: Rc<SampleStoreService>,

    // Alerts
    pub messages: Rc<RefCell<Vec<AlertMessage>>>,
    pub message_input: Rc<RefCell<String>>,

    // Customers
    pub customer_list: Rc<RefCell<Vec<Customer>>>,
    pub customer_count: Rc<RefCell<u32>>,
    pub customer_search: Rc<RefCell<String>>,

    // Administración de bases de datos
    pub drop_name: Rc<RefCell<String>>,
    pub status: Rc<RefCell<Option<StatusLine>>>,
    pub busy: Rc<RefCell<bool>>,

    // Registro de eventos de diagnóstico
    pub events: ReactiveState<Vec<DbEvent>>,

    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new() -> Self {
        let idb = IndexedDbService::new();
        Self {
            sample: Rc::new(SampleStoreService::new(&idb)),
            idb,
            alerts: Rc::new(RefCell::new(None)),
            customers: Rc::new(RefCell::new(None)),
            messages: Rc::new(RefCell::new(Vec::new())),
            message_input: Rc::new(RefCell::new(String::new())),
            customer_list: Rc::new(RefCell::new(Vec::new())),
            customer_count: Rc::new(RefCell::new(0)),
            customer_search: Rc::new(RefCell::new(String::new())),
            drop_name: Rc::new(RefCell::new(String::new())),
            status: Rc::new(RefCell::new(None)),
            busy: Rc::new(RefCell::new(false)),
            events: ReactiveState::new(Vec::new()),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn alerts_open(&self) -> bool {
        self.alerts.borrow().is_some()
    }

    pub fn customers_open(&self) -> bool {
        self.customers.borrow().is_some()
    }

    pub fn alerts_service(&self) -> Option<Rc<AlertsStoreService>> {
        self.alerts.borrow().clone()
    }

    pub fn customers_service(&self) -> Option<Rc<CustomerStoreService>> {
        self.customers.borrow().clone()
    }

    /// Abrir/cerrar el panel Alerts. Abrir crea el servicio; cerrar lo termina.
    pub fn set_alerts_open(&self, open: bool) {
        if open {
            self.alerts
                .borrow_mut()
                .get_or_insert_with(|| Rc::new(AlertsStoreService::new(&self.idb)));
        } else {
            let Some(service) = self.alerts.borrow_mut().take() else {
                return;
            };
            service.finished();
            self.messages.borrow_mut().clear();
        }
        self.notify_subscribers();
    }

    pub fn set_customers_open(&self, open: bool) {
        if open {
            self.customers
                .borrow_mut()
                .get_or_insert_with(|| Rc::new(CustomerStoreService::new(&self.idb)));
        } else {
            let Some(service) = self.customers.borrow_mut().take() else {
                return;
            };
            service.finished();
            self.customer_list.borrow_mut().clear();
            *self.customer_count.borrow_mut() = 0;
        }
        self.notify_subscribers();
    }

    pub fn set_status(&self, status: Option<StatusLine>) {
        *self.status.borrow_mut() = status;
        self.notify_subscribers();
    }

    pub fn set_busy(&self, busy: bool) {
        *self.busy.borrow_mut() = busy;
        self.notify_subscribers();
    }

    /// Añadir al registro; se descartan los más antiguos por encima del límite
    pub fn push_event(&self, event: DbEvent) {
        let limit = CONFIG.event_log_limit;
        self.events.update(|log| push_capped(log, event, limit));
    }

    pub fn clear_events(&self) {
        self.events.set(Vec::new());
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        let subscribers: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn push_capped<T>(log: &mut Vec<T>, item: T, limit: usize) {
    log.push(item);
    if log.len() > limit {
        let excess = log.len() - limit;
        log.drain(..excess);
    }
}
