// ============================================================================
// STORES - Servicios por funcionalidad sobre una base IndexedDB propia
// ============================================================================

pub mod connection;
pub mod alert_store;
pub mod customer_store;
pub mod sample_store;

pub use connection::DatabaseConnection;
pub use alert_store::AlertsStoreService;
pub use customer_store::{CustomerStoreService, SeedSummary};
pub use sample_store::SampleStoreService;

/// Servicio dueño de una conexión: la cierra cuando su panel se destruye
pub trait StoreService {
    fn connection(&self) -> &DatabaseConnection;

    fn finished(&self) {
        log::info!("👋 [STORE] '{}' terminado, cerrando conexión", self.connection().name());
        self.connection().close();
    }
}
