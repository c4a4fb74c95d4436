// ============================================================================
// SAMPLE STORE - "SampleDb" con los cuatro tipos de object store
// ============================================================================

use web_sys::IdbDatabase;

use crate::config::{DatabaseConfig, CONFIG};
use crate::services::indexeddb::{IdbError, IndexedDbService, KeyGenerator, SchemaDeclaration};
use crate::stores::{DatabaseConnection, StoreService};

pub struct SampleStoreService {
    idb: IndexedDbService,
    connection: DatabaseConnection,
}

impl SampleStoreService {
    pub fn new(idb: &IndexedDbService) -> Self {
        Self::with_database(idb, &CONFIG.sample_db)
    }

    pub fn with_database(idb: &IndexedDbService, database: &DatabaseConfig) -> Self {
        Self {
            idb: idb.clone(),
            connection: DatabaseConnection::new(idb, database, Self::schema()),
        }
    }

    pub fn schema() -> Vec<SchemaDeclaration> {
        vec![
            SchemaDeclaration::new("basicStore"),
            SchemaDeclaration::new("storeWithKey").key_path("id"),
            SchemaDeclaration::new("storeWithGenerator").key_generator(KeyGenerator::auto_increment()),
            SchemaDeclaration::new("advStoreWithKeyAndGenerator")
                .key_path("id")
                .key_generator(KeyGenerator::auto_increment()),
        ]
    }

    pub async fn open(&self) -> Result<IdbDatabase, IdbError> {
        self.connection.get().await
    }

    /// Abre la base (el upgrade crea el esquema) y devuelve los stores presentes
    pub async fn create(&self) -> Result<Vec<String>, IdbError> {
        let db = self.open().await?;
        let names = db.object_store_names();
        let stores: Vec<String> = (0..names.length()).filter_map(|i| names.item(i)).collect();
        log::info!("🧪 [SAMPLE] '{}' con stores: {:?}", db.name(), stores);
        Ok(stores)
    }

    /// Cerrar la conexión propia y borrar la base
    pub async fn destroy(&self) -> Result<bool, IdbError> {
        self.connection.close();
        let dropped = self.idb.drop_database(self.connection.name()).first().await;
        match &dropped {
            Ok(_) => log::info!("🗑️ [SAMPLE] Database dropped"),
            Err(e) => log::warn!("⚠️ [SAMPLE] Cannot drop database: {}", e),
        }
        dropped
    }

    pub fn close(&self) {
        self.connection.close();
    }
}

impl StoreService for SampleStoreService {
    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
