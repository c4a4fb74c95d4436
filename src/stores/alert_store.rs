// ============================================================================
// ALERTS STORE - Base "Alerts" con el store `messages`
// ============================================================================

use uuid::Uuid;
use wasm_bindgen::JsValue;

use crate::config::{DatabaseConfig, CONFIG};
use crate::models::AlertMessage;
use crate::services::indexeddb::{
    from_js_values, to_js_value, IdbError, IndexedDbService, SchemaDeclaration,
};
use crate::stores::{DatabaseConnection, StoreService};

pub const MESSAGES_STORE: &str = "messages";

pub struct AlertsStoreService {
    idb: IndexedDbService,
    connection: DatabaseConnection,
}

impl AlertsStoreService {
    pub fn new(idb: &IndexedDbService) -> Self {
        Self::with_database(idb, &CONFIG.alerts_db)
    }

    pub fn with_database(idb: &IndexedDbService, database: &DatabaseConfig) -> Self {
        log::info!("🔔 [ALERTS] Creando store sobre '{}'", database.name);
        Self {
            idb: idb.clone(),
            connection: DatabaseConnection::new(idb, database, Self::schema()),
        }
    }

    /// `messages` no tiene keyPath ni generador: la clave es un uuid
    pub fn schema() -> Vec<SchemaDeclaration> {
        vec![SchemaDeclaration::new(MESSAGES_STORE)]
    }

    /// Guardar un mensaje; devuelve su clave
    pub async fn add_message(&self, message: &AlertMessage) -> Result<String, IdbError> {
        let db = self.connection.get().await?;
        let key = Uuid::new_v4().to_string();
        let record = to_js_value(message)?;
        self.idb
            .insert_with_key(&db, MESSAGES_STORE, &record, &JsValue::from_str(&key))
            .last()
            .await?;
        log::info!("💬 [ALERTS] Mensaje guardado ({})", key);
        Ok(key)
    }

    /// Guardar varios mensajes en una sola transacción
    pub async fn add_messages(&self, messages: &[AlertMessage]) -> Result<Vec<String>, IdbError> {
        let db = self.connection.get().await?;
        let keys: Vec<String> = messages.iter().map(|_| Uuid::new_v4().to_string()).collect();
        let entries = messages
            .iter()
            .zip(&keys)
            .map(|(message, key)| Ok((to_js_value(message)?, JsValue::from_str(key))))
            .collect::<Result<Vec<_>, IdbError>>()?;
        self.idb
            .insert_many_with_keys(&db, MESSAGES_STORE, &entries)
            .collect_all()
            .await?;
        Ok(keys)
    }

    pub async fn list_messages(&self) -> Result<Vec<AlertMessage>, IdbError> {
        let db = self.connection.get().await?;
        let records = self.idb.list_all(&db, MESSAGES_STORE).collect_all().await?;
        let mut messages: Vec<AlertMessage> = from_js_values(&records)?;
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    pub async fn count_messages(&self) -> Result<u32, IdbError> {
        let db = self.connection.get().await?;
        self.idb.count(&db, MESSAGES_STORE).first().await
    }
}

impl StoreService for AlertsStoreService {
    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
