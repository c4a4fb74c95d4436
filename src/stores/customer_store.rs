// ============================================================================
// CUSTOMERS STORE - Base "Customers": clientes, pedidos, envíos y carritos
// ============================================================================

use chrono::{DateTime, Utc};
use wasm_bindgen::JsValue;

use crate::config::{DatabaseConfig, CONFIG};
use crate::models::{Customer, CustomerCart, CustomerOrder, CustomerShipment};
use crate::services::indexeddb::{
    from_js_value, from_js_values, key_as_u32, to_js_value, to_js_values, IdbError,
    IndexOptions, IndexedDbService, KeyGenerator, SchemaDeclaration,
};
use crate::stores::{DatabaseConnection, StoreService};
use crate::utils::order_by::sort_by_key_value;
use crate::utils::sample_data::{sample_customers, sample_orders, sample_shipment};

pub const CUSTOMERS_STORE: &str = "customers";
pub const ORDERS_STORE: &str = "customers-orders";
pub const SHIPMENTS_STORE: &str = "customers-shipments";
pub const CARTS_STORE: &str = "customers-carts";

pub const BY_NAME_INDEX: &str = "by_name";
pub const BY_PHONE_INDEX: &str = "by_phone";
pub const BY_CUSTOMER_INDEX: &str = "by_customer";

const ORDERS_PER_CUSTOMER: usize = 2;

/// Resultado de `seed_sample_data`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: usize,
    pub orders: usize,
    pub shipments: usize,
}

pub struct CustomerStoreService {
    idb: IndexedDbService,
    connection: DatabaseConnection,
}

impl CustomerStoreService {
    pub fn new(idb: &IndexedDbService) -> Self {
        Self::with_database(idb, &CONFIG.customers_db)
    }

    pub fn with_database(idb: &IndexedDbService, database: &DatabaseConfig) -> Self {
        log::info!("👥 [CUSTOMERS] Creando store sobre '{}'", database.name);
        Self {
            idb: idb.clone(),
            connection: DatabaseConnection::new(idb, database, Self::schema()),
        }
    }

    pub fn schema() -> Vec<SchemaDeclaration> {
        let by_customer = IndexOptions::default();
        vec![
            SchemaDeclaration::new(CUSTOMERS_STORE)
                .key_path("id")
                .key_generator(KeyGenerator::auto_increment())
                .index(BY_NAME_INDEX, "name", IndexOptions::default())
                .index(BY_PHONE_INDEX, "phone", IndexOptions { unique: true, multi_entry: false }),
            SchemaDeclaration::new(ORDERS_STORE)
                .key_path("id")
                .index(BY_CUSTOMER_INDEX, "customerId", by_customer),
            SchemaDeclaration::new(SHIPMENTS_STORE)
                .key_generator(KeyGenerator::auto_increment())
                .index(BY_CUSTOMER_INDEX, "customerId", by_customer),
            SchemaDeclaration::new(CARTS_STORE)
                .key_path("id")
                .key_generator(KeyGenerator::auto_increment()),
        ]
    }

    // ==========================================
    // CLIENTES
    // ==========================================

    /// Insertar cliente; devuelve el id generado
    pub async fn insert_customer(&self, customer: &Customer) -> Result<u32, IdbError> {
        let db = self.connection.get().await?;
        let key = self
            .idb
            .insert(&db, CUSTOMERS_STORE, &to_js_value(customer)?)
            .last()
            .await?;
        numeric_key(&key)
    }

    /// Inserción por lotes: una transacción, un id por cliente (en orden)
    pub async fn insert_customers(&self, customers: &[Customer]) -> Result<Vec<u32>, IdbError> {
        let db = self.connection.get().await?;
        let records = to_js_values(customers)?;
        let keys = self
            .idb
            .insert_many(&db, CUSTOMERS_STORE, &records)
            .collect_all()
            .await?;
        log::info!("📥 [CUSTOMERS] {} clientes insertados", keys.len());
        keys.iter().map(numeric_key).collect()
    }

    /// Todos los clientes, ordenados por id
    pub async fn list_customers(&self) -> Result<Vec<Customer>, IdbError> {
        let db = self.connection.get().await?;
        let records = self.idb.list_all(&db, CUSTOMERS_STORE).collect_all().await?;
        let mut customers: Vec<Customer> = from_js_values(&records)?;
        sort_by_key_value(&mut customers, |c| serde_json::json!(c.id));
        Ok(customers)
    }

    pub async fn count_customers(&self) -> Result<u32, IdbError> {
        let db = self.connection.get().await?;
        self.idb.count(&db, CUSTOMERS_STORE).first().await
    }

    /// Búsqueda exacta por nombre (índice `by_name`)
    pub async fn find_customers_by_name(&self, name: &str) -> Result<Vec<Customer>, IdbError> {
        let db = self.connection.get().await?;
        let records = self
            .idb
            .search_by_index(&db, CUSTOMERS_STORE, BY_NAME_INDEX, &JsValue::from_str(name))
            .collect_all()
            .await?;
        from_js_values(&records)
    }

    /// Búsqueda por teléfono (índice único `by_phone`)
    pub async fn find_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, IdbError> {
        let db = self.connection.get().await?;
        let records = self
            .idb
            .search_by_index(&db, CUSTOMERS_STORE, BY_PHONE_INDEX, &JsValue::from_str(phone))
            .collect_all()
            .await?;
        records.first().map(from_js_value::<Customer>).transpose()
    }

    pub async fn get_customer(&self, id: u32) -> Result<Option<Customer>, IdbError> {
        let db = self.connection.get().await?;
        let record = self
            .idb
            .retrieve(&db, CUSTOMERS_STORE, &JsValue::from(id))
            .first()
            .await?;
        record.as_ref().map(from_js_value::<Customer>).transpose()
    }

    /// Cambiar la dirección de un cliente (leer + escribir en una transacción).
    /// Un id desconocido falla con `IdbError::NotFound`.
    pub async fn update_address(&self, id: u32, address: &str) -> Result<(), IdbError> {
        if self.get_customer(id).await?.is_none() {
            return Err(IdbError::NotFound {
                store: CUSTOMERS_STORE.to_string(),
                key: id.to_string(),
            });
        }
        let db = self.connection.get().await?;
        let address = address.to_string();
        self.idb
            .update(&db, CUSTOMERS_STORE, &JsValue::from(id), move |record| {
                if !record.is_object() {
                    return record;
                }
                if let Err(e) = js_sys::Reflect::set(&record, &JsValue::from_str("address"), &JsValue::from_str(&address)) {
                    log::warn!("⚠️ [CUSTOMERS] No se pudo cambiar la dirección de {}: {:?}", id, e);
                }
                record
            })
            .last()
            .await?;
        log::info!("🏠 [CUSTOMERS] Dirección de {} actualizada", id);
        Ok(())
    }

    pub async fn remove_customer(&self, id: u32) -> Result<(), IdbError> {
        let db = self.connection.get().await?;
        self.idb
            .remove(&db, CUSTOMERS_STORE, &JsValue::from(id))
            .last()
            .await
    }

    // ==========================================
    // PEDIDOS / ENVÍOS / CARRITOS
    // ==========================================

    pub async fn insert_orders(&self, orders: &[CustomerOrder]) -> Result<Vec<u32>, IdbError> {
        let db = self.connection.get().await?;
        let records = to_js_values(orders)?;
        let keys = self.idb.insert_many(&db, ORDERS_STORE, &records).collect_all().await?;
        keys.iter().map(numeric_key).collect()
    }

    pub async fn orders_for_customer(&self, customer_id: u32) -> Result<Vec<CustomerOrder>, IdbError> {
        let db = self.connection.get().await?;
        let records = self
            .idb
            .search_by_index(&db, ORDERS_STORE, BY_CUSTOMER_INDEX, &JsValue::from(customer_id))
            .collect_all()
            .await?;
        from_js_values(&records)
    }

    pub async fn count_orders(&self) -> Result<u32, IdbError> {
        let db = self.connection.get().await?;
        self.idb.count(&db, ORDERS_STORE).first().await
    }

    pub async fn insert_shipments(&self, shipments: &[CustomerShipment]) -> Result<Vec<u32>, IdbError> {
        let db = self.connection.get().await?;
        let records = to_js_values(shipments)?;
        let keys = self.idb.insert_many(&db, SHIPMENTS_STORE, &records).collect_all().await?;
        keys.iter().map(numeric_key).collect()
    }

    pub async fn shipments_for_customer(&self, customer_id: u32) -> Result<Vec<CustomerShipment>, IdbError> {
        let db = self.connection.get().await?;
        let records = self
            .idb
            .search_by_index(&db, SHIPMENTS_STORE, BY_CUSTOMER_INDEX, &JsValue::from(customer_id))
            .collect_all()
            .await?;
        from_js_values(&records)
    }

    pub async fn add_cart(&self, cart: &CustomerCart) -> Result<u32, IdbError> {
        let db = self.connection.get().await?;
        let key = self
            .idb
            .insert(&db, CARTS_STORE, &to_js_value(cart)?)
            .last()
            .await?;
        numeric_key(&key)
    }

    /// Generar `count` clientes con sus pedidos y envíos.
    /// Los datos continúan desde el id más alto guardado (teléfonos únicos
    /// aunque se hayan borrado clientes).
    pub async fn seed_sample_data(&self, count: usize, now: DateTime<Utc>) -> Result<SeedSummary, IdbError> {
        let offset = self.highest_id(CUSTOMERS_STORE).await? as usize;
        let customer_ids = self.insert_customers(&sample_customers(offset, count)).await?;

        let mut next_order_id = self.highest_id(ORDERS_STORE).await? + 1;
        let mut orders = Vec::with_capacity(customer_ids.len() * ORDERS_PER_CUSTOMER);
        for customer_id in &customer_ids {
            orders.extend(sample_orders(*customer_id, next_order_id, ORDERS_PER_CUSTOMER, now));
            next_order_id += ORDERS_PER_CUSTOMER as u32;
        }
        self.insert_orders(&orders).await?;

        let shipments: Vec<CustomerShipment> = orders.iter().map(sample_shipment).collect();
        self.insert_shipments(&shipments).await?;

        let summary = SeedSummary {
            customers: customer_ids.len(),
            orders: orders.len(),
            shipments: shipments.len(),
        };
        log::info!("🌱 [CUSTOMERS] Datos de ejemplo: {:?}", summary);
        Ok(summary)
    }
}

impl CustomerStoreService {
    /// Id más alto del store (0 si está vacío)
    async fn highest_id(&self, store: &str) -> Result<u32, IdbError> {
        let db = self.connection.get().await?;
        match self.idb.last_key(&db, store).first().await? {
            Some(key) => numeric_key(&key),
            None => Ok(0),
        }
    }
}

impl StoreService for CustomerStoreService {
    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

fn numeric_key(key: &JsValue) -> Result<u32, IdbError> {
    key_as_u32(key).ok_or_else(|| IdbError::Serialization(format!("clave no numérica: {:?}", key)))
}
