//! Servicios de store sobre bases temporales (nombre único por test)
#![cfg(target_arch = "wasm32")]

use chrono::{TimeZone, Utc};
use idb_streams_demo::config::DatabaseConfig;
use idb_streams_demo::models::{AlertMessage, CustomerCart};
use idb_streams_demo::services::indexeddb::{IdbError, IndexedDbService};
use idb_streams_demo::stores::{
    AlertsStoreService, CustomerStoreService, DatabaseConnection, SampleStoreService, SeedSummary,
    StoreService,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn temp_database(prefix: &str) -> DatabaseConfig {
    DatabaseConfig::new(&format!("{}-{}", prefix, uuid::Uuid::new_v4()), 1)
}

async fn drop_database(idb: &IndexedDbService, config: &DatabaseConfig) {
    idb.drop_database(&config.name).first().await.unwrap();
}

#[wasm_bindgen_test]
async fn test_alerts_add_list_count() {
    let idb = IndexedDbService::new();
    let config = temp_database("alerts");
    let alerts = AlertsStoreService::with_database(&idb, &config);

    let key = alerts.add_message(&AlertMessage::new("primero", 1)).await.unwrap();
    assert_eq!(key.len(), 36);

    let keys = alerts
        .add_messages(&[AlertMessage::new("tercero", 3), AlertMessage::new("segundo", 2)])
        .await
        .unwrap();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);

    let messages: Vec<String> = alerts
        .list_messages()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.msg)
        .collect();
    assert_eq!(messages, vec!["primero", "segundo", "tercero"]);
    assert_eq!(alerts.count_messages().await.unwrap(), 3);

    alerts.finished();
    assert!(!alerts.connection().is_open());
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_customers_seed_search_and_relations() {
    let idb = IndexedDbService::new();
    let config = temp_database("customers");
    let customers = CustomerStoreService::with_database(&idb, &config);
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let summary = customers.seed_sample_data(3, now).await.unwrap();
    assert_eq!(summary, SeedSummary { customers: 3, orders: 6, shipments: 6 });

    let listed = customers.list_customers().await.unwrap();
    let ids: Vec<Option<u32>> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(customers.count_customers().await.unwrap(), 3);

    let by_name = customers.find_customers_by_name(&listed[0].name).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, Some(1));

    let by_phone = customers.find_customer_by_phone(&listed[2].phone).await.unwrap();
    assert_eq!(by_phone.and_then(|c| c.id), Some(3));
    assert!(customers.find_customer_by_phone("000").await.unwrap().is_none());

    let orders = customers.orders_for_customer(2).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.customer_id == 2));
    let shipments = customers.shipments_for_customer(2).await.unwrap();
    assert_eq!(shipments.len(), 2);

    // Un segundo lote continúa la secuencia (teléfonos únicos)
    customers.seed_sample_data(2, now).await.unwrap();
    assert_eq!(customers.count_customers().await.unwrap(), 5);
    assert_eq!(customers.count_orders().await.unwrap(), 10);

    let cart_id = customers
        .add_cart(&CustomerCart {
            id: None,
            customer_id: 1,
            items: vec!["mouse".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(cart_id, 1);

    customers.finished();
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_customers_update_and_remove() {
    let idb = IndexedDbService::new();
    let config = temp_database("customers-edit");
    let customers = CustomerStoreService::with_database(&idb, &config);

    let id = customers
        .insert_customer(&idb_streams_demo::models::Customer::new("Ana", "1 Main St", "555-1"))
        .await
        .unwrap();
    customers.update_address(id, "2 Oak Ave").await.unwrap();
    let stored = customers.get_customer(id).await.unwrap().unwrap();
    assert_eq!(stored.address, "2 Oak Ave");

    customers.remove_customer(id).await.unwrap();
    assert!(customers.get_customer(id).await.unwrap().is_none());

    customers.finished();
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_seed_after_remove_keeps_phones_unique() {
    let idb = IndexedDbService::new();
    let config = temp_database("customers-reseed");
    let customers = CustomerStoreService::with_database(&idb, &config);
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    customers.seed_sample_data(5, now).await.unwrap();
    customers.remove_customer(1).await.unwrap();
    customers.seed_sample_data(2, now).await.unwrap();
    assert_eq!(customers.count_customers().await.unwrap(), 6);
    assert_eq!(customers.count_orders().await.unwrap(), 14);

    // Borrando el id más alto tampoco se repiten teléfonos
    customers.remove_customer(7).await.unwrap();
    let summary = customers.seed_sample_data(1, now).await.unwrap();
    assert_eq!(summary.customers, 1);
    assert_eq!(customers.count_customers().await.unwrap(), 6);
    assert_eq!(customers.count_orders().await.unwrap(), 16);

    customers.finished();
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_update_address_of_unknown_customer_fails() {
    let idb = IndexedDbService::new();
    let config = temp_database("customers-missing");
    let customers = CustomerStoreService::with_database(&idb, &config);

    let error = customers.update_address(99, "2 Oak Ave").await.unwrap_err();
    assert!(matches!(error, IdbError::NotFound { ref key, .. } if key == "99"));
    assert_eq!(customers.count_customers().await.unwrap(), 0);

    customers.finished();
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_unique_phone_index_rejects_duplicates() {
    let idb = IndexedDbService::new();
    let config = temp_database("customers-unique");
    let customers = CustomerStoreService::with_database(&idb, &config);
    let customer = idb_streams_demo::models::Customer::new("Ana", "1 Main St", "555-1");

    customers.insert_customer(&customer).await.unwrap();
    let error = customers.insert_customer(&customer).await.unwrap_err();
    assert_eq!(error.name().as_deref(), Some("ConstraintError"));

    customers.finished();
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_connection_is_lazy_and_reopens_after_close() {
    let idb = IndexedDbService::new();
    let config = temp_database("connection");
    let connection = DatabaseConnection::new(&idb, &config, SampleStoreService::schema());
    assert!(!connection.is_open());

    let (a, b) = futures::join!(connection.get(), connection.get());
    assert_eq!(a.unwrap().name(), b.unwrap().name());
    assert!(connection.is_open());

    connection.close();
    assert!(!connection.is_open());
    assert_eq!(connection.get().await.unwrap().version(), 1.0);

    connection.close();
    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_close_while_opening_yields_closed() {
    let idb = IndexedDbService::new();
    let config = temp_database("connection-race");
    let connection = DatabaseConnection::new(&idb, &config, Vec::new());

    let (opened, _) = futures::join!(connection.get(), async { connection.close() });
    assert!(matches!(opened, Err(IdbError::Closed { .. })));
    assert!(!connection.is_open());

    drop_database(&idb, &config).await;
}

#[wasm_bindgen_test]
async fn test_close_while_opening_releases_late_handle() {
    let idb = IndexedDbService::new();
    let config = temp_database("connection-late");
    let connection = DatabaseConnection::new(&idb, &config, Vec::new());

    {
        let pending = connection.get();
        futures::pin_mut!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());
    }
    connection.close();
    assert!(!connection.is_open());

    // Con el handle tardío abierto el borrado fallaría con Blocked
    assert!(idb.drop_database(&config.name).first().await.unwrap());
}

#[wasm_bindgen_test]
async fn test_sample_create_and_destroy() {
    let idb = IndexedDbService::new();
    let config = temp_database("sample");
    let sample = SampleStoreService::with_database(&idb, &config);

    let mut stores = sample.create().await.unwrap();
    stores.sort();
    assert_eq!(
        stores,
        vec!["advStoreWithKeyAndGenerator", "basicStore", "storeWithGenerator", "storeWithKey"]
    );
    assert!(sample.destroy().await.unwrap());
    assert!(!sample.connection().is_open());
}
