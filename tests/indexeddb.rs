//! Adaptador IndexedDB contra el navegador real:
//! `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use idb_streams_demo::services::indexeddb::{
    from_js_value, key_as_u32, to_js_value, DbEventKind, EventSource, IdbError, IndexOptions,
    IndexedDbService, KeyGenerator, SchemaDeclaration,
};
use serde_json::{json, Value};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::IdbDatabase;

wasm_bindgen_test_configure!(run_in_browser);

fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

fn schema() -> Vec<SchemaDeclaration> {
    vec![
        SchemaDeclaration::new("people")
            .key_path("id")
            .key_generator(KeyGenerator::auto_increment())
            .index("by_name", "name", IndexOptions::default()),
        SchemaDeclaration::new("notes"),
    ]
}

fn person(name: &str) -> JsValue {
    to_js_value(&json!({ "name": name })).unwrap()
}

async fn open(idb: &IndexedDbService, name: &str, version: u32) -> IdbDatabase {
    idb.open_database(name, version, &schema()).first().await.unwrap()
}

async fn cleanup(idb: &IndexedDbService, db: IdbDatabase) {
    let name = db.name();
    idb.close(&db);
    idb.drop_database(&name).first().await.unwrap();
}

#[wasm_bindgen_test]
async fn test_open_insert_list_count_and_drop() {
    let idb = IndexedDbService::new();
    let name = unique_name("adapter-basic");
    let db = open(&idb, &name, 1).await;
    assert_eq!(db.name(), name);
    assert_eq!(db.object_store_names().length(), 2);

    let first = idb.insert(&db, "people", &person("Ada")).last().await.unwrap();
    let second = idb.insert(&db, "people", &person("Grace")).last().await.unwrap();
    assert_eq!(key_as_u32(&first), Some(1));
    assert_eq!(key_as_u32(&second), Some(2));

    let records = idb.list_all(&db, "people").collect_all().await.unwrap();
    let names: Vec<String> = records
        .iter()
        .map(|record| from_js_value::<Value>(record).unwrap()["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Ada", "Grace"]);

    assert_eq!(idb.count(&db, "people").first().await.unwrap(), 2);

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_insert_many_emits_one_key_per_record_in_order() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-batch"), 1).await;

    let records = vec![person("a"), person("b"), person("c")];
    let keys = idb.insert_many(&db, "people", &records).collect_all().await.unwrap();
    let keys: Vec<Option<u32>> = keys.iter().map(key_as_u32).collect();
    assert_eq!(keys, vec![Some(1), Some(2), Some(3)]);

    // Lote vacío: completa sin valores
    let none = idb.insert_many(&db, "people", &[]).collect_all().await.unwrap();
    assert!(none.is_empty());

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_list_all_on_empty_store_completes_without_values() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-empty"), 1).await;

    assert!(idb.list_all(&db, "people").collect_all().await.unwrap().is_empty());
    assert_eq!(idb.count(&db, "people").first().await.unwrap(), 0);

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_search_by_index_matches_exact_key() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-index"), 1).await;

    let records = vec![person("Ana"), person("Luis"), person("Ana")];
    idb.insert_many(&db, "people", &records).collect_all().await.unwrap();

    let found = idb
        .search_by_index(&db, "people", "by_name", &JsValue::from_str("Ana"))
        .collect_all()
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    let none = idb
        .search_by_index(&db, "people", "by_name", &JsValue::from_str("ana"))
        .collect_all()
        .await
        .unwrap();
    assert!(none.is_empty());

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_out_of_line_keys_retrieve_update_remove() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-notes"), 1).await;
    let key = JsValue::from_str("note-1");

    idb.insert_with_key(&db, "notes", &to_js_value(&json!({ "text": "hola" })).unwrap(), &key)
        .last()
        .await
        .unwrap();

    let stored = idb.retrieve(&db, "notes", &key).first().await.unwrap().unwrap();
    assert_eq!(from_js_value::<Value>(&stored).unwrap()["text"], "hola");

    let written = idb
        .update(&db, "notes", &key, |_old| to_js_value(&json!({ "text": "adiós" })).unwrap())
        .last()
        .await
        .unwrap();
    assert_eq!(written.as_string().as_deref(), Some("note-1"));

    let stored = idb.retrieve(&db, "notes", &key).first().await.unwrap().unwrap();
    assert_eq!(from_js_value::<Value>(&stored).unwrap()["text"], "adiós");

    idb.remove(&db, "notes", &key).last().await.unwrap();
    assert!(idb.retrieve(&db, "notes", &key).first().await.unwrap().is_none());

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_duplicate_key_fails_with_native_constraint_error() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-dup"), 1).await;
    let key = JsValue::from_str("same");
    let record = to_js_value(&json!({ "text": "x" })).unwrap();

    idb.insert_with_key(&db, "notes", &record, &key).last().await.unwrap();
    let error = idb
        .insert_with_key(&db, "notes", &record, &key)
        .last()
        .await
        .unwrap_err();
    assert!(error.native().is_some());
    assert_eq!(error.name().as_deref(), Some("ConstraintError"));

    // El primer registro sigue ahí
    assert_eq!(idb.count(&db, "notes").first().await.unwrap(), 1);

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_batch_with_existing_key_rolls_back() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-batch-dup"), 1).await;
    let record = to_js_value(&json!({ "text": "x" })).unwrap();

    idb.insert_with_key(&db, "notes", &record, &JsValue::from_str("k2"))
        .last()
        .await
        .unwrap();

    let entries = vec![
        (record.clone(), JsValue::from_str("k1")),
        (record.clone(), JsValue::from_str("k2")),
        (record.clone(), JsValue::from_str("k3")),
    ];
    let error = idb
        .insert_many_with_keys(&db, "notes", &entries)
        .collect_all()
        .await
        .unwrap_err();
    assert_eq!(error.name().as_deref(), Some("ConstraintError"));

    // "k1" se deshace con el resto de la transacción
    assert_eq!(idb.count(&db, "notes").first().await.unwrap(), 1);
    assert!(idb
        .retrieve(&db, "notes", &JsValue::from_str("k1"))
        .first()
        .await
        .unwrap()
        .is_none());

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_last_key_reports_highest_key() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-last-key"), 1).await;
    assert!(idb.last_key(&db, "people").first().await.unwrap().is_none());

    let records = vec![person("a"), person("b"), person("c")];
    idb.insert_many(&db, "people", &records).collect_all().await.unwrap();
    idb.remove(&db, "people", &JsValue::from(1)).last().await.unwrap();

    let last = idb.last_key(&db, "people").first().await.unwrap();
    assert_eq!(last.as_ref().and_then(key_as_u32), Some(3));

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_missing_store_fails_before_any_request() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-nostore"), 1).await;

    let error = idb.count(&db, "nope").first().await.unwrap_err();
    assert_eq!(error.name().as_deref(), Some("NotFoundError"));

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_invalid_schema_is_rejected() {
    let idb = IndexedDbService::new();
    let schema = vec![SchemaDeclaration::new("a"), SchemaDeclaration::new("a")];
    let error = idb
        .open_database(&unique_name("adapter-bad-schema"), 1, &schema)
        .first()
        .await
        .unwrap_err();
    assert!(matches!(error, IdbError::Schema(_)));
}

#[wasm_bindgen_test]
async fn test_drop_while_open_is_blocked() {
    let idb = IndexedDbService::new();
    let name = unique_name("adapter-blocked");
    let db = open(&idb, &name, 1).await;

    let error = idb.drop_database(&name).first().await.unwrap_err();
    assert!(matches!(error, IdbError::Blocked { ref database } if *database == name));

    // Al cerrar, el borrado pendiente se completa
    idb.close(&db);
}

#[wasm_bindgen_test]
async fn test_version_upgrade_recreates_stores() {
    let idb = IndexedDbService::new();
    let name = unique_name("adapter-upgrade");

    let db = open(&idb, &name, 1).await;
    idb.insert(&db, "people", &person("Ada")).last().await.unwrap();
    idb.close(&db);

    let db = open(&idb, &name, 2).await;
    assert_eq!(db.version(), 2.0);
    assert_eq!(idb.count(&db, "people").first().await.unwrap(), 0);

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_failed_upgrade_keeps_old_version() {
    let idb = IndexedDbService::new();
    let name = unique_name("adapter-bad-upgrade");

    let db = open(&idb, &name, 1).await;
    idb.insert(&db, "people", &person("Ada")).last().await.unwrap();
    idb.close(&db);

    let broken = vec![SchemaDeclaration::new("people")
        .key_path("id")
        .index("broken", "a..b", IndexOptions::default())];
    let error = idb.open_database(&name, 2, &broken).first().await.unwrap_err();
    assert!(error.native().is_some());

    // La versión 1 sigue intacta: abrir con v1 no lanza upgrade
    let db = open(&idb, &name, 1).await;
    assert_eq!(db.version(), 1.0);
    assert_eq!(idb.count(&db, "people").first().await.unwrap(), 1);

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_versionchange_on_open_connection_is_published() {
    let idb = IndexedDbService::new();
    let name = unique_name("adapter-versionchange");
    let db = open(&idb, &name, 1).await;
    let mut events = idb.events();

    let error = idb.drop_database(&name).first().await.unwrap_err();
    assert!(matches!(error, IdbError::Blocked { .. }));

    let mut seen = Vec::new();
    while let Ok(Some(event)) = events.try_next() {
        seen.push((event.kind, event.source, event.database));
    }
    assert!(seen.contains(&(DbEventKind::VersionChange, EventSource::Database, name.clone())));

    idb.close(&db);
}

#[wasm_bindgen_test]
async fn test_events_side_channel_reports_native_events() {
    let idb = IndexedDbService::new();
    let mut events = idb.events();
    let name = unique_name("adapter-events");

    let db = open(&idb, &name, 1).await;
    idb.insert(&db, "people", &person("Ada")).last().await.unwrap();

    let mut seen = Vec::new();
    while let Ok(Some(event)) = events.try_next() {
        seen.push((event.kind, event.source));
    }
    assert!(seen.contains(&(DbEventKind::UpgradeNeeded, EventSource::OpenRequest)));
    assert!(seen.contains(&(DbEventKind::Success, EventSource::OpenRequest)));
    assert!(seen.contains(&(DbEventKind::Success, EventSource::Request)));
    assert!(seen.contains(&(DbEventKind::Complete, EventSource::Transaction)));

    cleanup(&idb, db).await;
}

#[wasm_bindgen_test]
async fn test_unsubscribe_stops_callbacks() {
    let idb = IndexedDbService::new();
    let db = open(&idb, &unique_name("adapter-unsub"), 1).await;
    let calls = Rc::new(Cell::new(0));

    let subscription = {
        let on_next = calls.clone();
        let on_complete = calls.clone();
        idb.count(&db, "people").subscribe(
            move |_| on_next.set(on_next.get() + 1),
            |_| {},
            move || on_complete.set(on_complete.get() + 1),
        )
    };
    subscription.unsubscribe();
    assert!(subscription.is_unsubscribed());

    TimeoutFuture::new(50).await;
    assert_eq!(calls.get(), 0);

    // Sin cancelar: valor + fin
    let delivered = Rc::new(Cell::new(0));
    {
        let on_next = delivered.clone();
        let on_complete = delivered.clone();
        idb.count(&db, "people").subscribe(
            move |_| on_next.set(on_next.get() + 1),
            |_| {},
            move || on_complete.set(on_complete.get() + 1),
        );
    }
    TimeoutFuture::new(50).await;
    assert_eq!(delivered.get(), 2);

    cleanup(&idb, db).await;
}
