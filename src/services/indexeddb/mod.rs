// ============================================================================
// INDEXEDDB SERVICE - Adaptador eventos nativos -> IdbStream
// ============================================================================
// Cada operación emite la petición nativa y devuelve un `IdbStream`:
// - valores en los eventos `success`
// - fin en `complete` de la transacción (o cursor agotado)
// - error nativo reenviado tal cual en `error` / `abort` / `blocked`
// Además, cada evento observado se publica en el canal de diagnóstico.
// ============================================================================

pub mod codec;
pub mod error;
pub mod events;
pub mod schema;
pub mod stream;

pub use codec::{from_js_value, from_js_values, key_as_u32, to_js_value, to_js_values};
pub use error::IdbError;
pub use events::{DbEvent, DbEventKind, EventBus, EventSource, EventSubscription};
pub use schema::{validate_schema, IndexDeclaration, IndexOptions, KeyGenerator, SchemaDeclaration};
pub use stream::{IdbStream, Subscription};

use futures::channel::mpsc::UnboundedReceiver;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, IdbCursor, IdbCursorDirection, IdbCursorWithValue, IdbDatabase, IdbFactory, IdbKeyRange, IdbObjectStore, IdbRequest,
    IdbTransaction, IdbTransactionMode, IdbVersionChangeEvent,
};

use self::schema::apply_schema;
use self::stream::{channel, Emitter, ListenerGuard};

/// Servicio de IndexedDB: un bus de eventos compartido por todas las operaciones
#[derive(Clone, Default)]
pub struct IndexedDbService {
    events: EventBus,
}

impl IndexedDbService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream lateral con todos los eventos nativos observados
    pub fn events(&self) -> EventSubscription {
        self.events.subscribe()
    }

    fn factory() -> Result<IdbFactory, IdbError> {
        web_sys::window()
            .ok_or(IdbError::Unavailable)?
            .indexed_db()
            .map_err(IdbError::Native)?
            .ok_or(IdbError::Unavailable)
    }

    // ==========================================
    // BASES DE DATOS
    // ==========================================

    /// Abrir (y crear/actualizar esquema si la versión sube)
    pub fn open_database(
        &self,
        name: &str,
        version: u32,
        schema: &[SchemaDeclaration],
    ) -> IdbStream<IdbDatabase> {
        self.try_open_database(name, version, schema)
            .unwrap_or_else(IdbStream::failed)
    }

    fn try_open_database(
        &self,
        name: &str,
        version: u32,
        schema: &[SchemaDeclaration],
    ) -> Result<IdbStream<IdbDatabase>, IdbError> {
        validate_schema(schema).map_err(IdbError::Schema)?;
        log::info!("📂 [IDB] Abriendo '{}' v{}", name, version);

        let request = Self::factory()?
            .open_with_u32(name, version)
            .map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::database(&self.events, name));

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            let open_request = request.clone();
            let schema = schema.to_vec();
            op.listeners.listen(&request, "upgradeneeded", move |event: Event| {
                let (old_version, new_version) = event
                    .dyn_ref::<IdbVersionChangeEvent>()
                    .map(|e| (e.old_version(), e.new_version().unwrap_or_default()))
                    .unwrap_or_default();
                log::info!(
                    "⬆️ [IDB] Upgrade '{}' v{} -> v{}",
                    scope.database,
                    old_version,
                    new_version
                );
                scope.publish(
                    DbEventKind::UpgradeNeeded,
                    EventSource::OpenRequest,
                    format!("v{} -> v{}", old_version, new_version),
                );

                let applied = open_request
                    .result()
                    .and_then(|value| value.dyn_into::<IdbDatabase>())
                    .map_err(IdbError::Native)
                    .and_then(|db| apply_schema(&db, &schema));

                if let Err(error) = applied {
                    log::error!("❌ [IDB] Error aplicando esquema de '{}': {}", scope.database, error);
                    emitter.error(error);
                    // Igual que una excepción en onupgradeneeded: la versión no cambia
                    if let Some(tx) = open_request.transaction() {
                        let _ = tx.abort();
                    }
                }
            })?;
        }

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            let open_request = request.clone();
            op.listeners.listen(&request, "success", move |_event: Event| {
                scope.publish(DbEventKind::Success, EventSource::OpenRequest, "");
                let opened = open_request
                    .result()
                    .and_then(|value| value.dyn_into::<IdbDatabase>())
                    .map_err(IdbError::Native);
                match opened {
                    Ok(db) => {
                        watch_connection(&scope.bus, &db);
                        log::info!("✅ [IDB] '{}' abierta (v{})", db.name(), db.version());
                        if !emitter.next(db.clone()) {
                            // Nadie espera ya esta conexión (p.ej. tras `blocked`)
                            log::warn!("⚠️ [IDB] Conexión a '{}' sin suscriptor, cerrando", db.name());
                            db.close();
                        }
                        emitter.complete();
                    }
                    Err(error) => emitter.error(error),
                }
            })?;
        }

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            let open_request = request.clone();
            op.listeners.listen(&request, "error", move |event: Event| {
                let error = request_error(&open_request, event);
                log::error!("❌ [IDB] Error abriendo '{}': {}", scope.database, error);
                scope.publish(DbEventKind::Error, EventSource::OpenRequest, error.to_string());
                emitter.error(error);
            })?;
        }

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            op.listeners.listen(&request, "blocked", move |_event: Event| {
                log::warn!("⛔ [IDB] Apertura de '{}' bloqueada por otra conexión", scope.database);
                scope.publish(DbEventKind::Blocked, EventSource::OpenRequest, "");
                emitter.error(IdbError::Blocked {
                    database: scope.database.clone(),
                });
            })?;
        }

        Ok(op.finish())
    }

    /// Borrar una base de datos completa
    pub fn drop_database(&self, name: &str) -> IdbStream<bool> {
        self.try_drop_database(name).unwrap_or_else(IdbStream::failed)
    }

    fn try_drop_database(&self, name: &str) -> Result<IdbStream<bool>, IdbError> {
        log::info!("🗑️ [IDB] Borrando base de datos '{}'", name);
        let request = Self::factory()?
            .delete_database(name)
            .map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::database(&self.events, name));

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            op.listeners.listen(&request, "success", move |_event: Event| {
                log::info!("✅ [IDB] Base de datos '{}' borrada", scope.database);
                scope.publish(DbEventKind::Success, EventSource::DeleteRequest, "");
                emitter.next(true);
                emitter.complete();
            })?;
        }

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            let delete_request = request.clone();
            op.listeners.listen(&request, "error", move |event: Event| {
                let error = request_error(&delete_request, event);
                scope.publish(DbEventKind::Error, EventSource::DeleteRequest, error.to_string());
                emitter.error(error);
            })?;
        }

        {
            let scope = op.scope.clone();
            let emitter = op.emitter.clone();
            op.listeners.listen(&request, "blocked", move |_event: Event| {
                log::warn!(
                    "⛔ [IDB] No se puede borrar '{}': hay conexiones abiertas",
                    scope.database
                );
                scope.publish(DbEventKind::Blocked, EventSource::DeleteRequest, "");
                emitter.error(IdbError::Blocked {
                    database: scope.database.clone(),
                });
            })?;
        }

        Ok(op.finish())
    }

    /// Cerrar una conexión (las transacciones en curso terminan antes)
    pub fn close(&self, db: &IdbDatabase) {
        log::info!("🔌 [IDB] Cerrando conexión a '{}'", db.name());
        db.close();
    }

    // ==========================================
    // ESCRITURA
    // ==========================================

    /// Insertar un registro; emite la clave usada/generada
    pub fn insert(&self, db: &IdbDatabase, store: &str, record: &JsValue) -> IdbStream<JsValue> {
        self.try_batch(db, store, 1, |object_store, _| object_store.add(record))
            .unwrap_or_else(IdbStream::failed)
    }

    /// Insertar con clave explícita (stores sin keyPath ni generador)
    pub fn insert_with_key(
        &self,
        db: &IdbDatabase,
        store: &str,
        record: &JsValue,
        key: &JsValue,
    ) -> IdbStream<JsValue> {
        self.try_batch(db, store, 1, |object_store, _| object_store.add_with_key(record, key))
            .unwrap_or_else(IdbStream::failed)
    }

    /// Insertar varios registros en una sola transacción.
    /// Emite una clave por registro, en orden; completa con la transacción.
    pub fn insert_many(&self, db: &IdbDatabase, store: &str, records: &[JsValue]) -> IdbStream<JsValue> {
        self.try_batch(db, store, records.len(), |object_store, i| object_store.add(&records[i]))
            .unwrap_or_else(IdbStream::failed)
    }

    /// Igual que `insert_many` pero con pares (registro, clave)
    pub fn insert_many_with_keys(
        &self,
        db: &IdbDatabase,
        store: &str,
        entries: &[(JsValue, JsValue)],
    ) -> IdbStream<JsValue> {
        self.try_batch(db, store, entries.len(), |object_store, i| {
            let (record, key) = &entries[i];
            object_store.add_with_key(record, key)
        })
        .unwrap_or_else(IdbStream::failed)
    }

    fn try_batch<F>(
        &self,
        db: &IdbDatabase,
        store: &str,
        count: usize,
        issue: F,
    ) -> Result<IdbStream<JsValue>, IdbError>
    where
        F: Fn(&IdbObjectStore, usize) -> Result<IdbRequest, JsValue>,
    {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readwrite)?;
        let mut op = Pending::new(Scope::store(&self.events, db, store));

        for i in 0..count {
            let request = match issue(&object_store, i) {
                Ok(request) => request,
                Err(thrown) => {
                    // Lo ya emitido en esta transacción no se confirma
                    log::error!("❌ [IDB] add #{} en '{}' rechazado: {:?}", i, store, thrown);
                    let _ = tx.abort();
                    return Err(IdbError::Native(thrown));
                }
            };
            op.on_request(&request, |request, emitter| {
                emitter.next(request.result().unwrap_or(JsValue::UNDEFINED));
            })?;
        }
        op.on_transaction(&tx, |_| {})?;

        log::debug!("📝 [IDB] {} inserción(es) en '{}'", count, store);
        Ok(op.finish())
    }

    /// Leer-modificar-escribir en una misma transacción; emite la clave al confirmar
    pub fn update<F>(&self, db: &IdbDatabase, store: &str, key: &JsValue, update: F) -> IdbStream<JsValue>
    where
        F: FnOnce(JsValue) -> JsValue + 'static,
    {
        self.try_update(db, store, key, update)
            .unwrap_or_else(IdbStream::failed)
    }

    fn try_update<F>(&self, db: &IdbDatabase, store: &str, key: &JsValue, update: F) -> Result<IdbStream<JsValue>, IdbError>
    where
        F: FnOnce(JsValue) -> JsValue + 'static,
    {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readwrite)?;
        let get_request = object_store.get(key).map_err(IdbError::Native)?;
        let mut op: Pending<JsValue> = Pending::new(Scope::store(&self.events, db, store));

        let inline_keys = object_store
            .key_path()
            .map(|key_path| !key_path.is_null())
            .unwrap_or(false);
        let mut update = Some(update);
        let put_key = key.clone();
        let put_tx = tx.clone();
        op.on_request(&get_request, move |request, emitter| {
            let Some(update) = update.take() else {
                return;
            };
            let old = request.result().unwrap_or(JsValue::UNDEFINED);
            let new = update(old);
            let put = if inline_keys {
                object_store.put(&new)
            } else {
                object_store.put_with_key(&new, &put_key)
            };
            // Los errores asíncronos del put llegan por `abort` de la transacción
            if let Err(thrown) = put {
                emitter.error(IdbError::Native(thrown));
                let _ = put_tx.abort();
            }
        })?;

        let written_key = key.clone();
        op.on_transaction(&tx, move |emitter| {
            emitter.next(written_key.clone());
        })?;

        Ok(op.finish())
    }

    /// Borrar un registro por clave
    pub fn remove(&self, db: &IdbDatabase, store: &str, key: &JsValue) -> IdbStream<()> {
        self.try_remove(db, store, key).unwrap_or_else(IdbStream::failed)
    }

    fn try_remove(&self, db: &IdbDatabase, store: &str, key: &JsValue) -> Result<IdbStream<()>, IdbError> {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readwrite)?;
        let request = object_store.delete(key).map_err(IdbError::Native)?;
        let mut op: Pending<()> = Pending::new(Scope::store(&self.events, db, store));
        op.on_request(&request, |_, emitter| {
            emitter.next(());
        })?;
        op.on_transaction(&tx, |_| {})?;
        Ok(op.finish())
    }

    // ==========================================
    // LECTURA
    // ==========================================

    /// Leer un registro; `None` si la clave no existe
    pub fn retrieve(&self, db: &IdbDatabase, store: &str, key: &JsValue) -> IdbStream<Option<JsValue>> {
        self.try_retrieve(db, store, key).unwrap_or_else(IdbStream::failed)
    }

    fn try_retrieve(&self, db: &IdbDatabase, store: &str, key: &JsValue) -> Result<IdbStream<Option<JsValue>>, IdbError> {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readonly)?;
        let request = object_store.get(key).map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::store(&self.events, db, store));
        op.on_request(&request, |request, emitter| {
            let value = request.result().unwrap_or(JsValue::UNDEFINED);
            emitter.next(if value.is_undefined() { None } else { Some(value) });
        })?;
        op.on_transaction(&tx, |_| {})?;
        Ok(op.finish())
    }

    /// Número de registros del store
    pub fn count(&self, db: &IdbDatabase, store: &str) -> IdbStream<u32> {
        self.try_count(db, store).unwrap_or_else(IdbStream::failed)
    }

    fn try_count(&self, db: &IdbDatabase, store: &str) -> Result<IdbStream<u32>, IdbError> {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readonly)?;
        let request = object_store.count().map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::store(&self.events, db, store));
        op.on_request(&request, |request, emitter| {
            let count = request
                .result()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0);
            emitter.next(count as u32);
        })?;
        op.on_transaction(&tx, |_| {})?;
        Ok(op.finish())
    }

    /// Clave más alta del store (`None` si está vacío)
    pub fn last_key(&self, db: &IdbDatabase, store: &str) -> IdbStream<Option<JsValue>> {
        self.try_last_key(db, store).unwrap_or_else(IdbStream::failed)
    }

    fn try_last_key(&self, db: &IdbDatabase, store: &str) -> Result<IdbStream<Option<JsValue>>, IdbError> {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readonly)?;
        let request = object_store
            .open_key_cursor_with_range_and_direction(&JsValue::NULL, IdbCursorDirection::Prev)
            .map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::store(&self.events, db, store));
        op.on_request(&request, |request, emitter| {
            let result = request.result().unwrap_or(JsValue::NULL);
            if result.is_null() || result.is_undefined() {
                emitter.next(None);
                return;
            }
            match result.dyn_into::<IdbCursor>().and_then(|cursor| cursor.key()) {
                Ok(key) => {
                    emitter.next(Some(key));
                }
                Err(thrown) => emitter.error(IdbError::Native(thrown)),
            }
        })?;
        op.on_transaction(&tx, |_| {})?;
        Ok(op.finish())
    }

    /// Recorrer el store con un cursor; emite cada registro
    pub fn list_all(&self, db: &IdbDatabase, store: &str) -> IdbStream<JsValue> {
        self.try_list_all(db, store).unwrap_or_else(IdbStream::failed)
    }

    fn try_list_all(&self, db: &IdbDatabase, store: &str) -> Result<IdbStream<JsValue>, IdbError> {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readonly)?;
        let request = object_store.open_cursor().map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::store(&self.events, db, store));
        op.on_request(&request, walk_cursor)?;
        op.on_transaction(&tx, |_| {})?;
        Ok(op.finish())
    }

    /// Registros cuyo índice `index` vale exactamente `key`
    pub fn search_by_index(
        &self,
        db: &IdbDatabase,
        store: &str,
        index: &str,
        key: &JsValue,
    ) -> IdbStream<JsValue> {
        self.try_search_by_index(db, store, index, key)
            .unwrap_or_else(IdbStream::failed)
    }

    fn try_search_by_index(
        &self,
        db: &IdbDatabase,
        store: &str,
        index: &str,
        key: &JsValue,
    ) -> Result<IdbStream<JsValue>, IdbError> {
        let (tx, object_store) = open_transaction(db, store, IdbTransactionMode::Readonly)?;
        let range = IdbKeyRange::only(key).map_err(IdbError::Native)?;
        let request = object_store
            .index(index)
            .and_then(|idx| idx.open_cursor_with_range(&range))
            .map_err(IdbError::Native)?;
        let mut op = Pending::new(Scope::store(&self.events, db, store));
        op.on_request(&request, walk_cursor)?;
        op.on_transaction(&tx, |_| {})?;
        Ok(op.finish())
    }
}

// ==========================================
// INTERNOS
// ==========================================

/// Contexto para publicar eventos de diagnóstico
#[derive(Clone)]
struct Scope {
    bus: EventBus,
    database: String,
    store: Option<String>,
}

impl Scope {
    fn database(bus: &EventBus, database: &str) -> Self {
        Self {
            bus: bus.clone(),
            database: database.to_string(),
            store: None,
        }
    }

    fn store(bus: &EventBus, db: &IdbDatabase, store: &str) -> Self {
        Self {
            bus: bus.clone(),
            database: db.name(),
            store: Some(store.to_string()),
        }
    }

    fn publish(&self, kind: DbEventKind, source: EventSource, detail: impl Into<String>) {
        let mut event = DbEvent::new(kind, source, &self.database).with_detail(detail);
        if let Some(store) = &self.store {
            event = event.with_store(store);
        }
        self.bus.publish(event);
    }
}

/// Operación en construcción: emisor + listeners hasta convertirse en stream
struct Pending<T> {
    scope: Scope,
    emitter: Emitter<T>,
    receiver: UnboundedReceiver<Result<T, IdbError>>,
    listeners: ListenerGuard,
}

impl<T: 'static> Pending<T> {
    fn new(scope: Scope) -> Self {
        let (emitter, receiver) = channel();
        Self {
            scope,
            emitter,
            receiver,
            listeners: ListenerGuard::new(),
        }
    }

    fn on_request<F>(&mut self, request: &IdbRequest, mut on_success: F) -> Result<(), IdbError>
    where
        F: FnMut(&IdbRequest, &Emitter<T>) + 'static,
    {
        {
            let scope = self.scope.clone();
            let emitter = self.emitter.clone();
            let source = request.clone();
            self.listeners.listen(request, "success", move |_event: Event| {
                scope.publish(DbEventKind::Success, EventSource::Request, "");
                on_success(&source, &emitter);
            })?;
        }
        {
            let scope = self.scope.clone();
            let emitter = self.emitter.clone();
            let source = request.clone();
            self.listeners.listen(request, "error", move |event: Event| {
                let error = request_error(&source, event);
                scope.publish(DbEventKind::Error, EventSource::Request, error.to_string());
                emitter.error(error);
            })?;
        }
        Ok(())
    }

    fn on_transaction<F>(&mut self, tx: &IdbTransaction, mut on_complete: F) -> Result<(), IdbError>
    where
        F: FnMut(&Emitter<T>) + 'static,
    {
        {
            let scope = self.scope.clone();
            let emitter = self.emitter.clone();
            self.listeners.listen(tx, "complete", move |_event: Event| {
                scope.publish(DbEventKind::Complete, EventSource::Transaction, "");
                on_complete(&emitter);
                emitter.complete();
            })?;
        }
        {
            // El error de la petición ya se reenvió; aquí solo diagnóstico
            let scope = self.scope.clone();
            self.listeners.listen(tx, "error", move |_event: Event| {
                scope.publish(DbEventKind::Error, EventSource::Transaction, "");
            })?;
        }
        {
            let scope = self.scope.clone();
            let emitter = self.emitter.clone();
            let source = tx.clone();
            self.listeners.listen(tx, "abort", move |event: Event| {
                let error = source
                    .error()
                    .map(JsValue::from)
                    .unwrap_or_else(|| event.into());
                let error = IdbError::Native(error);
                log::warn!("⚠️ [IDB] Transacción abortada: {}", error);
                scope.publish(DbEventKind::Abort, EventSource::Transaction, error.to_string());
                emitter.error(error);
            })?;
        }
        Ok(())
    }

    fn finish(self) -> IdbStream<T> {
        log::trace!(
            "🎧 [IDB] {} listener(s) en '{}'",
            self.listeners.len(),
            self.scope.store.as_deref().unwrap_or(&self.scope.database)
        );
        IdbStream::new(self.receiver, self.listeners)
    }
}

fn open_transaction(
    db: &IdbDatabase,
    store: &str,
    mode: IdbTransactionMode,
) -> Result<(IdbTransaction, IdbObjectStore), IdbError> {
    let tx = db
        .transaction_with_str_and_mode(store, mode)
        .map_err(IdbError::Native)?;
    let object_store = tx.object_store(store).map_err(IdbError::Native)?;
    Ok((tx, object_store))
}

/// Paso de cursor: emite el valor y continúa; sin cursor = fin del recorrido
fn walk_cursor(request: &IdbRequest, emitter: &Emitter<JsValue>) {
    let result = request.result().unwrap_or(JsValue::NULL);
    if result.is_null() || result.is_undefined() {
        emitter.complete();
        return;
    }
    let cursor = match result.dyn_into::<IdbCursorWithValue>() {
        Ok(cursor) => cursor,
        Err(other) => {
            emitter.error(IdbError::Native(other));
            return;
        }
    };
    match cursor.value() {
        Ok(value) => {
            emitter.next(value);
        }
        Err(thrown) => {
            emitter.error(IdbError::Native(thrown));
            return;
        }
    }
    if let Err(thrown) = cursor.continue_() {
        emitter.error(IdbError::Native(thrown));
    }
}

fn request_error(request: &IdbRequest, event: Event) -> IdbError {
    match request.error() {
        Ok(Some(exception)) => IdbError::Native(exception.into()),
        Ok(None) => IdbError::Native(event.into()),
        Err(thrown) => IdbError::Native(thrown),
    }
}

/// Listeners a nivel de conexión (abort/error/close/versionchange).
/// Viven lo mismo que la conexión, por eso se hace forget().
fn watch_connection(bus: &EventBus, db: &IdbDatabase) {
    let database = db.name();
    for event_type in ["abort", "error", "close", "versionchange"] {
        let bus = bus.clone();
        let name = database.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let kind = DbEventKind::from_event_type(&event.type_()).unwrap_or(DbEventKind::Error);
            if kind == DbEventKind::VersionChange {
                log::warn!(
                    "🔄 [IDB] Otra pestaña necesita una versión nueva de '{}'. Recarga la página.",
                    name
                );
            }
            bus.publish(DbEvent::new(kind, EventSource::Database, &name));
        }) as Box<dyn FnMut(Event)>);

        if let Err(e) = db.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref()) {
            log::warn!("⚠️ [IDB] No se pudo registrar '{}' en '{}': {:?}", event_type, database, e);
        }
        closure.forget();
    }
}
