// ============================================================================
// CONEXIÓN PEREZOSA - Un IdbDatabase por base de datos, abierto bajo demanda
// ============================================================================
// La apertura se guarda como futuro compartido: varias llamadas simultáneas
// esperan la misma petición `open`. Una apertura fallida no se guarda.
// ============================================================================

use std::cell::RefCell;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use web_sys::IdbDatabase;

use crate::config::DatabaseConfig;
use crate::services::indexeddb::{IdbError, IndexedDbService, SchemaDeclaration};

type OpenFuture = Shared<LocalBoxFuture<'static, Result<IdbDatabase, IdbError>>>;

pub struct DatabaseConnection {
    idb: IndexedDbService,
    name: String,
    version: u32,
    schema: Vec<SchemaDeclaration>,
    opening: RefCell<Option<OpenFuture>>,
}

impl DatabaseConnection {
    pub fn new(idb: &IndexedDbService, database: &DatabaseConfig, schema: Vec<SchemaDeclaration>) -> Self {
        Self {
            idb: idb.clone(),
            name: database.name.clone(),
            version: database.version,
            schema,
            opening: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Conexión abierta (la abre en la primera llamada)
    pub async fn get(&self) -> Result<IdbDatabase, IdbError> {
        let opening = self
            .opening
            .borrow_mut()
            .get_or_insert_with(|| {
                self.idb
                    .open_database(&self.name, self.version, &self.schema)
                    .first()
                    .boxed_local()
                    .shared()
            })
            .clone();
        let pending = opening.clone();
        let result = opening.await;

        let still_current = self
            .opening
            .borrow()
            .as_ref()
            .map(|current| current.ptr_eq(&pending))
            .unwrap_or(false);

        match result {
            Ok(db) if !still_current => {
                // close() llegó mientras se abría
                db.close();
                Err(IdbError::Closed {
                    database: self.name.clone(),
                })
            }
            Ok(db) => Ok(db),
            Err(error) => {
                if still_current {
                    self.opening.borrow_mut().take();
                }
                Err(error)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.opening.borrow().as_ref().and_then(|opening| opening.peek()),
            Some(Ok(_))
        )
    }

    /// Cerrar la conexión y olvidar la apertura guardada
    pub fn close(&self) {
        let Some(opening) = self.opening.borrow_mut().take() else {
            return;
        };
        match opening.peek() {
            Some(Ok(db)) => return self.idb.close(db),
            Some(Err(_)) => return,
            None => {}
        }
        // El handle que llegue tarde se cierra en una tarea aparte
        log::info!("🔌 [STORE] '{}' se cerrará al terminar de abrirse", self.name);
        let idb = self.idb.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Ok(db) = opening.await {
                idb.close(&db);
            }
        });
    }
}

impl Drop for DatabaseConnection {
    fn drop(&mut self) {
        self.close();
    }
}
