// ============================================================================
// ERRORES DE INDEXEDDB
// ============================================================================
// Los errores nativos (DOMException / Event) se reenvían tal cual dentro de
// `IdbError::Native`: no se reclasifican ni se reintentan.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::DomException;

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdbError {
    /// No hay `window` o el navegador no expone `indexedDB`
    #[error("IndexedDB no disponible en este entorno")]
    Unavailable,

    /// Otra conexión abierta bloquea la apertura/borrado
    #[error("petición bloqueada por otra conexión abierta: '{database}'")]
    Blocked { database: String },

    /// Error nativo del navegador, sin tocar
    #[error("error nativo de IndexedDB: {}", describe_js(.0))]
    Native(JsValue),

    #[error("error de serialización: {0}")]
    Serialization(String),

    /// Esquema inválido (nombres vacíos o repetidos)
    #[error("esquema inválido: {0}")]
    Schema(String),

    /// La clave no existe en el store
    #[error("no existe '{key}' en '{store}'")]
    NotFound { store: String, key: String },

    /// La conexión se cerró mientras se abría
    #[error("la conexión a '{database}' se cerró")]
    Closed { database: String },

    /// El stream terminó sin emitir el valor esperado
    #[error("el stream terminó sin emitir ningún valor")]
    Completed,
}

impl IdbError {
    /// Valor nativo reenviado, si lo hay
    pub fn native(&self) -> Option<&JsValue> {
        match self {
            IdbError::Native(value) => Some(value),
            _ => None,
        }
    }

    /// Nombre del DOMException (`ConstraintError`, `NotFoundError`, ...)
    pub fn name(&self) -> Option<String> {
        self.native()
            .and_then(|value| value.dyn_ref::<DomException>())
            .map(|exception| exception.name())
    }
}

impl From<IdbError> for JsValue {
    fn from(error: IdbError) -> Self {
        match error {
            IdbError::Native(value) => value,
            other => JsValue::from_str(&other.to_string()),
        }
    }
}

impl From<serde_json::Error> for IdbError {
    fn from(error: serde_json::Error) -> Self {
        IdbError::Serialization(error.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for IdbError {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        IdbError::Serialization(error.to_string())
    }
}

fn describe_js(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    format!("{:?}", value)
}
