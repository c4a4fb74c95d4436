// Conversión serde <-> JsValue para los registros guardados

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::error::IdbError;

/// Objetos JS planos (no `Map`), i64 seguros como `number`
pub fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, IdbError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(IdbError::from)
}

pub fn from_js_value<T: DeserializeOwned>(value: &JsValue) -> Result<T, IdbError> {
    serde_wasm_bindgen::from_value(value.clone()).map_err(IdbError::from)
}

/// Clave numérica (autoIncrement) -> u32
pub fn key_as_u32(key: &JsValue) -> Option<u32> {
    key.as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
}

pub fn to_js_values<T: Serialize>(values: &[T]) -> Result<Vec<JsValue>, IdbError> {
    values.iter().map(to_js_value).collect()
}

pub fn from_js_values<T: DeserializeOwned>(values: &[JsValue]) -> Result<Vec<T>, IdbError> {
    values.iter().map(from_js_value).collect()
}
