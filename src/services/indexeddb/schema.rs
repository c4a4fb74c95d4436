// ============================================================================
// DECLARACIÓN DE ESQUEMA - Object stores + índices
// ============================================================================
// Solo se aplica dentro de una transacción `versionchange` (upgradeneeded).
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::{IdbDatabase, IdbIndexParameters, IdbObjectStore, IdbObjectStoreParameters};

use super::error::IdbError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyGenerator {
    pub auto_increment: bool,
}

impl KeyGenerator {
    pub fn auto_increment() -> Self {
        Self { auto_increment: true }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexOptions {
    pub unique: bool,
    pub multi_entry: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexDeclaration {
    pub name: String,
    pub key_path: String,
    pub options: IndexOptions,
}

/// Declaración de un object store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDeclaration {
    pub name: String,
    pub key_path: Option<String>,
    pub key_generator: Option<KeyGenerator>,
    pub indexes: Vec<IndexDeclaration>,
}

impl SchemaDeclaration {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key_path: None,
            key_generator: None,
            indexes: Vec::new(),
        }
    }

    pub fn key_path(mut self, key_path: &str) -> Self {
        self.key_path = Some(key_path.to_string());
        self
    }

    pub fn key_generator(mut self, generator: KeyGenerator) -> Self {
        self.key_generator = Some(generator);
        self
    }

    pub fn index(mut self, name: &str, key_path: &str, options: IndexOptions) -> Self {
        self.indexes.push(IndexDeclaration {
            name: name.to_string(),
            key_path: key_path.to_string(),
            options,
        });
        self
    }

    pub fn is_auto_increment(&self) -> bool {
        self.key_generator.map(|g| g.auto_increment).unwrap_or(false)
    }
}

/// Verifica que los nombres de stores e índices no se repitan
pub fn validate_schema(schema: &[SchemaDeclaration]) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for declaration in schema {
        if declaration.name.is_empty() {
            return Err("object store sin nombre".to_string());
        }
        if !seen.insert(declaration.name.as_str()) {
            return Err(format!("object store duplicado: '{}'", declaration.name));
        }
        let mut index_names = std::collections::HashSet::new();
        for index in &declaration.indexes {
            if !index_names.insert(index.name.as_str()) {
                return Err(format!(
                    "índice duplicado '{}' en '{}'",
                    index.name, declaration.name
                ));
            }
        }
    }
    Ok(())
}

/// Aplicar el esquema durante upgradeneeded.
/// Un store existente se borra y se recrea: los datos se pierden.
pub(crate) fn apply_schema(db: &IdbDatabase, schema: &[SchemaDeclaration]) -> Result<(), IdbError> {
    for declaration in schema {
        if db.object_store_names().contains(&declaration.name) {
            log::warn!("🗑️ [IDB] Borrando object store existente '{}'", declaration.name);
            db.delete_object_store(&declaration.name)
                .map_err(IdbError::Native)?;
        }
        let store = create_store(db, declaration)?;
        for index in &declaration.indexes {
            create_index(&store, index)?;
        }
        log::info!(
            "🧱 [IDB] Object store '{}' creado ({} índices)",
            declaration.name,
            declaration.indexes.len()
        );
    }
    Ok(())
}

fn create_store(db: &IdbDatabase, declaration: &SchemaDeclaration) -> Result<IdbObjectStore, IdbError> {
    let params = IdbObjectStoreParameters::new();
    if let Some(key_path) = &declaration.key_path {
        params.set_key_path(&JsValue::from_str(key_path));
    }
    if declaration.is_auto_increment() {
        params.set_auto_increment(true);
    }
    db.create_object_store_with_optional_parameters(&declaration.name, &params)
        .map_err(IdbError::Native)
}

fn create_index(store: &IdbObjectStore, index: &IndexDeclaration) -> Result<(), IdbError> {
    let params = IdbIndexParameters::new();
    params.set_unique(index.options.unique);
    params.set_multi_entry(index.options.multi_entry);
    store
        .create_index_with_str_and_optional_parameters(&index.name, &index.key_path, &params)
        .map(|_| ())
        .map_err(IdbError::Native)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_options() {
        let declaration = SchemaDeclaration::new("customers")
            .key_path("id")
            .key_generator(KeyGenerator::auto_increment())
            .index("by_phone", "phone", IndexOptions { unique: true, multi_entry: false });

        assert_eq!(declaration.key_path.as_deref(), Some("id"));
        assert!(declaration.is_auto_increment());
        assert!(declaration.indexes[0].options.unique);
    }

    #[test]
    fn key_generator_defaults_to_no_auto_increment() {
        assert!(!SchemaDeclaration::new("messages").is_auto_increment());
        assert!(!SchemaDeclaration::new("odd")
            .key_generator(KeyGenerator::default())
            .is_auto_increment());
        assert!(SchemaDeclaration::new("shipments")
            .key_generator(KeyGenerator::auto_increment())
            .is_auto_increment());
    }

    #[test]
    fn duplicate_store_names_are_rejected() {
        let schema = vec![SchemaDeclaration::new("a"), SchemaDeclaration::new("a")];
        assert!(validate_schema(&schema).unwrap_err().contains("'a'"));
    }

    #[test]
    fn duplicate_index_names_are_rejected() {
        let schema = vec![SchemaDeclaration::new("a")
            .index("i", "x", IndexOptions::default())
            .index("i", "y", IndexOptions::default())];
        assert!(validate_schema(&schema).is_err());
        assert!(validate_schema(&[SchemaDeclaration::new("")]).is_err());
    }
}
