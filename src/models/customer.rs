use serde::{Deserialize, Serialize};

/// Cliente (store `customers`, keyPath `id` autoincremental)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Customer {
    // Lo asigna IndexedDB al insertar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Customer {
    pub fn new(name: &str, address: &str, phone: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// Pedido (store `customers-orders`, keyPath `id` explícito)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    pub id: u32,
    pub customer_id: u32,
    pub date_ordered: i64,
    pub items: Vec<String>,
}

/// Envío (store `customers-shipments`, claves fuera de línea autoincrementales)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerShipment {
    pub name: String,
    pub po: String,
    pub customer_id: u32,
    pub order_id: u32,
    pub date_shipped: i64,
}

/// Carrito (store `customers-carts`, keyPath `id` autoincremental)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub customer_id: u32,
    pub items: Vec<String>,
}
