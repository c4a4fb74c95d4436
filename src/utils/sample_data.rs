// ============================================================================
// DATOS DE EJEMPLO - Generadores deterministas para la demo de Customers
// ============================================================================

use chrono::{DateTime, Duration, Utc};

use crate::models::{Customer, CustomerOrder, CustomerShipment};

const FIRST_NAMES: [&str; 10] = [
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances", "Ken", "Radia", "Niklaus",
];
const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Allen", "Thompson",
];
const STREETS: [&str; 6] = [
    "Main St", "Oak Ave", "Maple Rd", "Cedar Ln", "Elm St", "Pine Ct",
];
const ITEMS: [&str; 7] = [
    "keyboard", "monitor", "mouse", "usb hub", "headset", "webcam", "desk lamp",
];

/// `count` clientes a partir del índice `offset` (teléfonos únicos por índice)
pub fn sample_customers(offset: usize, count: usize) -> Vec<Customer> {
    (offset..offset + count)
        .map(|i| {
            let name = format!(
                "{} {}",
                FIRST_NAMES[i % FIRST_NAMES.len()],
                LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()]
            );
            let address = format!("{} {}", 10 + (i * 7) % 990, STREETS[i % STREETS.len()]);
            let phone = format!("555-{:06}", i);
            Customer::new(&name, &address, &phone)
        })
        .collect()
}

/// Pedidos de un cliente con ids consecutivos desde `first_order_id`
pub fn sample_orders(
    customer_id: u32,
    first_order_id: u32,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<CustomerOrder> {
    (0..count as u32)
        .map(|k| {
            let id = first_order_id + k;
            let date = now - Duration::days(i64::from(k) + 1);
            let item_count = 1 + (id as usize % 3);
            let items = (0..item_count)
                .map(|j| ITEMS[(id as usize + j) % ITEMS.len()].to_string())
                .collect();
            CustomerOrder {
                id,
                customer_id,
                date_ordered: date.timestamp_millis(),
                items,
            }
        })
        .collect()
}

/// Envío de un pedido, un día después de pedirlo
pub fn sample_shipment(order: &CustomerOrder) -> CustomerShipment {
    CustomerShipment {
        name: format!("Shipment #{}", order.id),
        po: format!("PO-{:06}", order.id),
        customer_id: order.customer_id,
        order_id: order.id,
        date_shipped: order.date_ordered + Duration::days(1).num_milliseconds(),
    }
}
