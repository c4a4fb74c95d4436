// Modelos persistidos en IndexedDB

pub mod alert;
pub mod customer;

pub use alert::AlertMessage;
pub use customer::{Customer, CustomerCart, CustomerOrder, CustomerShipment};
