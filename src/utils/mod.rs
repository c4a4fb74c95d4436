// Utils compartidos

pub mod order_by;
pub mod sample_data;

pub use order_by::{compare_ids, sort_by_key_value};
