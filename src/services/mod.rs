pub mod indexeddb;

pub use indexeddb::{IdbError, IdbStream, IndexedDbService};
