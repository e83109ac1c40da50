// Adapters layer: concrete implementations for external systems (rate tables, postal API, storage).

pub mod order_store;
pub mod postal;
pub mod rate_table;
pub mod storage;
