pub mod models;
pub mod store;

pub use store::{Collection, Collections, DataStore, StoreError};
