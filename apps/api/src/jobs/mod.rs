pub mod handlers;
pub mod query;
pub mod stats;
pub mod store;
