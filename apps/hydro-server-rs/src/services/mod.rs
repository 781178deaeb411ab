pub mod classify;
pub mod store;
