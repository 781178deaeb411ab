pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod time;
pub mod validation;

#[cfg(test)]
pub mod test_support;
