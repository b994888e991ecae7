pub mod errors;
pub mod models;
pub mod operations;
pub mod services;
pub mod validation;

pub use errors::*;
