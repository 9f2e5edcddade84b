//! Carts

pub mod errors;
pub mod service;

pub use errors::CartSourceError;
pub use service::*;
