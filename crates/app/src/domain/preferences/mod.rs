//! Checkout preferences

pub mod errors;
pub mod models;
pub mod store;

pub use errors::PreferencesError;
pub use models::*;
pub use store::PreferencesStore;
