//! Storefront pricing services: API clients, the meta cache and checkout.

pub mod api;
pub mod context;
pub mod domain;
