//! Cart pricing
//!
//! The meta cache fetches live product data for cart lines; the cart pricing
//! view re-prices its cart whenever the cache changes and publishes the result.

pub mod cache;
pub mod view;

pub use cache::{MetaCache, SyncReport};
pub use view::{CartPricing, PricedCartReceiver};
