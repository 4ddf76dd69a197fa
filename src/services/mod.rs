//! Use-case services
//!
//! Business flows that span more than one store or carry fixed domain
//! data (the marketplace catalog, the pickup pricing table).

pub mod market;
pub mod pickup;
pub mod review;

pub use market::{market_catalog, MarketCategory, MarketItem};
pub use pickup::{
    collector_roster, estimate_cost, Collector, TrashType, PICKUP_BASE_CHARGE,
};
pub use review::resolve_submission;
