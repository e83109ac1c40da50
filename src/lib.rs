pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    order_store::JsonOrderStore, postal::HttpPostalCodeResolver, rate_table::RateTable,
    storage::LocalStorage,
};
pub use app::forms::{SimpleOrderForm, UserOrderForm};
pub use config::RateConfig;
pub use self::core::{
    estimate::EstimateService, order::OrderRegistration, pricing::PricingEngine,
    pricing::PRICE_PER_DISTANCE_KM,
};
pub use domain::model::{Location, MoveRequest, PriceBreakdown};
pub use utils::error::{EstimateError, Result};
