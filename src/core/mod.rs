pub mod distance;
pub mod estimate;
pub mod order;
pub mod pricing;

pub use crate::domain::model::{MoveRequest, PriceBreakdown, RateSnapshot};
pub use crate::domain::ports::{CoordinateResolver, OrderSink, RateLookupProvider, Storage};
pub use crate::utils::error::Result;
