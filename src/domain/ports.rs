use crate::domain::model::{Coordinates, OptionalService, OrderRecord, PackageCategory};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 費率查詢。每次查詢都可能失敗，呼叫端不重試也不快取。
#[async_trait]
pub trait RateLookupProvider: Send + Sync {
    async fn box_factor(&self, category: PackageCategory) -> Result<u32>;

    /// 階梯式卡車費用，箱數越多費用不會變少
    async fn truck_price(&self, total_boxes: u64) -> Result<u64>;

    async fn optional_service_fee(&self, service: OptionalService) -> Result<u64>;

    async fn season_coefficient(&self, date: NaiveDate) -> Result<f64>;

    async fn distance_between_regions(&self, origin_id: &str, destination_id: &str)
        -> Result<f64>;
}

#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    async fn resolve(&self, postal_code: &str) -> Result<Coordinates>;
}

#[async_trait]
pub trait OrderSink: Send + Sync {
    /// 回傳保存位置
    async fn register(&self, order: &OrderRecord) -> Result<String>;
}
