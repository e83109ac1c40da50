use crate::domain::model::OrderRecord;
use crate::domain::ports::{OrderSink, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 每筆訂單存成一個 JSON 檔: `orders/<customer_id>.json`
pub struct JsonOrderStore<S: Storage> {
    storage: S,
}

impl<S: Storage> JsonOrderStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn order_path(customer_id: &str) -> String {
        format!("orders/{}.json", customer_id)
    }

    pub async fn load(&self, customer_id: &str) -> Result<OrderRecord> {
        let data = self.storage.read_file(&Self::order_path(customer_id)).await?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[async_trait]
impl<S: Storage> OrderSink for JsonOrderStore<S> {
    async fn register(&self, order: &OrderRecord) -> Result<String> {
        let path = Self::order_path(&order.customer.customer_id);
        let document = serde_json::to_vec_pretty(order)?;
        tracing::debug!("Writing order document {} ({} bytes)", path, document.len());
        self.storage.write_file(&path, &document).await?;
        Ok(path)
    }
}
