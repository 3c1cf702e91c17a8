//! 商品业务服务

use tracing::info;

use super::model::{Product, ProductPatch, ProductPayload, StockAdjustment, StockLevels};
use crate::core::error::CoreError;
use crate::infrastructure::http_client::{record_path, BackendClient};

const KIND: &str = "product";

#[derive(Clone)]
pub struct ProductService {
    client: BackendClient,
}

impl ProductService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Product>, CoreError> {
        let products: Option<Vec<Product>> = self.client.get("/getaddproduct").await?;
        Ok(products.unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> Result<Product, CoreError> {
        let path = record_path("/AddProduct", id, KIND)?;
        let product: Option<Product> = self.client.get(&path).await?;
        product.ok_or_else(|| CoreError::NotFound(format!("product {id}")))
    }

    pub async fn create(&self, payload: &ProductPayload) -> Result<(), CoreError> {
        let _: serde_json::Value = self.client.post("/AddProduct", payload).await?;
        info!("商品已创建: {}", payload.product_name);
        Ok(())
    }

    /// 整条更新
    pub async fn update(&self, id: &str, payload: &ProductPayload) -> Result<(), CoreError> {
        let path = record_path("/updateproduct", id, KIND)?;
        let _: serde_json::Value = self.client.put(&path, payload).await?;
        info!("商品已更新: {}", id);
        Ok(())
    }

    /// 局部更新
    pub async fn patch(&self, id: &str, patch: &ProductPatch) -> Result<(), CoreError> {
        let path = record_path("/AddProduct", id, KIND)?;
        let _: serde_json::Value = self.client.patch(&path, patch).await?;
        info!("商品已局部更新: {}", id);
        Ok(())
    }

    /// 一次请求完成入库/出库
    pub async fn adjust_stock(
        &self,
        id: &str,
        adjustment: &StockAdjustment,
    ) -> Result<StockLevels, CoreError> {
        let path = format!(
            "{}?action={}&quantity={}",
            record_path("/updatestock", id, KIND)?,
            adjustment.action.as_str(),
            adjustment.quantity
        );
        let body: serde_json::Value = self
            .client
            .patch(&path, &serde_json::json!({}))
            .await?;
        // 返回体不一定带库存字段
        let levels = serde_json::from_value::<StockLevels>(body).unwrap_or_default();
        info!(
            "库存已调整: {} {} x{}",
            id,
            adjustment.action.as_str(),
            adjustment.quantity
        );
        Ok(levels)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let path = record_path("/deleteproduct", id, KIND)?;
        self.client.delete(&path).await?;
        info!("商品已删除: {}", id);
        Ok(())
    }
}
