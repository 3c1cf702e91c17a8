//! 库存分布统计

use serde::Serialize;

use crate::app::product::model::Product;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub name: &'static str,
    pub value: i64,
    /// 占总量的百分比，取整
    pub percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryDistribution {
    pub slices: Vec<DistributionSlice>,
    pub total: i64,
    pub product_count: usize,
}

impl InventoryDistribution {
    /// Stock In = Σ inStock，Stock Out = Σ stockQuantity，Sold = Σ (inStock − stockQuantity)
    pub fn from_products(products: &[Product]) -> Self {
        let stock_in: i64 = products.iter().map(|p| p.in_stock).sum();
        let stock_out: i64 = products.iter().map(|p| p.stock_quantity).sum();
        let sold: i64 = products.iter().map(|p| p.in_stock - p.stock_quantity).sum();
        let total = stock_in + stock_out + sold;

        let slices = [("Stock In", stock_in), ("Stock Out", stock_out), ("Sold", sold)]
            .into_iter()
            .map(|(name, value)| DistributionSlice {
                name,
                value,
                percent: percent_of(value, total),
            })
            .collect();

        Self {
            slices,
            total,
            product_count: products.len(),
        }
    }
}

fn percent_of(value: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    (value as f64 * 100.0 / total as f64).round() as i64
}
